// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_audit::AuditEntry;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::clock::now_timestamp;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

backend_fn! {
/// Appends an entry to the audit log.
///
/// # Returns
///
/// The new `audit_id`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_audit(conn: &mut _, entry: &AuditEntry) -> Result<i64, PersistenceError> {
    diesel::insert_into(audit_log::table)
        .values((
            audit_log::actor_user_id.eq(entry.actor.user_id),
            audit_log::actor_username.eq(&entry.actor.username),
            audit_log::action.eq(&entry.action.name),
            audit_log::entity.eq(&entry.subject.entity),
            audit_log::entity_id.eq(entry.subject.entity_id),
            audit_log::details.eq(entry.action.details.as_deref()),
            audit_log::created_at.eq(now_timestamp()),
        ))
        .execute(conn)?;
    let audit_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        audit_id,
        action = %entry.action.name,
        entity = %entry.subject.entity,
        "Recorded audit entry"
    );
    Ok(audit_id)
}
}
