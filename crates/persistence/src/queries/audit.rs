// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{AuditLogData, ListFilter};
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_log)]
struct AuditLogRow {
    audit_id: i64,
    actor_user_id: i64,
    actor_username: String,
    action: String,
    entity: String,
    entity_id: Option<i64>,
    details: Option<String>,
    created_at: String,
}

backend_fn! {
/// Lists audit entries, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - Search over actor, action, entity and details
/// * `limit` - Maximum number of entries returned
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_audit_log(
    conn: &mut _,
    filter: &ListFilter,
    limit: i64,
) -> Result<Vec<AuditLogData>, PersistenceError> {
    let mut query = audit_log::table
        .select(AuditLogRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            audit_log::actor_username
                .like(pattern.clone())
                .or(audit_log::action.like(pattern.clone()))
                .or(audit_log::entity.like(pattern.clone()))
                .or(audit_log::details.assume_not_null().like(pattern)),
        );
    }

    let rows: Vec<AuditLogRow> = query
        .order(audit_log::audit_id.desc())
        .limit(limit)
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| AuditLogData {
            audit_id: row.audit_id,
            actor_user_id: row.actor_user_id,
            actor_username: row.actor_username,
            action: row.action,
            entity: row.entity,
            entity_id: row.entity_id,
            details: row.details,
            created_at: row.created_at,
        })
        .collect())
}
}

backend_fn! {
/// Counts audit entries for one entity type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_audit_entries_for(conn: &mut _, entity: &str) -> Result<i64, PersistenceError> {
    Ok(audit_log::table
        .filter(audit_log::entity.eq(entity))
        .count()
        .get_result(conn)?)
}
}
