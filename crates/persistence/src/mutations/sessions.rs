// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::clock::now_timestamp;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user the session belongs to
/// * `csrf_token` - The per-session CSRF token
/// * `expires_at` - The expiration timestamp (storage format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    csrf_token: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    let now: String = now_timestamp();
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::csrf_token.eq(csrf_token),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now_timestamp()))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Caches the resolved permission set on a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn set_session_permissions(
    conn: &mut _,
    session_id: i64,
    permissions_json: &str,
) -> Result<(), PersistenceError> {
    debug!("Caching permissions for session ID: {}", session_id);
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::permissions_json.eq(Some(permissions_json)))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<usize, PersistenceError> {
    debug!("Deleting session by token");
    Ok(diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?)
}
}

backend_fn! {
/// Deletes every session belonging to a user.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_user(conn: &mut _, user_id: i64) -> Result<usize, PersistenceError> {
    let rows: usize = diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
        .execute(conn)?;
    info!("Deleted {} sessions for user ID: {}", rows, user_id);
    Ok(rows)
}
}

backend_fn! {
/// Deletes every session of a user except the one identified by `keep_token`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_other_sessions_for_user(
    conn: &mut _,
    user_id: i64,
    keep_token: &str,
) -> Result<usize, PersistenceError> {
    let rows: usize = diesel::delete(
        sessions::table
            .filter(sessions::user_id.eq(user_id))
            .filter(sessions::session_token.ne(keep_token)),
    )
    .execute(conn)?;
    info!("Deleted {} other sessions for user ID: {}", rows, user_id);
    Ok(rows)
}
}

backend_fn! {
/// Deletes all sessions that expired before `now`.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let rows: usize = diesel::delete(sessions::table.filter(sessions::expires_at.lt(now)))
        .execute(conn)?;
    info!("Deleted {} expired sessions", rows);
    Ok(rows)
}
}
