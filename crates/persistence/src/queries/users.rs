// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{ListFilter, UserData};
use crate::diesel_schema::{user_roles, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    email: Option<String>,
    is_active: i32,
    created_at: String,
    created_by: Option<i64>,
    last_login_at: Option<String>,
    avatar: Option<String>,
    employee_id: Option<i64>,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            created_by: row.created_by,
            last_login_at: row.last_login_at,
            avatar: row.avatar,
            employee_id: row.employee_id,
        }
    }
}

backend_fn! {
/// Retrieves a user by username, case-insensitively.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such user exists.
pub fn get_user_by_username(
    conn: &mut _,
    username: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let lookup_key: String = username.trim().to_lowercase();

    debug!("Looking up user by username: {}", lookup_key);

    let row: Option<UserRow> = users::table
        .filter(users::username_key.eq(&lookup_key))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(UserData::from))
}
}

backend_fn! {
/// Retrieves a user by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such user exists.
pub fn get_user_by_id(conn: &mut _, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(UserData::from))
}
}

backend_fn! {
/// Lists users, filtered by username/email search and active flag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut _, filter: &ListFilter) -> Result<Vec<UserData>, PersistenceError> {
    let mut query = users::table.select(UserRow::as_select()).into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            users::username
                .like(pattern.clone())
                .or(users::email.assume_not_null().like(pattern)),
        );
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(users::is_active.eq(flag));
    }

    let rows: Vec<UserRow> = query.order(users::username.asc()).load(conn)?;
    Ok(rows.into_iter().map(UserData::from).collect())
}
}

backend_fn! {
/// Counts all user accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(users::table.count().get_result(conn)?)
}
}

backend_fn! {
/// Counts active user accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_users(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(users::table
        .filter(users::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
}

backend_fn! {
/// Returns the ids of the roles assigned to a user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_role_ids(conn: &mut _, user_id: i64) -> Result<Vec<i64>, PersistenceError> {
    Ok(user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .select(user_roles::role_id)
        .order(user_roles::role_id.asc())
        .load(conn)?)
}
}
