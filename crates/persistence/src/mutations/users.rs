// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::mysql::lock_writer;
use crate::backend::{PersistenceBackend, serialized_mysql, serialized_sqlite};
use crate::clock::now_timestamp;
use crate::diesel_schema::{roles, user_roles, users};
use crate::error::PersistenceError;
use crate::mutations::{flip, rename_duplicate, require_row};

/// Name of the built-in role granted to the bootstrap account.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Hashes a password with bcrypt at the default cost.
pub(crate) fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::PasswordHashing(e.to_string()))
}

backend_fn! {
/// Creates a user account.
///
/// The username is stored as given (trimmed); uniqueness is case-insensitive.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The login name
/// * `password` - The plain-text password (will be hashed)
/// * `email` - Optional email address
/// * `employee_id` - Optional link to an employee record
/// * `created_by` - The creating user, if any
///
/// # Errors
///
/// Returns `DuplicateName` if the username is taken, or a database error.
pub fn create_user(
    conn: &mut _,
    username: &str,
    password: &str,
    email: Option<&str>,
    employee_id: Option<i64>,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    let username: &str = username.trim();
    info!("Creating user with username: {}", username);

    let password_hash: String = hash_password(password)?;

    diesel::insert_into(users::table)
        .values((
            users::username.eq(username),
            users::username_key.eq(username.to_lowercase()),
            users::password_hash.eq(&password_hash),
            users::email.eq(email),
            users::is_active.eq(1),
            users::created_at.eq(now_timestamp()),
            users::created_by.eq(created_by),
            users::employee_id.eq(employee_id),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, username))?;

    let user_id: i64 = conn.get_last_insert_rowid()?;
    info!(user_id, "User created");
    Ok(user_id)
}
}

backend_fn! {
/// Updates a user's email and employee link.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or a database error.
pub fn update_user(
    conn: &mut _,
    user_id: i64,
    email: Option<&str>,
    employee_id: Option<i64>,
) -> Result<(), PersistenceError> {
    info!("Updating user ID: {}", user_id);

    let rows: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set((users::email.eq(email), users::employee_id.eq(employee_id)))
        .execute(conn)?;
    require_row(rows, "user", user_id)
}
}

backend_fn! {
/// Flips a user's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or a database error.
pub fn toggle_user_active(conn: &mut _, user_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = users::table
        .filter(users::user_id.eq(user_id))
        .select(users::is_active)
        .first(conn)?;
    let next: i32 = flip(current);

    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::is_active.eq(next))
        .execute(conn)?;

    info!(user_id, is_active = next, "Toggled user");
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes a user. Sessions and role links cascade.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or a database error.
pub fn delete_user(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting user ID: {}", user_id);
    let rows: usize = diesel::delete(users::table.filter(users::user_id.eq(user_id)))
        .execute(conn)?;
    require_row(rows, "user", user_id)
}
}

backend_fn! {
/// Replaces a user's password.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or an error if hashing
/// or the update fails.
pub fn update_password(
    conn: &mut _,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for user ID: {}", user_id);

    let password_hash: String = hash_password(new_password)?;
    let rows: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::password_hash.eq(&password_hash))
        .execute(conn)?;
    require_row(rows, "user", user_id)
}
}

backend_fn! {
/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, user_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::last_login_at.eq(Some(now_timestamp())))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Stores (or clears) a user's avatar data URL.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist, or a database error.
pub fn set_avatar(
    conn: &mut _,
    user_id: i64,
    avatar: Option<&str>,
) -> Result<(), PersistenceError> {
    info!("Updating avatar for user ID: {}", user_id);
    let rows: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::avatar.eq(avatar))
        .execute(conn)?;
    require_row(rows, "user", user_id)
}
}

backend_fn! {
fn write_user_roles(
    conn: &mut _,
    user_id: i64,
    role_ids: &[i64],
    assigned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id))).execute(conn)?;

    let assigned_at: String = now_timestamp();
    for role_id in role_ids {
        diesel::insert_into(user_roles::table)
            .values((
                user_roles::user_id.eq(user_id),
                user_roles::role_id.eq(*role_id),
                user_roles::assigned_at.eq(&assigned_at),
                user_roles::assigned_by.eq(assigned_by),
            ))
            .execute(conn)?;
    }

    info!(user_id, roles = role_ids.len(), "Replaced user roles");
    Ok(())
}
}

/// Replaces a user's role set atomically (`SQLite`).
///
/// # Errors
///
/// Returns an error if any role does not exist or the transaction fails.
/// Nothing is changed on error.
pub fn replace_user_roles_sqlite(
    conn: &mut SqliteConnection,
    user_id: i64,
    role_ids: &[i64],
    assigned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    serialized_sqlite(conn, |conn| {
        write_user_roles_sqlite(conn, user_id, role_ids, assigned_by)
    })
}

/// Replaces a user's role set atomically (`MySQL`).
///
/// # Errors
///
/// Returns an error if any role does not exist or the transaction fails.
/// Nothing is changed on error.
pub fn replace_user_roles_mysql(
    conn: &mut MysqlConnection,
    user_id: i64,
    role_ids: &[i64],
    assigned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    serialized_mysql(conn, |conn| {
        write_user_roles_mysql(conn, user_id, role_ids, assigned_by)
    })
}

backend_fn! {
fn write_bootstrap_admin(
    conn: &mut _,
    username: &str,
    password: &str,
) -> Result<Option<i64>, PersistenceError> {
    let existing: i64 = users::table.count().get_result(conn)?;
    if existing > 0 {
        return Ok(None);
    }

    let role_id: i64 = roles::table
        .filter(roles::role_name.eq(ADMINISTRATOR_ROLE))
        .select(roles::role_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::InitializationError(format!(
                "Built-in role '{ADMINISTRATOR_ROLE}' is missing"
            ))
        })?;

    let password_hash: String = hash_password(password)?;
    let created_at: String = now_timestamp();

    diesel::insert_into(users::table)
        .values((
            users::username.eq(username),
            users::username_key.eq(username.to_lowercase()),
            users::password_hash.eq(&password_hash),
            users::is_active.eq(1),
            users::created_at.eq(&created_at),
        ))
        .execute(conn)?;
    let user_id: i64 = conn.get_last_insert_rowid()?;

    diesel::insert_into(user_roles::table)
        .values((
            user_roles::user_id.eq(user_id),
            user_roles::role_id.eq(role_id),
            user_roles::assigned_at.eq(&created_at),
        ))
        .execute(conn)?;

    info!(user_id, "Bootstrap administrator created");
    Ok(Some(user_id))
}
}

/// Creates the first administrator when no users exist (`SQLite`).
///
/// # Returns
///
/// The new user's id, or `None` if any user already exists.
///
/// # Errors
///
/// Returns an error if the built-in Administrator role is missing or the
/// transaction fails.
pub fn bootstrap_admin_sqlite(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<Option<i64>, PersistenceError> {
    serialized_sqlite(conn, |conn| {
        write_bootstrap_admin_sqlite(conn, username, password)
    })
}

/// Creates the first administrator when no users exist (`MySQL`).
///
/// # Returns
///
/// The new user's id, or `None` if any user already exists.
///
/// # Errors
///
/// Returns an error if the built-in Administrator role is missing or the
/// transaction fails.
pub fn bootstrap_admin_mysql(
    conn: &mut MysqlConnection,
    username: &str,
    password: &str,
) -> Result<Option<i64>, PersistenceError> {
    serialized_mysql(conn, |conn| {
        lock_writer(conn, "users")?;
        write_bootstrap_admin_mysql(conn, username, password)
    })
}
