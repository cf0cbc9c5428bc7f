// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role and permission mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::{PersistenceBackend, serialized_mysql, serialized_sqlite};
use crate::diesel_schema::{permissions, role_permissions, roles};
use crate::error::PersistenceError;
use crate::mutations::{rename_duplicate, require_row};

backend_fn! {
/// Creates a role.
///
/// # Errors
///
/// Returns `DuplicateName` if the name is taken, or a database error.
pub fn create_role(
    conn: &mut _,
    role_name: &str,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(roles::table)
        .values((
            roles::role_name.eq(role_name),
            roles::description.eq(description),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, role_name))?;
    let role_id: i64 = conn.get_last_insert_rowid()?;
    info!(role_id, "Role created: {}", role_name);
    Ok(role_id)
}
}

backend_fn! {
/// Renames a role and updates its description.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, or a database error.
pub fn update_role(
    conn: &mut _,
    role_id: i64,
    role_name: &str,
    description: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(roles::table.filter(roles::role_id.eq(role_id)))
        .set((
            roles::role_name.eq(role_name),
            roles::description.eq(description),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, role_name))?;
    require_row(rows, "role", role_id)
}
}

backend_fn! {
/// Deletes a role. Its permission and user links cascade.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn delete_role(conn: &mut _, role_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting role ID: {}", role_id);
    let rows: usize = diesel::delete(roles::table.filter(roles::role_id.eq(role_id)))
        .execute(conn)?;
    require_row(rows, "role", role_id)
}
}

backend_fn! {
fn write_role_permissions(
    conn: &mut _,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<(), PersistenceError> {
    diesel::delete(role_permissions::table.filter(role_permissions::role_id.eq(role_id)))
        .execute(conn)?;

    for permission_id in permission_ids {
        diesel::insert_into(role_permissions::table)
            .values((
                role_permissions::role_id.eq(role_id),
                role_permissions::permission_id.eq(*permission_id),
            ))
            .execute(conn)?;
    }

    info!(role_id, permissions = permission_ids.len(), "Replaced role permissions");
    Ok(())
}
}

/// Replaces a role's permission set atomically (`SQLite`).
///
/// # Errors
///
/// Returns an error if any permission does not exist or the transaction
/// fails. Nothing is changed on error.
pub fn replace_role_permissions_sqlite(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<(), PersistenceError> {
    serialized_sqlite(conn, |conn| {
        write_role_permissions_sqlite(conn, role_id, permission_ids)
    })
}

/// Replaces a role's permission set atomically (`MySQL`).
///
/// # Errors
///
/// Returns an error if any permission does not exist or the transaction
/// fails. Nothing is changed on error.
pub fn replace_role_permissions_mysql(
    conn: &mut MysqlConnection,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<(), PersistenceError> {
    serialized_mysql(conn, |conn| {
        write_role_permissions_mysql(conn, role_id, permission_ids)
    })
}

backend_fn! {
/// Adds a permission code to the catalog.
///
/// # Errors
///
/// Returns `DuplicateName` if the code exists, or a database error.
pub fn create_permission(
    conn: &mut _,
    code: &str,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(permissions::table)
        .values((
            permissions::code.eq(code),
            permissions::description.eq(description),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, code))?;
    let permission_id: i64 = conn.get_last_insert_rowid()?;
    info!(permission_id, "Permission created: {}", code);
    Ok(permission_id)
}
}

backend_fn! {
/// Updates a permission's code and description.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, or a database error.
pub fn update_permission(
    conn: &mut _,
    permission_id: i64,
    code: &str,
    description: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        permissions::table.filter(permissions::permission_id.eq(permission_id)),
    )
    .set((
        permissions::code.eq(code),
        permissions::description.eq(description),
    ))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, code))?;
    require_row(rows, "permission", permission_id)
}
}

backend_fn! {
/// Removes a permission from the catalog. Role links cascade.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn delete_permission(conn: &mut _, permission_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting permission ID: {}", permission_id);
    let rows: usize = diesel::delete(
        permissions::table.filter(permissions::permission_id.eq(permission_id)),
    )
    .execute(conn)?;
    require_row(rows, "permission", permission_id)
}
}
