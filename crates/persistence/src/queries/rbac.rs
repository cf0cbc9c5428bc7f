// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role and permission queries.
//!
//! Effective permissions are resolved as
//! `user_roles ⋈ role_permissions ⋈ permissions` for one user. There is no
//! role hierarchy; the result is the plain union of permission codes.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{ListFilter, PermissionData, RoleData};
use crate::diesel_schema::{permissions, role_permissions, roles, user_roles};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = roles)]
struct RoleRow {
    role_id: i64,
    role_name: String,
    description: Option<String>,
}

impl From<RoleRow> for RoleData {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: row.role_id,
            role_name: row.role_name,
            description: row.description,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = permissions)]
struct PermissionRow {
    permission_id: i64,
    code: String,
    description: Option<String>,
}

impl From<PermissionRow> for PermissionData {
    fn from(row: PermissionRow) -> Self {
        Self {
            permission_id: row.permission_id,
            code: row.code,
            description: row.description,
        }
    }
}

backend_fn! {
/// Resolves the distinct permission codes granted to a user through their roles.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_permission_codes_for_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    debug!("Resolving permissions for user ID: {}", user_id);

    let role_ids: Vec<i64> = user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .select(user_roles::role_id)
        .load(conn)?;

    if role_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(role_permissions::table
        .inner_join(permissions::table)
        .filter(role_permissions::role_id.eq_any(role_ids))
        .select(permissions::code)
        .distinct()
        .order(permissions::code.asc())
        .load(conn)?)
}
}

backend_fn! {
/// Lists roles, filtered by name/description search.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_roles(conn: &mut _, filter: &ListFilter) -> Result<Vec<RoleData>, PersistenceError> {
    let mut query = roles::table.select(RoleRow::as_select()).into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            roles::role_name
                .like(pattern.clone())
                .or(roles::description.assume_not_null().like(pattern)),
        );
    }

    let rows: Vec<RoleRow> = query.order(roles::role_name.asc()).load(conn)?;
    Ok(rows.into_iter().map(RoleData::from).collect())
}
}

backend_fn! {
/// Retrieves a role by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_role(conn: &mut _, role_id: i64) -> Result<Option<RoleData>, PersistenceError> {
    let row: Option<RoleRow> = roles::table
        .filter(roles::role_id.eq(role_id))
        .select(RoleRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(RoleData::from))
}
}

backend_fn! {
/// Retrieves a role by exact name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_role_by_name(
    conn: &mut _,
    role_name: &str,
) -> Result<Option<RoleData>, PersistenceError> {
    let row: Option<RoleRow> = roles::table
        .filter(roles::role_name.eq(role_name))
        .select(RoleRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(RoleData::from))
}
}

backend_fn! {
/// Returns the ids of the permissions granted by a role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_role_permission_ids(conn: &mut _, role_id: i64) -> Result<Vec<i64>, PersistenceError> {
    Ok(role_permissions::table
        .filter(role_permissions::role_id.eq(role_id))
        .select(role_permissions::permission_id)
        .order(role_permissions::permission_id.asc())
        .load(conn)?)
}
}

backend_fn! {
/// Lists the permission catalog, filtered by code/description search.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_permissions(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<PermissionData>, PersistenceError> {
    let mut query = permissions::table
        .select(PermissionRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            permissions::code
                .like(pattern.clone())
                .or(permissions::description.assume_not_null().like(pattern)),
        );
    }

    let rows: Vec<PermissionRow> = query.order(permissions::code.asc()).load(conn)?;
    Ok(rows.into_iter().map(PermissionData::from).collect())
}
}

backend_fn! {
/// Retrieves a permission by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_permission(
    conn: &mut _,
    permission_id: i64,
) -> Result<Option<PermissionData>, PersistenceError> {
    let row: Option<PermissionRow> = permissions::table
        .filter(permissions::permission_id.eq(permission_id))
        .select(PermissionRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(PermissionData::from))
}
}
