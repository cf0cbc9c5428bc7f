// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutations for departments, leave types and asset categories.
//!
//! Uniqueness of these names is left to the database's unique keys; a
//! collision surfaces as `DuplicateName`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{asset_categories, departments, leave_types};
use crate::error::PersistenceError;
use crate::mutations::{flip, rename_duplicate, require_row};

backend_fn! {
/// Creates a department.
///
/// # Errors
///
/// Returns `DuplicateName` if the name is taken, or a database error.
pub fn create_department(conn: &mut _, department_name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(departments::table)
        .values((
            departments::department_name.eq(department_name),
            departments::is_active.eq(1),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, department_name))?;
    let department_id: i64 = conn.get_last_insert_rowid()?;
    info!(department_id, "Department created: {}", department_name);
    Ok(department_id)
}
}

backend_fn! {
/// Renames a department.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, or a database error.
pub fn update_department(
    conn: &mut _,
    department_id: i64,
    department_name: &str,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        departments::table.filter(departments::department_id.eq(department_id)),
    )
    .set(departments::department_name.eq(department_name))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, department_name))?;
    require_row(rows, "department", department_id)
}
}

backend_fn! {
/// Flips a department's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn toggle_department(conn: &mut _, department_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = departments::table
        .filter(departments::department_id.eq(department_id))
        .select(departments::is_active)
        .first(conn)?;
    let next: i32 = flip(current);
    diesel::update(departments::table.filter(departments::department_id.eq(department_id)))
        .set(departments::is_active.eq(next))
        .execute(conn)?;
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes a department.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if employees still reference it, or a
/// database error.
pub fn delete_department(conn: &mut _, department_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting department ID: {}", department_id);
    let rows: usize = diesel::delete(
        departments::table.filter(departments::department_id.eq(department_id)),
    )
    .execute(conn)?;
    require_row(rows, "department", department_id)
}
}

backend_fn! {
/// Creates a leave type.
///
/// # Errors
///
/// Returns `DuplicateName` if the name is taken, or a database error.
pub fn create_leave_type(
    conn: &mut _,
    leave_name: &str,
    days_per_year: i32,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(leave_types::table)
        .values((
            leave_types::leave_name.eq(leave_name),
            leave_types::days_per_year.eq(days_per_year),
            leave_types::is_active.eq(1),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, leave_name))?;
    let leave_type_id: i64 = conn.get_last_insert_rowid()?;
    info!(leave_type_id, "Leave type created: {}", leave_name);
    Ok(leave_type_id)
}
}

backend_fn! {
/// Updates a leave type.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, or a database error.
pub fn update_leave_type(
    conn: &mut _,
    leave_type_id: i64,
    leave_name: &str,
    days_per_year: i32,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        leave_types::table.filter(leave_types::leave_type_id.eq(leave_type_id)),
    )
    .set((
        leave_types::leave_name.eq(leave_name),
        leave_types::days_per_year.eq(days_per_year),
    ))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, leave_name))?;
    require_row(rows, "leave type", leave_type_id)
}
}

backend_fn! {
/// Flips a leave type's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn toggle_leave_type(conn: &mut _, leave_type_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = leave_types::table
        .filter(leave_types::leave_type_id.eq(leave_type_id))
        .select(leave_types::is_active)
        .first(conn)?;
    let next: i32 = flip(current);
    diesel::update(leave_types::table.filter(leave_types::leave_type_id.eq(leave_type_id)))
        .set(leave_types::is_active.eq(next))
        .execute(conn)?;
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes a leave type.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn delete_leave_type(conn: &mut _, leave_type_id: i64) -> Result<(), PersistenceError> {
    let rows: usize = diesel::delete(
        leave_types::table.filter(leave_types::leave_type_id.eq(leave_type_id)),
    )
    .execute(conn)?;
    require_row(rows, "leave type", leave_type_id)
}
}

backend_fn! {
/// Creates an asset category.
///
/// # Errors
///
/// Returns `DuplicateName` if the name is taken, or a database error.
pub fn create_asset_category(conn: &mut _, category_name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(asset_categories::table)
        .values(asset_categories::category_name.eq(category_name))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, category_name))?;
    let category_id: i64 = conn.get_last_insert_rowid()?;
    info!(category_id, "Asset category created: {}", category_name);
    Ok(category_id)
}
}

backend_fn! {
/// Renames an asset category.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, or a database error.
pub fn update_asset_category(
    conn: &mut _,
    category_id: i64,
    category_name: &str,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        asset_categories::table.filter(asset_categories::category_id.eq(category_id)),
    )
    .set(asset_categories::category_name.eq(category_name))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, category_name))?;
    require_row(rows, "asset category", category_id)
}
}

backend_fn! {
/// Deletes an asset category.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if assets still use it, or a database error.
pub fn delete_asset_category(conn: &mut _, category_id: i64) -> Result<(), PersistenceError> {
    let rows: usize = diesel::delete(
        asset_categories::table.filter(asset_categories::category_id.eq(category_id)),
    )
    .execute(conn)?;
    require_row(rows, "asset category", category_id)
}
}
