// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Queries for small lookup tables: departments, leave types, asset categories.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{AssetCategoryData, DepartmentData, LeaveTypeData, ListFilter};
use crate::diesel_schema::{asset_categories, departments, leave_types};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = departments)]
struct DepartmentRow {
    department_id: i64,
    department_name: String,
    is_active: i32,
}

impl From<DepartmentRow> for DepartmentData {
    fn from(row: DepartmentRow) -> Self {
        Self {
            department_id: row.department_id,
            department_name: row.department_name,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_types)]
struct LeaveTypeRow {
    leave_type_id: i64,
    leave_name: String,
    days_per_year: i32,
    is_active: i32,
}

impl From<LeaveTypeRow> for LeaveTypeData {
    fn from(row: LeaveTypeRow) -> Self {
        Self {
            leave_type_id: row.leave_type_id,
            leave_name: row.leave_name,
            days_per_year: row.days_per_year,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = asset_categories)]
struct AssetCategoryRow {
    category_id: i64,
    category_name: String,
}

impl From<AssetCategoryRow> for AssetCategoryData {
    fn from(row: AssetCategoryRow) -> Self {
        Self {
            category_id: row.category_id,
            category_name: row.category_name,
        }
    }
}

backend_fn! {
/// Lists departments.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<DepartmentData>, PersistenceError> {
    let mut query = departments::table
        .select(DepartmentRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(departments::department_name.like(pattern));
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(departments::is_active.eq(flag));
    }

    let rows: Vec<DepartmentRow> = query
        .order(departments::department_name.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(DepartmentData::from).collect())
}
}

backend_fn! {
/// Retrieves a department by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_department(
    conn: &mut _,
    department_id: i64,
) -> Result<Option<DepartmentData>, PersistenceError> {
    let row: Option<DepartmentRow> = departments::table
        .filter(departments::department_id.eq(department_id))
        .select(DepartmentRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(DepartmentData::from))
}
}

backend_fn! {
/// Lists leave types.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_leave_types(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<LeaveTypeData>, PersistenceError> {
    let mut query = leave_types::table
        .select(LeaveTypeRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(leave_types::leave_name.like(pattern));
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(leave_types::is_active.eq(flag));
    }

    let rows: Vec<LeaveTypeRow> = query.order(leave_types::leave_name.asc()).load(conn)?;
    Ok(rows.into_iter().map(LeaveTypeData::from).collect())
}
}

backend_fn! {
/// Retrieves a leave type by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_leave_type(
    conn: &mut _,
    leave_type_id: i64,
) -> Result<Option<LeaveTypeData>, PersistenceError> {
    let row: Option<LeaveTypeRow> = leave_types::table
        .filter(leave_types::leave_type_id.eq(leave_type_id))
        .select(LeaveTypeRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(LeaveTypeData::from))
}
}

backend_fn! {
/// Lists asset categories.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_asset_categories(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<AssetCategoryData>, PersistenceError> {
    let mut query = asset_categories::table
        .select(AssetCategoryRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(asset_categories::category_name.like(pattern));
    }

    let rows: Vec<AssetCategoryRow> = query
        .order(asset_categories::category_name.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(AssetCategoryData::from).collect())
}
}

backend_fn! {
/// Retrieves an asset category by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_asset_category(
    conn: &mut _,
    category_id: i64,
) -> Result<Option<AssetCategoryData>, PersistenceError> {
    let row: Option<AssetCategoryRow> = asset_categories::table
        .filter(asset_categories::category_id.eq(category_id))
        .select(AssetCategoryRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AssetCategoryData::from))
}
}
