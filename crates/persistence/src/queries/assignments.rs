// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{AssignmentData, AssignmentHistoryData, ListFilter};
use crate::diesel_schema::{assignment_history, assignments};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
struct AssignmentRow {
    assignment_id: i64,
    asset_id: i64,
    assigned_to_employee_id: Option<i64>,
    assigned_to_location_id: Option<i64>,
    assigned_at: String,
    expected_return_date: Option<String>,
    returned_at: Option<String>,
    is_active: i32,
    condition_at_assign: Option<String>,
    condition_at_return: Option<String>,
    notes: Option<String>,
    created_at: String,
    created_by: Option<i64>,
}

impl From<AssignmentRow> for AssignmentData {
    fn from(row: AssignmentRow) -> Self {
        Self {
            assignment_id: row.assignment_id,
            asset_id: row.asset_id,
            assigned_to_employee_id: row.assigned_to_employee_id,
            assigned_to_location_id: row.assigned_to_location_id,
            assigned_at: row.assigned_at,
            expected_return_date: row.expected_return_date,
            returned_at: row.returned_at,
            is_active: row.is_active != 0,
            condition_at_assign: row.condition_at_assign,
            condition_at_return: row.condition_at_return,
            notes: row.notes,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignment_history)]
struct AssignmentHistoryRow {
    history_id: i64,
    assignment_id: i64,
    asset_id: i64,
    event: String,
    employee_id: Option<i64>,
    location_id: Option<i64>,
    actor_user_id: Option<i64>,
    occurred_at: String,
    notes: Option<String>,
}

backend_fn! {
/// Lists assignments, newest first, filtered by notes/condition search and active flag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_assignments(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<AssignmentData>, PersistenceError> {
    let mut query = assignments::table
        .select(AssignmentRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            assignments::notes
                .assume_not_null()
                .like(pattern.clone())
                .or(assignments::condition_at_assign.assume_not_null().like(pattern)),
        );
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(assignments::is_active.eq(flag));
    }

    let rows: Vec<AssignmentRow> = query
        .order(assignments::assignment_id.desc())
        .load(conn)?;
    Ok(rows.into_iter().map(AssignmentData::from).collect())
}
}

backend_fn! {
/// Retrieves an assignment by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Option<AssignmentData>, PersistenceError> {
    let row: Option<AssignmentRow> = assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AssignmentData::from))
}
}

backend_fn! {
/// Returns the id of the asset's active assignment, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_active_assignment_id(
    conn: &mut _,
    asset_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::asset_id.eq(asset_id))
        .filter(assignments::is_active.eq(1))
        .select(assignments::assignment_id)
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Counts active assignments.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_assignments(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
}

backend_fn! {
/// Returns the custody history of an asset, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_assignment_history_for_asset(
    conn: &mut _,
    asset_id: i64,
) -> Result<Vec<AssignmentHistoryData>, PersistenceError> {
    let rows: Vec<AssignmentHistoryRow> = assignment_history::table
        .filter(assignment_history::asset_id.eq(asset_id))
        .select(AssignmentHistoryRow::as_select())
        .order(assignment_history::history_id.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| AssignmentHistoryData {
            history_id: row.history_id,
            assignment_id: row.assignment_id,
            asset_id: row.asset_id,
            event: row.event,
            employee_id: row.employee_id,
            location_id: row.location_id,
            actor_user_id: row.actor_user_id,
            occurred_at: row.occurred_at,
            notes: row.notes,
        })
        .collect())
}
}
