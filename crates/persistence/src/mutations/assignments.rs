// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Asset assignment workflow.
//!
//! An asset has at most one active assignment. Assigning and returning each
//! run in one writer-serialized transaction that also moves the asset's
//! status, holder and location and appends to `assignment_history`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_domain::{AssetStatus, AssignmentEvent};
use tracing::{info, warn};

use crate::backend::{PersistenceBackend, serialized_mysql, serialized_sqlite};
use crate::clock::now_timestamp;
use crate::data_models::NewAssignment;
use crate::diesel_schema::{assets, assignment_history, assignments};
use crate::error::PersistenceError;
use crate::mutations::require_row;

backend_fn! {
fn open_assignment(
    conn: &mut _,
    new: &NewAssignment,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    if new.employee_id.is_none() && new.location_id.is_none() {
        return Err(PersistenceError::InvalidInput(String::from(
            "An assignment needs an employee or a location",
        )));
    }

    let asset_exists: i64 = assets::table
        .filter(assets::asset_id.eq(new.asset_id))
        .count()
        .get_result(conn)?;
    if asset_exists == 0 {
        return Err(PersistenceError::NotFound(format!("asset {}", new.asset_id)));
    }

    let active: i64 = assignments::table
        .filter(assignments::asset_id.eq(new.asset_id))
        .filter(assignments::is_active.eq(1))
        .count()
        .get_result(conn)?;
    if active > 0 {
        warn!(asset_id = new.asset_id, "Asset already has an active assignment");
        return Err(PersistenceError::ActiveAssignmentExists {
            asset_id: new.asset_id,
        });
    }

    let now: String = now_timestamp();
    diesel::insert_into(assignments::table)
        .values((
            assignments::asset_id.eq(new.asset_id),
            assignments::assigned_to_employee_id.eq(new.employee_id),
            assignments::assigned_to_location_id.eq(new.location_id),
            assignments::assigned_at.eq(&now),
            assignments::expected_return_date.eq(new.expected_return_date.as_deref()),
            assignments::is_active.eq(1),
            assignments::condition_at_assign.eq(new.condition_at_assign.as_deref()),
            assignments::notes.eq(new.notes.as_deref()),
            assignments::created_at.eq(&now),
            assignments::created_by.eq(created_by),
        ))
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::DuplicateName(_) => PersistenceError::ActiveAssignmentExists {
                asset_id: new.asset_id,
            },
            other => other,
        })?;
    let assignment_id: i64 = conn.get_last_insert_rowid()?;

    diesel::update(assets::table.filter(assets::asset_id.eq(new.asset_id)))
        .set((
            assets::status.eq(AssetStatus::Assigned.as_str()),
            assets::current_holder_employee_id.eq(new.employee_id),
            assets::current_location_id.eq(new.location_id),
        ))
        .execute(conn)?;

    diesel::insert_into(assignment_history::table)
        .values((
            assignment_history::assignment_id.eq(assignment_id),
            assignment_history::asset_id.eq(new.asset_id),
            assignment_history::event.eq(AssignmentEvent::Assigned.as_str()),
            assignment_history::employee_id.eq(new.employee_id),
            assignment_history::location_id.eq(new.location_id),
            assignment_history::actor_user_id.eq(created_by),
            assignment_history::occurred_at.eq(&now),
            assignment_history::notes.eq(new.notes.as_deref()),
        ))
        .execute(conn)?;

    info!(assignment_id, asset_id = new.asset_id, "Asset assigned");
    Ok(assignment_id)
}
}

/// Assigns an asset (`SQLite`).
///
/// # Errors
///
/// Returns `InvalidInput` without a target, `NotFound` for an unknown
/// asset, `ActiveAssignmentExists` if the asset is already assigned,
/// `Conflict` for an unknown employee or location, or a database error.
/// Nothing is written on error.
pub fn create_assignment_sqlite(
    conn: &mut SqliteConnection,
    new: &NewAssignment,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    serialized_sqlite(conn, |conn| open_assignment_sqlite(conn, new, created_by))
}

/// Assigns an asset (`MySQL`).
///
/// The asset row and its assignment rows are locked before the checks.
///
/// # Errors
///
/// See [`create_assignment_sqlite`].
pub fn create_assignment_mysql(
    conn: &mut MysqlConnection,
    new: &NewAssignment,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    serialized_mysql(conn, |conn| {
        assets::table
            .filter(assets::asset_id.eq(new.asset_id))
            .select(assets::asset_id)
            .for_update()
            .load::<i64>(conn)?;
        assignments::table
            .filter(assignments::asset_id.eq(new.asset_id))
            .select(assignments::assignment_id)
            .for_update()
            .load::<i64>(conn)?;
        open_assignment_mysql(conn, new, created_by)
    })
}

backend_fn! {
fn close_assignment(
    conn: &mut _,
    assignment_id: i64,
    condition_at_return: Option<&str>,
    returned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    let (asset_id, is_active, employee_id, location_id): (i64, i32, Option<i64>, Option<i64>) =
        assignments::table
            .filter(assignments::assignment_id.eq(assignment_id))
            .select((
                assignments::asset_id,
                assignments::is_active,
                assignments::assigned_to_employee_id,
                assignments::assigned_to_location_id,
            ))
            .first(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("assignment {assignment_id}")))?;

    if is_active == 0 {
        return Err(PersistenceError::Conflict(format!(
            "assignment {assignment_id} has already been returned"
        )));
    }

    let now: String = now_timestamp();
    diesel::update(assignments::table.filter(assignments::assignment_id.eq(assignment_id)))
        .set((
            assignments::is_active.eq(0),
            assignments::returned_at.eq(Some(now.as_str())),
            assignments::condition_at_return.eq(condition_at_return),
        ))
        .execute(conn)?;

    diesel::update(assets::table.filter(assets::asset_id.eq(asset_id)))
        .set((
            assets::status.eq(AssetStatus::Available.as_str()),
            assets::current_holder_employee_id.eq(None::<i64>),
            assets::current_location_id.eq(None::<i64>),
        ))
        .execute(conn)?;

    diesel::insert_into(assignment_history::table)
        .values((
            assignment_history::assignment_id.eq(assignment_id),
            assignment_history::asset_id.eq(asset_id),
            assignment_history::event.eq(AssignmentEvent::Returned.as_str()),
            assignment_history::employee_id.eq(employee_id),
            assignment_history::location_id.eq(location_id),
            assignment_history::actor_user_id.eq(returned_by),
            assignment_history::occurred_at.eq(&now),
            assignment_history::notes.eq(condition_at_return),
        ))
        .execute(conn)?;

    info!(assignment_id, asset_id, "Asset returned");
    Ok(())
}
}

/// Returns an assigned asset (`SQLite`).
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if the assignment is already closed, or
/// a database error. Nothing is written on error.
pub fn return_assignment_sqlite(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    condition_at_return: Option<&str>,
    returned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    serialized_sqlite(conn, |conn| {
        close_assignment_sqlite(conn, assignment_id, condition_at_return, returned_by)
    })
}

/// Returns an assigned asset (`MySQL`).
///
/// # Errors
///
/// See [`return_assignment_sqlite`].
pub fn return_assignment_mysql(
    conn: &mut MysqlConnection,
    assignment_id: i64,
    condition_at_return: Option<&str>,
    returned_by: Option<i64>,
) -> Result<(), PersistenceError> {
    serialized_mysql(conn, |conn| {
        assignments::table
            .filter(assignments::assignment_id.eq(assignment_id))
            .select(assignments::assignment_id)
            .for_update()
            .load::<i64>(conn)?;
        close_assignment_mysql(conn, assignment_id, condition_at_return, returned_by)
    })
}

backend_fn! {
/// Updates the descriptive fields of an assignment.
///
/// Custody (asset, employee, location, active flag) only changes through
/// assigning and returning.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn update_assignment(
    conn: &mut _,
    assignment_id: i64,
    expected_return_date: Option<&str>,
    condition_at_assign: Option<&str>,
    notes: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        assignments::table.filter(assignments::assignment_id.eq(assignment_id)),
    )
    .set((
        assignments::expected_return_date.eq(expected_return_date),
        assignments::condition_at_assign.eq(condition_at_assign),
        assignments::notes.eq(notes),
    ))
    .execute(conn)?;
    require_row(rows, "assignment", assignment_id)
}
}

backend_fn! {
/// Deletes a closed assignment. Its history rows are kept.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if the assignment is still active, or a
/// database error.
pub fn delete_assignment(conn: &mut _, assignment_id: i64) -> Result<(), PersistenceError> {
    let is_active: i32 = assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(assignments::is_active)
        .first(conn)?;
    if is_active != 0 {
        return Err(PersistenceError::Conflict(format!(
            "assignment {assignment_id} is active; return the asset first"
        )));
    }

    info!("Deleting assignment ID: {}", assignment_id);
    let rows: usize = diesel::delete(
        assignments::table.filter(assignments::assignment_id.eq(assignment_id)),
    )
    .execute(conn)?;
    require_row(rows, "assignment", assignment_id)
}
}
