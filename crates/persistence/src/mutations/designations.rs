// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Designation (job title) mutations.
//!
//! Designation ids are not allocated by the database. `create_designation`
//! computes `MAX(job_title_id) + 1` inside a writer-serialized transaction,
//! so the duplicate check, the id computation and the insert observe one
//! consistent snapshot and cannot interleave with a concurrent writer.

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_domain::{name_key, normalize_name};
use tracing::{debug, info};

use crate::backend::mysql::lock_writer;
use crate::backend::{serialized_mysql, serialized_sqlite};
use crate::clock::now_timestamp;
use crate::diesel_schema::designations;
use crate::error::PersistenceError;
use crate::mutations::{flip, rename_duplicate, require_row};

backend_fn! {
fn insert_next_designation(
    conn: &mut _,
    title: &str,
    grade: Option<&str>,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    let key: String = name_key(title);

    let existing: i64 = designations::table
        .filter(designations::title_key.eq(&key))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        debug!("Designation '{}' already exists", title);
        return Err(PersistenceError::DuplicateName(title.to_string()));
    }

    let current_max: Option<i64> = designations::table
        .select(max(designations::job_title_id))
        .first(conn)?;
    let job_title_id: i64 = current_max.unwrap_or(0) + 1;

    diesel::insert_into(designations::table)
        .values((
            designations::job_title_id.eq(job_title_id),
            designations::title.eq(title),
            designations::title_key.eq(&key),
            designations::grade.eq(grade),
            designations::is_active.eq(1),
            designations::created_at.eq(now_timestamp()),
            designations::created_by.eq(created_by),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, title))?;

    info!(job_title_id, "Designation created: {}", title);
    Ok(job_title_id)
}
}

fn normalized_title(title: &str) -> Result<String, PersistenceError> {
    let title: String = normalize_name(title);
    if title.is_empty() {
        return Err(PersistenceError::InvalidInput(String::from(
            "Designation title is required",
        )));
    }
    Ok(title)
}

/// Creates a designation with the next free id (`SQLite`).
///
/// The title is whitespace-normalized. Titles that differ only in case or
/// spacing are duplicates.
///
/// # Returns
///
/// The allocated `job_title_id` (1 on an empty table).
///
/// # Errors
///
/// Returns `InvalidInput` for a blank title, `DuplicateName` if the
/// normalized title exists, or a database error (including lock timeouts).
/// Nothing is written on error.
pub fn create_designation_sqlite(
    conn: &mut SqliteConnection,
    title: &str,
    grade: Option<&str>,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    let title: String = normalized_title(title)?;
    serialized_sqlite(conn, |conn| {
        insert_next_designation_sqlite(conn, &title, grade, created_by)
    })
}

/// Creates a designation with the next free id (`MySQL`).
///
/// See [`create_designation_sqlite`]. The `designations` writer lock is
/// taken before the duplicate check, so a concurrent creator waits and then
/// sees the committed row.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank title, `DuplicateName` if the
/// normalized title exists, or a database error (including lock wait
/// timeouts).
pub fn create_designation_mysql(
    conn: &mut MysqlConnection,
    title: &str,
    grade: Option<&str>,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    let title: String = normalized_title(title)?;
    serialized_mysql(conn, |conn| {
        lock_writer(conn, "designations")?;
        insert_next_designation_mysql(conn, &title, grade, created_by)
    })
}

backend_fn! {
/// Updates a designation's title and grade.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank title, `NotFound`, `DuplicateName`
/// if another designation has the same normalized title, or a database error.
pub fn update_designation(
    conn: &mut _,
    job_title_id: i64,
    title: &str,
    grade: Option<&str>,
) -> Result<(), PersistenceError> {
    let title: String = normalize_name(title);
    if title.is_empty() {
        return Err(PersistenceError::InvalidInput(String::from(
            "Designation title is required",
        )));
    }

    let rows: usize = diesel::update(
        designations::table.filter(designations::job_title_id.eq(job_title_id)),
    )
    .set((
        designations::title.eq(&title),
        designations::title_key.eq(name_key(&title)),
        designations::grade.eq(grade),
    ))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, &title))?;
    require_row(rows, "designation", job_title_id)
}
}

backend_fn! {
/// Flips a designation's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn toggle_designation(conn: &mut _, job_title_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = designations::table
        .filter(designations::job_title_id.eq(job_title_id))
        .select(designations::is_active)
        .first(conn)?;
    let next: i32 = flip(current);
    diesel::update(designations::table.filter(designations::job_title_id.eq(job_title_id)))
        .set(designations::is_active.eq(next))
        .execute(conn)?;
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes a designation.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if employees still hold it, or a
/// database error.
pub fn delete_designation(conn: &mut _, job_title_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting designation ID: {}", job_title_id);
    let rows: usize = diesel::delete(
        designations::table.filter(designations::job_title_id.eq(job_title_id)),
    )
    .execute(conn)?;
    require_row(rows, "designation", job_title_id)
}
}
