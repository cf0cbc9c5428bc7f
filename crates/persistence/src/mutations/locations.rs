// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Location mutations.
//!
//! Location codes are unique after whitespace normalization and ignoring
//! case. Creation runs the duplicate check and the insert in one
//! writer-serialized transaction.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_domain::name_key;
use tracing::info;

use crate::backend::mysql::lock_writer;
use crate::backend::{PersistenceBackend, serialized_mysql, serialized_sqlite};
use crate::clock::now_timestamp;
use crate::data_models::LocationFields;
use crate::diesel_schema::locations;
use crate::error::PersistenceError;
use crate::mutations::{flip, rename_duplicate, require_row};

backend_fn! {
fn insert_location(
    conn: &mut _,
    fields: &LocationFields,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    let key: String = name_key(&fields.location_code);

    let existing: i64 = locations::table
        .filter(locations::location_code_key.eq(&key))
        .count()
        .get_result(conn)?;
    if existing > 0 {
        return Err(PersistenceError::DuplicateName(fields.location_code.clone()));
    }

    diesel::insert_into(locations::table)
        .values((
            locations::location_code.eq(&fields.location_code),
            locations::location_code_key.eq(&key),
            locations::location_type.eq(fields.location_type.as_deref()),
            locations::location_name.eq(&fields.location_name),
            locations::address.eq(fields.address.as_deref()),
            locations::phone.eq(fields.phone.as_deref()),
            locations::district.eq(fields.district.as_deref()),
            locations::is_active.eq(1),
            locations::created_at.eq(now_timestamp()),
            locations::created_by.eq(created_by),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, &fields.location_code))?;

    let location_id: i64 = conn.get_last_insert_rowid()?;
    info!(location_id, "Location created: {}", fields.location_code);
    Ok(location_id)
}
}

/// Creates a location (`SQLite`).
///
/// # Errors
///
/// Returns `DuplicateName` if the normalized code exists, or a database
/// error. Nothing is written on error.
pub fn create_location_sqlite(
    conn: &mut SqliteConnection,
    fields: &LocationFields,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    serialized_sqlite(conn, |conn| insert_location_sqlite(conn, fields, created_by))
}

/// Creates a location (`MySQL`).
///
/// # Errors
///
/// Returns `DuplicateName` if the normalized code exists, or a database
/// error. Nothing is written on error.
pub fn create_location_mysql(
    conn: &mut MysqlConnection,
    fields: &LocationFields,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    serialized_mysql(conn, |conn| {
        lock_writer(conn, "locations")?;
        insert_location_mysql(conn, fields, created_by)
    })
}

backend_fn! {
/// Updates a location.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName` if another location has the same
/// normalized code, or a database error.
pub fn update_location(
    conn: &mut _,
    location_id: i64,
    fields: &LocationFields,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        locations::table.filter(locations::location_id.eq(location_id)),
    )
    .set((
        locations::location_code.eq(&fields.location_code),
        locations::location_code_key.eq(name_key(&fields.location_code)),
        locations::location_type.eq(fields.location_type.as_deref()),
        locations::location_name.eq(&fields.location_name),
        locations::address.eq(fields.address.as_deref()),
        locations::phone.eq(fields.phone.as_deref()),
        locations::district.eq(fields.district.as_deref()),
    ))
    .execute(conn)
    .map_err(|e| rename_duplicate(e, &fields.location_code))?;
    require_row(rows, "location", location_id)
}
}

backend_fn! {
/// Flips a location's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn toggle_location(conn: &mut _, location_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = locations::table
        .filter(locations::location_id.eq(location_id))
        .select(locations::is_active)
        .first(conn)?;
    let next: i32 = flip(current);
    diesel::update(locations::table.filter(locations::location_id.eq(location_id)))
        .set(locations::is_active.eq(next))
        .execute(conn)?;
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes a location.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if employees, assets or assignments
/// still reference it, or a database error.
pub fn delete_location(conn: &mut _, location_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting location ID: {}", location_id);
    let rows: usize = diesel::delete(
        locations::table.filter(locations::location_id.eq(location_id)),
    )
    .execute(conn)?;
    require_row(rows, "location", location_id)
}
}
