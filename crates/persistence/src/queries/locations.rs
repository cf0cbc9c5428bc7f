// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{ListFilter, LocationData};
use crate::diesel_schema::locations;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = locations)]
struct LocationRow {
    location_id: i64,
    location_code: String,
    location_type: Option<String>,
    location_name: String,
    address: Option<String>,
    phone: Option<String>,
    district: Option<String>,
    is_active: i32,
    created_at: String,
    created_by: Option<i64>,
}

impl From<LocationRow> for LocationData {
    fn from(row: LocationRow) -> Self {
        Self {
            location_id: row.location_id,
            location_code: row.location_code,
            location_type: row.location_type,
            location_name: row.location_name,
            address: row.address,
            phone: row.phone,
            district: row.district,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

backend_fn! {
/// Lists locations, filtered by code/name/district search and active flag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<LocationData>, PersistenceError> {
    let mut query = locations::table
        .select(LocationRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            locations::location_code
                .like(pattern.clone())
                .or(locations::location_name.like(pattern.clone()))
                .or(locations::district.assume_not_null().like(pattern)),
        );
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(locations::is_active.eq(flag));
    }

    let rows: Vec<LocationRow> = query.order(locations::location_code.asc()).load(conn)?;
    Ok(rows.into_iter().map(LocationData::from).collect())
}
}

backend_fn! {
/// Retrieves a location by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_location(
    conn: &mut _,
    location_id: i64,
) -> Result<Option<LocationData>, PersistenceError> {
    let row: Option<LocationRow> = locations::table
        .filter(locations::location_id.eq(location_id))
        .select(LocationRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(LocationData::from))
}
}
