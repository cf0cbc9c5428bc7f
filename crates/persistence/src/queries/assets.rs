// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_domain::AssetStatus;

use crate::data_models::{AssetData, ListFilter};
use crate::diesel_schema::assets;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = assets)]
struct AssetRow {
    asset_id: i64,
    asset_tag: String,
    asset_name: String,
    category_id: i64,
    current_holder_employee_id: Option<i64>,
    current_location_id: Option<i64>,
    status: String,
}

impl From<AssetRow> for AssetData {
    fn from(row: AssetRow) -> Self {
        Self {
            asset_id: row.asset_id,
            asset_tag: row.asset_tag,
            asset_name: row.asset_name,
            category_id: row.category_id,
            current_holder_employee_id: row.current_holder_employee_id,
            current_location_id: row.current_location_id,
            status: row.status,
        }
    }
}

backend_fn! {
/// Lists assets, filtered by tag/name/status search.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_assets(conn: &mut _, filter: &ListFilter) -> Result<Vec<AssetData>, PersistenceError> {
    let mut query = assets::table.select(AssetRow::as_select()).into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            assets::asset_tag
                .like(pattern.clone())
                .or(assets::asset_name.like(pattern.clone()))
                .or(assets::status.like(pattern)),
        );
    }

    let rows: Vec<AssetRow> = query.order(assets::asset_tag.asc()).load(conn)?;
    Ok(rows.into_iter().map(AssetData::from).collect())
}
}

backend_fn! {
/// Retrieves an asset by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_asset(conn: &mut _, asset_id: i64) -> Result<Option<AssetData>, PersistenceError> {
    let row: Option<AssetRow> = assets::table
        .filter(assets::asset_id.eq(asset_id))
        .select(AssetRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AssetData::from))
}
}

backend_fn! {
/// Counts assets, optionally only those in one status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_assets(conn: &mut _, status: Option<AssetStatus>) -> Result<i64, PersistenceError> {
    let mut query = assets::table.count().into_boxed();
    if let Some(status) = status {
        query = query.filter(assets::status.eq(status.as_str()));
    }
    Ok(query.get_result(conn)?)
}
}
