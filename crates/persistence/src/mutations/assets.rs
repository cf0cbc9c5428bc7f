// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Asset mutations.
//!
//! Holder and location columns are owned by the assignment workflow and are
//! never written here.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::AssetFields;
use crate::diesel_schema::{assets, assignments};
use crate::error::PersistenceError;
use crate::mutations::{rename_duplicate, require_row};

backend_fn! {
/// Creates an asset.
///
/// # Errors
///
/// Returns `DuplicateName` if the tag is taken, `Conflict` for an unknown
/// category, or a database error.
pub fn create_asset(conn: &mut _, fields: &AssetFields) -> Result<i64, PersistenceError> {
    diesel::insert_into(assets::table)
        .values((
            assets::asset_tag.eq(&fields.asset_tag),
            assets::asset_name.eq(&fields.asset_name),
            assets::category_id.eq(fields.category_id),
            assets::status.eq(&fields.status),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, &fields.asset_tag))?;
    let asset_id: i64 = conn.get_last_insert_rowid()?;
    info!(asset_id, "Asset created: {}", fields.asset_tag);
    Ok(asset_id)
}
}

backend_fn! {
/// Updates an asset's tag, name, category and status.
///
/// # Errors
///
/// Returns `NotFound`, `DuplicateName`, `Conflict` for an unknown
/// category, or a database error.
pub fn update_asset(
    conn: &mut _,
    asset_id: i64,
    fields: &AssetFields,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(assets::table.filter(assets::asset_id.eq(asset_id)))
        .set((
            assets::asset_tag.eq(&fields.asset_tag),
            assets::asset_name.eq(&fields.asset_name),
            assets::category_id.eq(fields.category_id),
            assets::status.eq(&fields.status),
        ))
        .execute(conn)
        .map_err(|e| rename_duplicate(e, &fields.asset_tag))?;
    require_row(rows, "asset", asset_id)
}
}

backend_fn! {
/// Deletes an asset that has never been assigned.
///
/// # Errors
///
/// Returns `Conflict` if assignments reference the asset, `NotFound`, or
/// a database error.
pub fn delete_asset(conn: &mut _, asset_id: i64) -> Result<(), PersistenceError> {
    let references: i64 = assignments::table
        .filter(assignments::asset_id.eq(asset_id))
        .count()
        .get_result(conn)?;
    if references > 0 {
        return Err(PersistenceError::Conflict(format!(
            "asset {asset_id} has {references} assignment(s)"
        )));
    }

    info!("Deleting asset ID: {}", asset_id);
    let rows: usize = diesel::delete(assets::table.filter(assets::asset_id.eq(asset_id)))
        .execute(conn)?;
    require_row(rows, "asset", asset_id)
}
}
