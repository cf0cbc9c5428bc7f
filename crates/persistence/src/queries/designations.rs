// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{DesignationData, ListFilter};
use crate::diesel_schema::designations;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = designations)]
struct DesignationRow {
    job_title_id: i64,
    title: String,
    grade: Option<String>,
    is_active: i32,
    created_at: String,
    created_by: Option<i64>,
}

impl From<DesignationRow> for DesignationData {
    fn from(row: DesignationRow) -> Self {
        Self {
            job_title_id: row.job_title_id,
            title: row.title,
            grade: row.grade,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

backend_fn! {
/// Lists designations, filtered by title/grade search and active flag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_designations(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<DesignationData>, PersistenceError> {
    let mut query = designations::table
        .select(DesignationRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            designations::title
                .like(pattern.clone())
                .or(designations::grade.assume_not_null().like(pattern)),
        );
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(designations::is_active.eq(flag));
    }

    let rows: Vec<DesignationRow> = query.order(designations::title.asc()).load(conn)?;
    Ok(rows.into_iter().map(DesignationData::from).collect())
}
}

backend_fn! {
/// Retrieves a designation by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_designation(
    conn: &mut _,
    job_title_id: i64,
) -> Result<Option<DesignationData>, PersistenceError> {
    let row: Option<DesignationRow> = designations::table
        .filter(designations::job_title_id.eq(job_title_id))
        .select(DesignationRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(DesignationData::from))
}
}

backend_fn! {
/// Counts designations.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_designations(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(designations::table.count().get_result(conn)?)
}
}
