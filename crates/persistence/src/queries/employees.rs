// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee queries, including supervisor-level resolution.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use prf_domain::SupervisorLevels;
use tracing::debug;

use crate::data_models::{EmployeeData, ListFilter};
use crate::diesel_schema::employees;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    department_id: Option<i64>,
    location_id: Option<i64>,
    job_title_id: Option<i64>,
    supervisor_admin_id: Option<i64>,
    supervisor_technical_id: Option<i64>,
    supervisor_second_level_id: Option<i64>,
    is_active: i32,
}

impl From<EmployeeRow> for EmployeeData {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            department_id: row.department_id,
            location_id: row.location_id,
            job_title_id: row.job_title_id,
            supervisor_admin_id: row.supervisor_admin_id,
            supervisor_technical_id: row.supervisor_technical_id,
            supervisor_second_level_id: row.supervisor_second_level_id,
            is_active: row.is_active != 0,
        }
    }
}

backend_fn! {
/// Lists employees, filtered by name/email search and active flag.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(
    conn: &mut _,
    filter: &ListFilter,
) -> Result<Vec<EmployeeData>, PersistenceError> {
    let mut query = employees::table
        .select(EmployeeRow::as_select())
        .into_boxed();

    if let Some(pattern) = filter.search_pattern() {
        query = query.filter(
            employees::first_name
                .like(pattern.clone())
                .or(employees::last_name.like(pattern.clone()))
                .or(employees::email.assume_not_null().like(pattern)),
        );
    }
    if let Some(flag) = filter.active_flag() {
        query = query.filter(employees::is_active.eq(flag));
    }

    let rows: Vec<EmployeeRow> = query
        .order((employees::last_name.asc(), employees::first_name.asc()))
        .load(conn)?;
    Ok(rows.into_iter().map(EmployeeData::from).collect())
}
}

backend_fn! {
/// Retrieves an employee by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_employee(
    conn: &mut _,
    employee_id: i64,
) -> Result<Option<EmployeeData>, PersistenceError> {
    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(EmployeeData::from))
}
}

backend_fn! {
/// Determines at which levels an employee supervises others.
///
/// Each level is set when at least one employee row names `employee_id`
/// in the matching supervisor column.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_supervisor_levels(
    conn: &mut _,
    employee_id: i64,
) -> Result<SupervisorLevels, PersistenceError> {
    let admin: i64 = employees::table
        .filter(employees::supervisor_admin_id.eq(employee_id))
        .count()
        .get_result(conn)?;
    let technical: i64 = employees::table
        .filter(employees::supervisor_technical_id.eq(employee_id))
        .count()
        .get_result(conn)?;
    let second_level: i64 = employees::table
        .filter(employees::supervisor_second_level_id.eq(employee_id))
        .count()
        .get_result(conn)?;

    debug!(
        employee_id,
        admin, technical, second_level, "Resolved supervisor references"
    );

    Ok(SupervisorLevels {
        admin: admin > 0,
        technical: technical > 0,
        second_level: second_level > 0,
    })
}
}

backend_fn! {
/// Counts active employees.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_employees(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(employees::table
        .filter(employees::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
}
