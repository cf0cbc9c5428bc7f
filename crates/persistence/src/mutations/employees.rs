// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::EmployeeFields;
use crate::diesel_schema::employees;
use crate::error::PersistenceError;
use crate::mutations::{flip, require_row};

backend_fn! {
/// Creates an employee.
///
/// # Errors
///
/// Returns `Conflict` if a referenced department, location, designation or
/// supervisor does not exist, or a database error.
pub fn create_employee(conn: &mut _, fields: &EmployeeFields) -> Result<i64, PersistenceError> {
    diesel::insert_into(employees::table)
        .values((
            employees::first_name.eq(&fields.first_name),
            employees::last_name.eq(&fields.last_name),
            employees::email.eq(fields.email.as_deref()),
            employees::department_id.eq(fields.department_id),
            employees::location_id.eq(fields.location_id),
            employees::job_title_id.eq(fields.job_title_id),
            employees::supervisor_admin_id.eq(fields.supervisor_admin_id),
            employees::supervisor_technical_id.eq(fields.supervisor_technical_id),
            employees::supervisor_second_level_id.eq(fields.supervisor_second_level_id),
            employees::is_active.eq(1),
        ))
        .execute(conn)?;
    let employee_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        employee_id,
        "Employee created: {} {}", fields.first_name, fields.last_name
    );
    Ok(employee_id)
}
}

backend_fn! {
/// Updates an employee.
///
/// An employee may not name themselves as a supervisor.
///
/// # Errors
///
/// Returns `InvalidInput` for a self-supervision reference, `NotFound`,
/// `Conflict` for a dangling reference, or a database error.
pub fn update_employee(
    conn: &mut _,
    employee_id: i64,
    fields: &EmployeeFields,
) -> Result<(), PersistenceError> {
    let supervisors: [Option<i64>; 3] = [
        fields.supervisor_admin_id,
        fields.supervisor_technical_id,
        fields.supervisor_second_level_id,
    ];
    if supervisors.contains(&Some(employee_id)) {
        return Err(PersistenceError::InvalidInput(String::from(
            "An employee cannot supervise themselves",
        )));
    }

    let rows: usize = diesel::update(
        employees::table.filter(employees::employee_id.eq(employee_id)),
    )
    .set((
        employees::first_name.eq(&fields.first_name),
        employees::last_name.eq(&fields.last_name),
        employees::email.eq(fields.email.as_deref()),
        employees::department_id.eq(fields.department_id),
        employees::location_id.eq(fields.location_id),
        employees::job_title_id.eq(fields.job_title_id),
        employees::supervisor_admin_id.eq(fields.supervisor_admin_id),
        employees::supervisor_technical_id.eq(fields.supervisor_technical_id),
        employees::supervisor_second_level_id.eq(fields.supervisor_second_level_id),
    ))
    .execute(conn)?;
    require_row(rows, "employee", employee_id)
}
}

backend_fn! {
/// Flips an employee's active flag and returns the new state.
///
/// # Errors
///
/// Returns `NotFound` or a database error.
pub fn toggle_employee(conn: &mut _, employee_id: i64) -> Result<bool, PersistenceError> {
    let current: i32 = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(employees::is_active)
        .first(conn)?;
    let next: i32 = flip(current);
    diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
        .set(employees::is_active.eq(next))
        .execute(conn)?;
    info!(employee_id, is_active = next, "Toggled employee");
    Ok(next != 0)
}
}

backend_fn! {
/// Deletes an employee.
///
/// Supervisor references and user links to the employee are cleared by the
/// database.
///
/// # Errors
///
/// Returns `NotFound`, `Conflict` if assets or assignments still
/// reference the employee, or a database error.
pub fn delete_employee(conn: &mut _, employee_id: i64) -> Result<(), PersistenceError> {
    info!("Deleting employee ID: {}", employee_id);
    let rows: usize = diesel::delete(
        employees::table.filter(employees::employee_id.eq(employee_id)),
    )
    .execute(conn)?;
    require_row(rows, "employee", employee_id)
}
}
