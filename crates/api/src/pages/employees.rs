// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use prf_domain::permissions::codes;
use prf_domain::validate_email;
use prf_persistence::{EmployeeData, EmployeeFields, ListFilter, Persistence};

use super::{
    CrudPage, Mutation, TableRow, active_row_actions, lookup, or_blank, set_opt, to_choices,
    yes_no,
};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};

/// The three supervisor references, as `(form field, label)`.
const SUPERVISOR_FIELDS: [(&str, &str); 3] = [
    ("supervisor_admin_id", "Administrative supervisor"),
    ("supervisor_technical_id", "Technical supervisor"),
    ("supervisor_second_level_id", "Second-level supervisor"),
];

pub struct EmployeesPage;

/// Name lookups for the employee table and form.
struct EmployeeLookups {
    departments: HashMap<i64, String>,
    locations: HashMap<i64, String>,
    designations: HashMap<i64, String>,
    employees: HashMap<i64, String>,
}

impl EmployeeLookups {
    fn load(persistence: &mut Persistence) -> Result<Self, ApiError> {
        let all: ListFilter = ListFilter::default();
        Ok(Self {
            departments: persistence
                .list_departments(&all)?
                .into_iter()
                .map(|d| (d.department_id, d.department_name))
                .collect(),
            locations: persistence
                .list_locations(&all)?
                .into_iter()
                .map(|l| (l.location_id, format!("{} - {}", l.location_code, l.location_name)))
                .collect(),
            designations: persistence
                .list_designations(&all)?
                .into_iter()
                .map(|d| (d.job_title_id, d.title))
                .collect(),
            employees: persistence
                .list_employees(&all)?
                .into_iter()
                .map(|e| (e.employee_id, e.full_name()))
                .collect(),
        })
    }
}

impl EmployeesPage {
    fn parse(form: &FormFields) -> Result<EmployeeFields, ApiError> {
        Ok(EmployeeFields {
            first_name: form.required_text("first_name", 100)?,
            last_name: form.required_text("last_name", 100)?,
            email: validate_email(form.get("email"))?,
            department_id: form.optional_id("department_id")?,
            location_id: form.optional_id("location_id")?,
            job_title_id: form.optional_id("job_title_id")?,
            supervisor_admin_id: form.optional_id("supervisor_admin_id")?,
            supervisor_technical_id: form.optional_id("supervisor_technical_id")?,
            supervisor_second_level_id: form.optional_id("supervisor_second_level_id")?,
        })
    }
}

impl CrudPage for EmployeesPage {
    fn slug(&self) -> &'static str {
        "employees"
    }

    fn title(&self) -> &'static str {
        "Employees"
    }

    fn view_permission(&self) -> &'static str {
        codes::EMPLOYEES_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::EMPLOYEES_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "Name",
            "Email",
            "Department",
            "Location",
            "Designation",
            "Admin supervisor",
            "Technical supervisor",
            "Second-level supervisor",
            "Active",
        ]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        let lookups: EmployeeLookups = EmployeeLookups::load(persistence)?;
        let mut fields: Vec<FieldSpec> = vec![
            FieldSpec::new("first_name", "First name", FieldKind::Text).required(),
            FieldSpec::new("last_name", "Last name", FieldKind::Text).required(),
            FieldSpec::new("email", "Email", FieldKind::Email),
            FieldSpec::new(
                "department_id",
                "Department",
                FieldKind::Select(to_choices(&lookups.departments)),
            ),
            FieldSpec::new(
                "location_id",
                "Location",
                FieldKind::Select(to_choices(&lookups.locations)),
            ),
            FieldSpec::new(
                "job_title_id",
                "Designation",
                FieldKind::Select(to_choices(&lookups.designations)),
            ),
        ];
        for (name, label) in SUPERVISOR_FIELDS {
            fields.push(FieldSpec::new(
                name,
                label,
                FieldKind::Select(to_choices(&lookups.employees)),
            ));
        }
        Ok(fields)
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let lookups: EmployeeLookups = EmployeeLookups::load(persistence)?;
        let employees: Vec<EmployeeData> = persistence.list_employees(filter)?;
        Ok(employees
            .into_iter()
            .map(|e| TableRow {
                id: e.employee_id,
                cells: vec![
                    e.employee_id.to_string(),
                    e.full_name(),
                    or_blank(e.email.as_deref()),
                    lookup(&lookups.departments, e.department_id),
                    lookup(&lookups.locations, e.location_id),
                    lookup(&lookups.designations, e.job_title_id),
                    lookup(&lookups.employees, e.supervisor_admin_id),
                    lookup(&lookups.employees, e.supervisor_technical_id),
                    lookup(&lookups.employees, e.supervisor_second_level_id),
                    yes_no(e.is_active),
                ],
                is_active: Some(e.is_active),
                actions: active_row_actions(),
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_employee(id)?.map(|e| {
            let mut form: FormFields = [("first_name", e.first_name), ("last_name", e.last_name)]
                .into_iter()
                .collect();
            set_opt(&mut form, "email", e.email);
            set_opt(&mut form, "department_id", e.department_id);
            set_opt(&mut form, "location_id", e.location_id);
            set_opt(&mut form, "job_title_id", e.job_title_id);
            set_opt(&mut form, "supervisor_admin_id", e.supervisor_admin_id);
            set_opt(&mut form, "supervisor_technical_id", e.supervisor_technical_id);
            set_opt(
                &mut form,
                "supervisor_second_level_id",
                e.supervisor_second_level_id,
            );
            form
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let fields: EmployeeFields = Self::parse(form)?;
        let id: i64 = persistence.create_employee(&fields)?;
        Ok(Mutation::new("create", id).with_details(format!(
            "Created employee {} {}",
            fields.first_name, fields.last_name
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let fields: EmployeeFields = Self::parse(form)?;
        persistence.update_employee(id, &fields)?;
        Ok(Mutation::new("update", id)
            .with_details(format!("{} {}", fields.first_name, fields.last_name)))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let active: bool = persistence.toggle_employee(id)?;
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_employee(id)?;
        Ok(Mutation::new("delete", id))
    }
}
