// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Asset assignments.
//!
//! Opening and closing an assignment moves the asset's status, holder and
//! location in the same transaction and appends to the assignment history.

use std::collections::HashMap;

use prf_domain::permissions::codes;
use prf_domain::{AssetStatus, DomainError};
use prf_persistence::{AssetData, AssignmentData, ListFilter, NewAssignment, Persistence};

use super::{
    CrudPage, FormAction, Mutation, RowAction, TableRow, lookup, or_blank, set_opt, to_choices,
    yes_no,
};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};

const CONDITION_MAX: usize = 255;
const NOTES_MAX: usize = 2000;

const RETURN: RowAction = RowAction {
    act: "return",
    label: "Return",
    input: Some(("condition_at_return", "Condition on return")),
    confirm: false,
};

pub struct AssignmentsPage;

struct AssignmentLookups {
    assets: HashMap<i64, String>,
    employees: HashMap<i64, String>,
    locations: HashMap<i64, String>,
}

impl AssignmentLookups {
    fn load(persistence: &mut Persistence) -> Result<Self, ApiError> {
        let all: ListFilter = ListFilter::default();
        Ok(Self {
            assets: persistence
                .list_assets(&all)?
                .into_iter()
                .map(|a| (a.asset_id, format!("{} - {}", a.asset_tag, a.asset_name)))
                .collect(),
            employees: persistence
                .list_employees(&all)?
                .into_iter()
                .map(|e| (e.employee_id, e.full_name()))
                .collect(),
            locations: persistence
                .list_locations(&all)?
                .into_iter()
                .map(|l| (l.location_id, format!("{} - {}", l.location_code, l.location_name)))
                .collect(),
        })
    }
}

impl AssignmentsPage {
    fn expected_return_date(form: &FormFields) -> Result<Option<String>, ApiError> {
        Ok(form
            .optional_date("expected_return_date")?
            .map(|date| date.to_string()))
    }
}

impl CrudPage for AssignmentsPage {
    fn slug(&self) -> &'static str {
        "assignments"
    }

    fn title(&self) -> &'static str {
        "Asset Assignments"
    }

    fn view_permission(&self) -> &'static str {
        codes::ASSIGNMENTS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::ASSIGNMENTS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "Asset",
            "Employee",
            "Location",
            "Assigned",
            "Expected return",
            "Returned",
            "Active",
            "Condition",
            "Notes",
        ]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        let lookups: AssignmentLookups = AssignmentLookups::load(persistence)?;
        Ok(vec![
            FieldSpec::new(
                "asset_id",
                "Asset",
                FieldKind::Select(to_choices(&lookups.assets)),
            )
            .required()
            .create_only(),
            FieldSpec::new(
                "employee_id",
                "Employee",
                FieldKind::Select(to_choices(&lookups.employees)),
            )
            .create_only(),
            FieldSpec::new(
                "location_id",
                "Location",
                FieldKind::Select(to_choices(&lookups.locations)),
            )
            .create_only(),
            FieldSpec::new(
                "expected_return_date",
                "Expected return",
                FieldKind::Date,
            ),
            FieldSpec::new(
                "condition_at_assign",
                "Condition when assigned",
                FieldKind::Text,
            ),
            FieldSpec::new("notes", "Notes", FieldKind::TextArea),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let lookups: AssignmentLookups = AssignmentLookups::load(persistence)?;
        let assignments: Vec<AssignmentData> = persistence.list_assignments(filter)?;
        Ok(assignments
            .into_iter()
            .map(|a| {
                let condition: String = match (&a.condition_at_assign, &a.condition_at_return) {
                    (Some(out), Some(back)) => format!("{out} / {back}"),
                    (Some(out), None) => out.clone(),
                    (None, Some(back)) => format!("- / {back}"),
                    (None, None) => String::new(),
                };
                TableRow {
                    id: a.assignment_id,
                    cells: vec![
                        a.assignment_id.to_string(),
                        lookup(&lookups.assets, Some(a.asset_id)),
                        lookup(&lookups.employees, a.assigned_to_employee_id),
                        lookup(&lookups.locations, a.assigned_to_location_id),
                        a.assigned_at,
                        or_blank(a.expected_return_date.as_deref()),
                        or_blank(a.returned_at.as_deref()),
                        yes_no(a.is_active),
                        condition,
                        or_blank(a.notes.as_deref()),
                    ],
                    is_active: Some(a.is_active),
                    actions: if a.is_active {
                        vec![RETURN]
                    } else {
                        vec![RowAction::DELETE]
                    },
                }
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_assignment(id)?.map(|a| {
            let mut form: FormFields = [("asset_id", a.asset_id.to_string())].into_iter().collect();
            set_opt(&mut form, "employee_id", a.assigned_to_employee_id);
            set_opt(&mut form, "location_id", a.assigned_to_location_id);
            set_opt(&mut form, "expected_return_date", a.expected_return_date);
            set_opt(&mut form, "condition_at_assign", a.condition_at_assign);
            set_opt(&mut form, "notes", a.notes);
            form
        }))
    }

    fn form_actions(&self, editing: bool) -> Vec<FormAction> {
        if editing {
            vec![FormAction {
                act: "update",
                label: "Save changes",
            }]
        } else {
            vec![FormAction {
                act: "create",
                label: "Assign",
            }]
        }
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let new: NewAssignment = NewAssignment {
            asset_id: form.required_id("asset_id")?,
            employee_id: form.optional_id("employee_id")?,
            location_id: form.optional_id("location_id")?,
            expected_return_date: Self::expected_return_date(form)?,
            condition_at_assign: form.optional_text("condition_at_assign", CONDITION_MAX)?,
            notes: form.optional_text("notes", NOTES_MAX)?,
        };
        if new.employee_id.is_none() && new.location_id.is_none() {
            return Err(DomainError::MissingAssignmentTarget.into());
        }

        let asset: Option<AssetData> = persistence.get_asset(new.asset_id)?;
        if let Some(asset) = asset {
            let out_of_service: bool = matches!(
                asset.status.parse::<AssetStatus>(),
                Ok(AssetStatus::UnderMaintenance | AssetStatus::Retired)
            );
            if out_of_service {
                return Err(ApiError::rule(
                    "asset_unavailable",
                    format!("Asset {} is {}", asset.asset_tag, asset.status),
                ));
            }
        }

        let id: i64 = persistence.create_assignment(&new, Some(ctx.user.id))?;
        Ok(Mutation::new("create", id).with_details(format!(
            "Assigned asset {} (employee {:?}, location {:?})",
            new.asset_id, new.employee_id, new.location_id
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let expected: Option<String> = Self::expected_return_date(form)?;
        let condition: Option<String> =
            form.optional_text("condition_at_assign", CONDITION_MAX)?;
        let notes: Option<String> = form.optional_text("notes", NOTES_MAX)?;
        persistence.update_assignment(
            id,
            expected.as_deref(),
            condition.as_deref(),
            notes.as_deref(),
        )?;
        Ok(Mutation::new("update", id))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_assignment(id)?;
        Ok(Mutation::new("delete", id))
    }

    fn custom_action(
        &self,
        act: &str,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        if act != "return" {
            return Err(ApiError::invalid("act", format!("Unsupported action '{act}'")));
        }
        let id: i64 = form.required_id("id")?;
        let condition: Option<String> =
            form.optional_text("condition_at_return", CONDITION_MAX)?;
        persistence.return_assignment(id, condition.as_deref(), Some(ctx.user.id))?;
        let mutation: Mutation = Mutation::new("return", id);
        Ok(match condition {
            Some(condition) => mutation.with_details(format!("Condition: {condition}")),
            None => mutation,
        })
    }
}
