// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prf_domain::permissions::codes;
use prf_persistence::{DesignationData, ListFilter, Persistence};

use super::{CrudPage, Mutation, TableRow, active_row_actions, or_blank, set_opt, yes_no};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};

const TITLE_MAX: usize = 100;
const GRADE_MAX: usize = 50;

/// Job titles. Ids are allocated by the persistence layer, not the database.
pub struct DesignationsPage;

impl CrudPage for DesignationsPage {
    fn slug(&self) -> &'static str {
        "designations"
    }

    fn title(&self) -> &'static str {
        "Designations"
    }

    fn view_permission(&self) -> &'static str {
        codes::DESIGNATIONS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::DESIGNATIONS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Title", "Grade", "Active", "Created"]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("title", "Title", FieldKind::Text).required(),
            FieldSpec::new("grade", "Grade", FieldKind::Text),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let designations: Vec<DesignationData> = persistence.list_designations(filter)?;
        Ok(designations
            .into_iter()
            .map(|d| TableRow {
                id: d.job_title_id,
                cells: vec![
                    d.job_title_id.to_string(),
                    d.title,
                    or_blank(d.grade.as_deref()),
                    yes_no(d.is_active),
                    d.created_at,
                ],
                is_active: Some(d.is_active),
                actions: active_row_actions(),
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_designation(id)?.map(|d| {
            let mut form: FormFields = [("title", d.title)].into_iter().collect();
            set_opt(&mut form, "grade", d.grade);
            form
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let title: String = form.required_text("title", TITLE_MAX)?;
        let grade: Option<String> = form.optional_text("grade", GRADE_MAX)?;
        let id: i64 =
            persistence.create_designation(&title, grade.as_deref(), Some(ctx.user.id))?;
        Ok(Mutation::new("create", id).with_details(format!("Created designation '{title}'")))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let title: String = form.required_text("title", TITLE_MAX)?;
        let grade: Option<String> = form.optional_text("grade", GRADE_MAX)?;
        persistence.update_designation(id, &title, grade.as_deref())?;
        Ok(Mutation::new("update", id).with_details(format!("'{title}'")))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let active: bool = persistence.toggle_designation(id)?;
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_designation(id)?;
        Ok(Mutation::new("delete", id))
    }
}
