// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Simple lookup tables: departments, leave types and asset categories.

use prf_domain::permissions::codes;
use prf_persistence::{
    AssetCategoryData, DepartmentData, LeaveTypeData, ListFilter, Persistence,
};

use super::{CrudPage, Mutation, RowAction, TableRow, active_row_actions, yes_no};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};

const NAME_MAX: usize = 100;

pub struct DepartmentsPage;

impl CrudPage for DepartmentsPage {
    fn slug(&self) -> &'static str {
        "departments"
    }

    fn title(&self) -> &'static str {
        "Departments"
    }

    fn view_permission(&self) -> &'static str {
        codes::DEPARTMENTS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::DEPARTMENTS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Department", "Active"]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("department_name", "Department name", FieldKind::Text).required(),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let departments: Vec<DepartmentData> = persistence.list_departments(filter)?;
        Ok(departments
            .into_iter()
            .map(|d| TableRow {
                id: d.department_id,
                cells: vec![
                    d.department_id.to_string(),
                    d.department_name,
                    yes_no(d.is_active),
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
        Ok(persistence
            .get_department(id)?
            .map(|d| [("department_name", d.department_name)].into_iter().collect()))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("department_name", NAME_MAX)?;
        let id: i64 = persistence.create_department(&name)?;
        Ok(Mutation::new("create", id).with_details(format!("Created department '{name}'")))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("department_name", NAME_MAX)?;
        persistence.update_department(id, &name)?;
        Ok(Mutation::new("update", id).with_details(format!("Renamed department to '{name}'")))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let active: bool = persistence.toggle_department(id)?;
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_department(id)?;
        Ok(Mutation::new("delete", id))
    }
}

pub struct LeaveTypesPage;

impl CrudPage for LeaveTypesPage {
    fn slug(&self) -> &'static str {
        "leave_types"
    }

    fn title(&self) -> &'static str {
        "Leave Types"
    }

    fn view_permission(&self) -> &'static str {
        codes::LEAVE_TYPES_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::LEAVE_TYPES_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Leave type", "Days per year", "Active"]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("leave_name", "Leave type", FieldKind::Text).required(),
            FieldSpec::new("days_per_year", "Days per year", FieldKind::Number).required(),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let leave_types: Vec<LeaveTypeData> = persistence.list_leave_types(filter)?;
        Ok(leave_types
            .into_iter()
            .map(|l| TableRow {
                id: l.leave_type_id,
                cells: vec![
                    l.leave_type_id.to_string(),
                    l.leave_name,
                    l.days_per_year.to_string(),
                    yes_no(l.is_active),
                ],
                is_active: Some(l.is_active),
                actions: active_row_actions(),
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_leave_type(id)?.map(|l| {
            [
                ("leave_name", l.leave_name),
                ("days_per_year", l.days_per_year.to_string()),
            ]
            .into_iter()
            .collect()
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("leave_name", NAME_MAX)?;
        let days: i32 = form.required_count("days_per_year")?;
        let id: i64 = persistence.create_leave_type(&name, days)?;
        Ok(Mutation::new("create", id)
            .with_details(format!("Created leave type '{name}' ({days} days)")))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("leave_name", NAME_MAX)?;
        let days: i32 = form.required_count("days_per_year")?;
        persistence.update_leave_type(id, &name, days)?;
        Ok(Mutation::new("update", id).with_details(format!("'{name}' ({days} days)")))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let active: bool = persistence.toggle_leave_type(id)?;
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_leave_type(id)?;
        Ok(Mutation::new("delete", id))
    }
}

pub struct AssetCategoriesPage;

impl CrudPage for AssetCategoriesPage {
    fn slug(&self) -> &'static str {
        "asset_categories"
    }

    fn title(&self) -> &'static str {
        "Asset Categories"
    }

    fn view_permission(&self) -> &'static str {
        codes::ASSET_CATEGORIES_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::ASSET_CATEGORIES_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Category"]
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("category_name", "Category name", FieldKind::Text).required(),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let categories: Vec<AssetCategoryData> = persistence.list_asset_categories(filter)?;
        Ok(categories
            .into_iter()
            .map(|c| TableRow {
                id: c.category_id,
                cells: vec![c.category_id.to_string(), c.category_name],
                is_active: None,
                actions: vec![RowAction::DELETE],
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence
            .get_asset_category(id)?
            .map(|c| [("category_name", c.category_name)].into_iter().collect()))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("category_name", NAME_MAX)?;
        let id: i64 = persistence.create_asset_category(&name)?;
        Ok(Mutation::new("create", id).with_details(format!("Created category '{name}'")))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("category_name", NAME_MAX)?;
        persistence.update_asset_category(id, &name)?;
        Ok(Mutation::new("update", id).with_details(format!("Renamed category to '{name}'")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        persistence.delete_asset_category(id)?;
        Ok(Mutation::new("delete", id))
    }
}
