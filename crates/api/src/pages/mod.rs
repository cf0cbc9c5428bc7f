// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The generic CRUD page.
//!
//! Every entity page has the same shape: a searchable table, a create/edit
//! form, and a handful of POST actions selected by the `act` field. A page
//! only describes its entity through [`CrudPage`]; loading, authorization,
//! CSRF checking and audit recording live in [`load_page`] and
//! [`process_action`].

mod assets;
mod assignments;
mod designations;
mod employees;
mod locations;
mod reference;
mod roles;
mod users;

use std::collections::HashMap;

use prf_audit::{Action, AuditEntry, Subject};
use prf_persistence::{ListFilter, Persistence};
use tracing::{info, warn};

use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{Choice, FieldSpec, FormFields};

pub use assets::AssetsPage;
pub use assignments::AssignmentsPage;
pub use designations::DesignationsPage;
pub use employees::EmployeesPage;
pub use locations::LocationsPage;
pub use reference::{AssetCategoriesPage, DepartmentsPage, LeaveTypesPage};
pub use roles::{PermissionsPage, RolesPage};
pub use users::UsersPage;

/// A POST action offered on a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub act: &'static str,
    pub label: &'static str,
    /// An inline text input submitted with the action: `(name, placeholder)`.
    pub input: Option<(&'static str, &'static str)>,
    /// Ask for confirmation before submitting.
    pub confirm: bool,
}

impl RowAction {
    pub const TOGGLE: Self = Self {
        act: "toggle",
        label: "Toggle active",
        input: None,
        confirm: false,
    };

    pub const DELETE: Self = Self {
        act: "delete",
        label: "Delete",
        input: None,
        confirm: true,
    };
}

/// A submit button on the main form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormAction {
    pub act: &'static str,
    pub label: &'static str,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<String>,
    pub is_active: Option<bool>,
    pub actions: Vec<RowAction>,
}

/// A successful mutation, as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub action: String,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

impl Mutation {
    #[must_use]
    pub fn new(action: &str, entity_id: i64) -> Self {
        Self {
            action: action.to_string(),
            entity_id: Some(entity_id),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Query parameters of a list page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Free-text search.
    pub q: Option<String>,
    /// `1` for active rows only, `0` for inactive rows only.
    pub active: Option<String>,
    /// Row to pre-fill the form with.
    pub edit: Option<i64>,
}

impl PageQuery {
    fn active_filter(&self) -> Option<bool> {
        match self.active.as_deref().map(str::trim) {
            Some("1") => Some(true),
            Some("0") => Some(false),
            _ => None,
        }
    }
}

/// Everything a list page needs to render.
#[derive(Debug, Clone)]
pub struct PageView {
    pub slug: &'static str,
    pub title: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<TableRow>,
    pub fields: Vec<FieldSpec>,
    pub form: FormFields,
    pub editing: Option<i64>,
    pub form_actions: Vec<FormAction>,
    pub can_manage: bool,
    pub has_active_flag: bool,
    pub query: PageQuery,
}

impl PageView {
    /// Replaces the form with values the user submitted, so a rejected
    /// submission can be corrected instead of retyped.
    pub fn keep_submitted(&mut self, page: &dyn CrudPage, submitted: &FormFields) {
        let editing: Option<i64> = match submitted.get("act") {
            Some("create") | None => None,
            Some(_) => submitted
                .get("id")
                .and_then(|id| id.trim().parse::<i64>().ok()),
        };
        let mut form: FormFields = submitted.clone();
        form.set("csrf_token", "");
        self.form = form;
        self.editing = editing;
        self.form_actions = page.form_actions(editing.is_some());
    }
}

/// Entity metadata and operations behind a generic CRUD page.
pub trait CrudPage: Sync {
    /// URL segment and audit entity name.
    fn slug(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Permission needed to see the page.
    fn view_permission(&self) -> &'static str;

    /// Permission needed for any POST action. Also grants view access.
    fn manage_permission(&self) -> &'static str;

    fn columns(&self) -> &'static [&'static str];

    /// Whether the entity has an `is_active` flag to filter and toggle.
    fn has_active_flag(&self) -> bool {
        false
    }

    /// The form fields, with select options loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if option lists cannot be loaded.
    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError>;

    /// The filtered table rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the list query fails.
    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError>;

    /// Form values for editing an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn load(&self, persistence: &mut Persistence, id: i64)
    -> Result<Option<FormFields>, ApiError>;

    fn form_actions(&self, editing: bool) -> Vec<FormAction> {
        if editing {
            vec![FormAction {
                act: "update",
                label: "Save changes",
            }]
        } else {
            vec![FormAction {
                act: "create",
                label: "Create",
            }]
        }
    }

    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError>;

    /// # Errors
    ///
    /// Returns an error if validation or the update fails.
    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError>;

    /// # Errors
    ///
    /// Returns an error if the entity cannot be toggled or the update fails.
    fn toggle(
        &self,
        _persistence: &mut Persistence,
        _id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        Err(unsupported_action("toggle"))
    }

    /// # Errors
    ///
    /// Returns an error if the row is referenced or the delete fails.
    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError>;

    /// Entity-specific actions beyond create/update/toggle/delete.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for actions the page does not know.
    fn custom_action(
        &self,
        act: &str,
        _persistence: &mut Persistence,
        _form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        Err(unsupported_action(act))
    }
}

fn unsupported_action(act: &str) -> ApiError {
    ApiError::invalid("act", format!("Unsupported action '{act}'"))
}

static DEPARTMENTS: DepartmentsPage = DepartmentsPage;
static DESIGNATIONS: DesignationsPage = DesignationsPage;
static LOCATIONS: LocationsPage = LocationsPage;
static LEAVE_TYPES: LeaveTypesPage = LeaveTypesPage;
static EMPLOYEES: EmployeesPage = EmployeesPage;
static ASSET_CATEGORIES: AssetCategoriesPage = AssetCategoriesPage;
static ASSETS: AssetsPage = AssetsPage;
static ASSIGNMENTS: AssignmentsPage = AssignmentsPage;
static USERS: UsersPage = UsersPage;
static ROLES: RolesPage = RolesPage;
static PERMISSIONS: PermissionsPage = PermissionsPage;

/// Every CRUD page, in navigation order.
#[must_use]
pub fn all_pages() -> [&'static dyn CrudPage; 11] {
    [
        &EMPLOYEES,
        &DEPARTMENTS,
        &DESIGNATIONS,
        &LOCATIONS,
        &LEAVE_TYPES,
        &ASSET_CATEGORIES,
        &ASSETS,
        &ASSIGNMENTS,
        &USERS,
        &ROLES,
        &PERMISSIONS,
    ]
}

/// Finds the page served under `slug`.
#[must_use]
pub fn find_page(slug: &str) -> Option<&'static dyn CrudPage> {
    all_pages().into_iter().find(|page| page.slug() == slug)
}

/// Returns `true` if the session may see `page`.
#[must_use]
pub fn can_view(page: &dyn CrudPage, ctx: &SessionContext) -> bool {
    ctx.permissions
        .can_any(&[page.view_permission(), page.manage_permission()])
}

/// Loads a list page.
///
/// # Errors
///
/// Returns `Unauthorized` without view access, or an error if a query fails.
pub fn load_page(
    page: &dyn CrudPage,
    persistence: &mut Persistence,
    ctx: &SessionContext,
    query: &PageQuery,
) -> Result<PageView, ApiError> {
    if !can_view(page, ctx) {
        return Err(ApiError::Unauthorized {
            permission: page.view_permission().to_string(),
        });
    }

    let can_manage: bool = ctx.can(page.manage_permission());
    let filter: ListFilter = ListFilter {
        search: query.q.clone(),
        active: if page.has_active_flag() {
            query.active_filter()
        } else {
            None
        },
    };

    let rows: Vec<TableRow> = page.rows(persistence, &filter, ctx)?;
    let fields: Vec<FieldSpec> = page.fields(persistence)?;

    let mut editing: Option<i64> = None;
    let mut form: FormFields = FormFields::new();
    if let (true, Some(id)) = (can_manage, query.edit) {
        if let Some(values) = page.load(persistence, id)? {
            form = values;
            editing = Some(id);
        }
    }

    Ok(PageView {
        slug: page.slug(),
        title: page.title(),
        columns: page.columns(),
        rows,
        fields,
        form,
        editing,
        form_actions: page.form_actions(editing.is_some()),
        can_manage,
        has_active_flag: page.has_active_flag(),
        query: query.clone(),
    })
}

/// Processes a POST action on a page.
///
/// The CSRF token is checked before anything else; a mismatch performs no
/// mutation. The mutation and its audit entry commit together.
///
/// # Errors
///
/// Returns `InvalidCsrfToken`, `Unauthorized`, or the page operation's error.
pub fn process_action(
    page: &dyn CrudPage,
    persistence: &mut Persistence,
    ctx: &SessionContext,
    form: &FormFields,
) -> Result<Mutation, ApiError> {
    ctx.verify_csrf(form.get("csrf_token"))?;
    ctx.require(page.manage_permission())?;

    let act: &str = form
        .get("act")
        .map(str::trim)
        .filter(|act| !act.is_empty())
        .ok_or_else(|| ApiError::invalid("act", "No action was submitted"))?;

    audited(persistence, ctx, page.slug(), |persistence| match act {
        "create" => page.create(persistence, form, ctx),
        "update" => {
            let id: i64 = form.required_id("id")?;
            page.update(persistence, id, form, ctx)
        }
        "toggle" => {
            let id: i64 = form.required_id("id")?;
            page.toggle(persistence, id, ctx)
        }
        "delete" => {
            let id: i64 = form.required_id("id")?;
            page.delete(persistence, id, ctx)
        }
        other => page.custom_action(other, persistence, form, ctx),
    })
}

/// Runs `write` and records its audit entry in one transaction.
///
/// If either fails, nothing `write` changed is kept.
pub(crate) fn audited<F>(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    entity: &str,
    write: F,
) -> Result<Mutation, ApiError>
where
    F: FnOnce(&mut Persistence) -> Result<Mutation, ApiError>,
{
    persistence.atomically(|persistence| {
        let mutation: Mutation = write(persistence)?;
        record_mutation(persistence, ctx, entity, &mutation)?;
        Ok(mutation)
    })
}

/// Writes the audit entry for a mutation.
fn record_mutation(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    entity: &str,
    mutation: &Mutation,
) -> Result<(), ApiError> {
    let entry: AuditEntry = AuditEntry::new(
        ctx.user.to_audit_actor(),
        Action::new(mutation.action.clone(), mutation.details.clone()),
        Subject::new(entity.to_string(), mutation.entity_id),
    );
    match persistence.record_audit(&entry) {
        Ok(audit_id) => {
            info!(
                audit_id,
                user_id = ctx.user.id,
                entity,
                action = %mutation.action,
                entity_id = ?mutation.entity_id,
                "Mutation recorded"
            );
            Ok(())
        }
        Err(e) => {
            warn!(entity, action = %mutation.action, error = %e, "Failed to record audit entry");
            Err(e.into())
        }
    }
}

// Cell and option helpers shared by the pages.

pub(crate) fn yes_no(flag: bool) -> String {
    String::from(if flag { "Yes" } else { "No" })
}

pub(crate) fn or_blank(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub(crate) fn lookup(names: &HashMap<i64, String>, id: Option<i64>) -> String {
    id.and_then(|id| names.get(&id).cloned()).unwrap_or_default()
}

pub(crate) fn to_choices(names: &HashMap<i64, String>) -> Vec<Choice> {
    let mut choices: Vec<Choice> = names
        .iter()
        .map(|(id, name)| (id.to_string(), name.clone()))
        .collect();
    choices.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
    choices
}

pub(crate) fn active_row_actions() -> Vec<RowAction> {
    vec![RowAction::TOGGLE, RowAction::DELETE]
}

/// Sets `name` to `value` when present.
pub(crate) fn set_opt(form: &mut FormFields, name: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        form.set(name, value.to_string());
    }
}
