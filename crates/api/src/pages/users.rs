// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login accounts and their role assignments.

use std::collections::HashMap;

use prf_domain::permissions::codes;
use prf_domain::{Username, validate_email};
use prf_persistence::{ListFilter, Persistence, UserData};
use tracing::info;

use super::{
    CrudPage, FormAction, Mutation, RowAction, TableRow, lookup, or_blank, set_opt, to_choices,
    yes_no,
};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{FieldKind, FieldSpec, FormFields};
use crate::password_policy::PasswordPolicy;

const RESET_PASSWORD: FormAction = FormAction {
    act: "reset_password",
    label: "Reset password",
};

pub struct UsersPage;

impl UsersPage {
    fn role_names(persistence: &mut Persistence) -> Result<HashMap<i64, String>, ApiError> {
        Ok(persistence
            .list_roles(&ListFilter::default())?
            .into_iter()
            .map(|r| (r.role_id, r.role_name))
            .collect())
    }

    fn require_other_user(ctx: &SessionContext, id: i64, what: &str) -> Result<(), ApiError> {
        if ctx.user.id == id {
            return Err(ApiError::rule(
                "self_administration",
                format!("You cannot {what} your own account"),
            ));
        }
        Ok(())
    }

    fn user_or_not_found(persistence: &mut Persistence, id: i64) -> Result<UserData, ApiError> {
        persistence
            .get_user_by_id(id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("user {id}"),
            })
    }

    fn assign_roles(
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let id: i64 = form.required_id("id")?;
        let role_ids: Vec<i64> = form.id_list("role_id")?;
        Self::user_or_not_found(persistence, id)?;
        persistence.replace_user_roles(id, &role_ids, Some(ctx.user.id))?;
        Ok(Mutation::new("assign_roles", id).with_details(format!("role_ids={role_ids:?}")))
    }

    fn reset_password(
        persistence: &mut Persistence,
        form: &FormFields,
    ) -> Result<Mutation, ApiError> {
        let id: i64 = form.required_id("id")?;
        let user: UserData = Self::user_or_not_found(persistence, id)?;
        let password: &str = form.get("password").unwrap_or_default();
        let confirmation: &str = form.get("password_confirmation").unwrap_or_default();
        PasswordPolicy::default().validate(password, confirmation, &user.username)?;

        persistence.update_password(id, password)?;
        let ended: usize = persistence.delete_sessions_for_user(id)?;
        info!(user_id = id, ended, "Password reset; sessions ended");
        Ok(Mutation::new("reset_password", id))
    }
}

impl CrudPage for UsersPage {
    fn slug(&self) -> &'static str {
        "users"
    }

    fn title(&self) -> &'static str {
        "Users"
    }

    fn view_permission(&self) -> &'static str {
        codes::USERS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::USERS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "Username",
            "Email",
            "Employee",
            "Roles",
            "Last login",
            "Active",
        ]
    }

    fn has_active_flag(&self) -> bool {
        true
    }

    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        let roles: HashMap<i64, String> = Self::role_names(persistence)?;
        let employees: HashMap<i64, String> = persistence
            .list_employees(&ListFilter::default())?
            .into_iter()
            .map(|e| (e.employee_id, e.full_name()))
            .collect();
        Ok(vec![
            FieldSpec::new("username", "Username", FieldKind::Text)
                .required()
                .create_only(),
            FieldSpec::new("password", "Password", FieldKind::Password),
            FieldSpec::new(
                "password_confirmation",
                "Confirm password",
                FieldKind::Password,
            ),
            FieldSpec::new("email", "Email", FieldKind::Email),
            FieldSpec::new(
                "employee_id",
                "Employee",
                FieldKind::Select(to_choices(&employees)),
            ),
            FieldSpec::new("role_id", "Roles", FieldKind::Checkboxes(to_choices(&roles))),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let roles: HashMap<i64, String> = Self::role_names(persistence)?;
        let employees: HashMap<i64, String> = persistence
            .list_employees(&ListFilter::default())?
            .into_iter()
            .map(|e| (e.employee_id, e.full_name()))
            .collect();

        let users: Vec<UserData> = persistence.list_users(filter)?;
        let mut rows: Vec<TableRow> = Vec::with_capacity(users.len());
        for u in users {
            let role_names: Vec<String> = persistence
                .get_user_role_ids(u.user_id)?
                .into_iter()
                .map(|id| lookup(&roles, Some(id)))
                .collect();
            // no self-disable or self-delete buttons
            let actions: Vec<RowAction> = if u.user_id == ctx.user.id {
                Vec::new()
            } else {
                vec![RowAction::TOGGLE, RowAction::DELETE]
            };
            rows.push(TableRow {
                id: u.user_id,
                cells: vec![
                    u.user_id.to_string(),
                    u.username,
                    or_blank(u.email.as_deref()),
                    lookup(&employees, u.employee_id),
                    role_names.join(", "),
                    or_blank(u.last_login_at.as_deref()),
                    yes_no(u.is_active),
                ],
                is_active: Some(u.is_active),
                actions,
            });
        }
        Ok(rows)
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        let Some(user) = persistence.get_user_by_id(id)? else {
            return Ok(None);
        };
        let mut form: FormFields = [("username", user.username)].into_iter().collect();
        set_opt(&mut form, "email", user.email);
        set_opt(&mut form, "employee_id", user.employee_id);
        for role_id in persistence.get_user_role_ids(id)? {
            form.push("role_id", role_id.to_string());
        }
        Ok(Some(form))
    }

    fn form_actions(&self, editing: bool) -> Vec<FormAction> {
        if editing {
            vec![
                FormAction {
                    act: "update",
                    label: "Save changes",
                },
                FormAction {
                    act: "roles",
                    label: "Save roles",
                },
                RESET_PASSWORD,
            ]
        } else {
            vec![FormAction {
                act: "create",
                label: "Create user",
            }]
        }
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let username: Username = Username::parse(form.get("username").unwrap_or_default())?;
        let password: &str = form.get("password").unwrap_or_default();
        let confirmation: &str = form.get("password_confirmation").unwrap_or_default();
        PasswordPolicy::default().validate(password, confirmation, username.value())?;
        let email: Option<String> = validate_email(form.get("email"))?;
        let employee_id: Option<i64> = form.optional_id("employee_id")?;
        let role_ids: Vec<i64> = form.id_list("role_id")?;

        let id: i64 = persistence.create_user(
            username.value(),
            password,
            email.as_deref(),
            employee_id,
            Some(ctx.user.id),
        )?;
        if !role_ids.is_empty() {
            persistence.replace_user_roles(id, &role_ids, Some(ctx.user.id))?;
        }
        Ok(Mutation::new("create", id).with_details(format!(
            "Created user '{}' with role_ids={role_ids:?}",
            username.value()
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let email: Option<String> = validate_email(form.get("email"))?;
        let employee_id: Option<i64> = form.optional_id("employee_id")?;
        persistence.update_user(id, email.as_deref(), employee_id)?;
        Ok(Mutation::new("update", id))
    }

    fn toggle(
        &self,
        persistence: &mut Persistence,
        id: i64,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        Self::require_other_user(ctx, id, "disable")?;
        let active: bool = persistence.toggle_user_active(id)?;
        if !active {
            persistence.delete_sessions_for_user(id)?;
        }
        Ok(Mutation::new("toggle", id).with_details(format!("is_active={active}")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        Self::require_other_user(ctx, id, "delete")?;
        persistence.delete_user(id)?;
        Ok(Mutation::new("delete", id))
    }

    fn custom_action(
        &self,
        act: &str,
        persistence: &mut Persistence,
        form: &FormFields,
        ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        match act {
            "roles" => Self::assign_roles(persistence, form, ctx),
            "reset_password" => Self::reset_password(persistence, form),
            other => Err(ApiError::invalid(
                "act",
                format!("Unsupported action '{other}'"),
            )),
        }
    }
}
