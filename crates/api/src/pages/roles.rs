// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roles, their permission grants, and the permission catalog.

use std::collections::HashMap;

use prf_domain::permissions::codes;
use prf_domain::{WILDCARD_PERMISSION, normalize_name, validate_permission_code};
use prf_persistence::{
    ADMINISTRATOR_ROLE, ListFilter, PermissionData, Persistence, RoleData,
};

use super::{CrudPage, FormAction, Mutation, RowAction, TableRow, lookup, or_blank, set_opt};
use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::forms::{Choice, FieldKind, FieldSpec, FormFields};

const DESCRIPTION_MAX: usize = 255;

fn permission_codes(persistence: &mut Persistence) -> Result<HashMap<i64, String>, ApiError> {
    Ok(persistence
        .list_permissions(&ListFilter::default())?
        .into_iter()
        .map(|p| (p.permission_id, p.code))
        .collect())
}

pub struct RolesPage;

impl RolesPage {
    fn role_or_not_found(persistence: &mut Persistence, id: i64) -> Result<RoleData, ApiError> {
        persistence
            .get_role(id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Role"),
                message: format!("role {id}"),
            })
    }

    fn built_in(what: &str) -> ApiError {
        ApiError::rule(
            "built_in_role",
            format!("The {ADMINISTRATOR_ROLE} role cannot be {what}"),
        )
    }
}

impl CrudPage for RolesPage {
    fn slug(&self) -> &'static str {
        "roles"
    }

    fn title(&self) -> &'static str {
        "Roles"
    }

    fn view_permission(&self) -> &'static str {
        codes::ROLES_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::ROLES_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Role", "Description", "Permissions"]
    }

    fn fields(&self, persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        let mut choices: Vec<Choice> = permission_codes(persistence)?
            .into_iter()
            .map(|(id, code)| (id.to_string(), code))
            .collect();
        choices.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(vec![
            FieldSpec::new("role_name", "Role name", FieldKind::Text).required(),
            FieldSpec::new("description", "Description", FieldKind::Text),
            FieldSpec::new("permission_id", "Permissions", FieldKind::Checkboxes(choices)),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let codes_by_id: HashMap<i64, String> = permission_codes(persistence)?;
        let roles: Vec<RoleData> = persistence.list_roles(filter)?;
        let mut rows: Vec<TableRow> = Vec::with_capacity(roles.len());
        for r in roles {
            let mut granted: Vec<String> = persistence
                .get_role_permission_ids(r.role_id)?
                .into_iter()
                .map(|id| lookup(&codes_by_id, Some(id)))
                .collect();
            granted.sort();
            let actions: Vec<RowAction> = if r.role_name == ADMINISTRATOR_ROLE {
                Vec::new()
            } else {
                vec![RowAction::DELETE]
            };
            rows.push(TableRow {
                id: r.role_id,
                cells: vec![
                    r.role_id.to_string(),
                    r.role_name,
                    or_blank(r.description.as_deref()),
                    granted.join(", "),
                ],
                is_active: None,
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
        let Some(role) = persistence.get_role(id)? else {
            return Ok(None);
        };
        let mut form: FormFields = [("role_name", role.role_name)].into_iter().collect();
        set_opt(&mut form, "description", role.description);
        for permission_id in persistence.get_role_permission_ids(id)? {
            form.push("permission_id", permission_id.to_string());
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
                    act: "permissions",
                    label: "Save permissions",
                },
            ]
        } else {
            vec![FormAction {
                act: "create",
                label: "Create role",
            }]
        }
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("role_name", 100)?;
        let description: Option<String> = form.optional_text("description", DESCRIPTION_MAX)?;
        let permission_ids: Vec<i64> = form.id_list("permission_id")?;
        let id: i64 = persistence.create_role(&name, description.as_deref())?;
        if !permission_ids.is_empty() {
            persistence.replace_role_permissions(id, &permission_ids)?;
        }
        Ok(Mutation::new("create", id).with_details(format!(
            "Created role '{name}' with permission_ids={permission_ids:?}"
        )))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let name: String = form.required_text("role_name", 100)?;
        let description: Option<String> = form.optional_text("description", DESCRIPTION_MAX)?;
        let role: RoleData = Self::role_or_not_found(persistence, id)?;
        if role.role_name == ADMINISTRATOR_ROLE && normalize_name(&name) != ADMINISTRATOR_ROLE {
            return Err(Self::built_in("renamed"));
        }
        persistence.update_role(id, &name, description.as_deref())?;
        Ok(Mutation::new("update", id).with_details(format!("'{name}'")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let role: RoleData = Self::role_or_not_found(persistence, id)?;
        if role.role_name == ADMINISTRATOR_ROLE {
            return Err(Self::built_in("deleted"));
        }
        persistence.delete_role(id)?;
        Ok(Mutation::new("delete", id).with_details(format!("Deleted role '{}'", role.role_name)))
    }

    fn custom_action(
        &self,
        act: &str,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        if act != "permissions" {
            return Err(ApiError::invalid("act", format!("Unsupported action '{act}'")));
        }
        let id: i64 = form.required_id("id")?;
        let permission_ids: Vec<i64> = form.id_list("permission_id")?;
        Self::role_or_not_found(persistence, id)?;
        persistence.replace_role_permissions(id, &permission_ids)?;
        Ok(Mutation::new("set_permissions", id)
            .with_details(format!("permission_ids={permission_ids:?}")))
    }
}

pub struct PermissionsPage;

impl PermissionsPage {
    fn guard_wildcard(persistence: &mut Persistence, id: i64) -> Result<(), ApiError> {
        let permission: Option<PermissionData> = persistence.get_permission(id)?;
        if permission.is_some_and(|p| p.code == WILDCARD_PERMISSION) {
            return Err(ApiError::rule(
                "built_in_permission",
                "The wildcard permission cannot be changed",
            ));
        }
        Ok(())
    }
}

impl CrudPage for PermissionsPage {
    fn slug(&self) -> &'static str {
        "permissions"
    }

    fn title(&self) -> &'static str {
        "Permissions"
    }

    fn view_permission(&self) -> &'static str {
        codes::PERMISSIONS_VIEW
    }

    fn manage_permission(&self) -> &'static str {
        codes::PERMISSIONS_MANAGE
    }

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Code", "Description"]
    }

    fn fields(&self, _persistence: &mut Persistence) -> Result<Vec<FieldSpec>, ApiError> {
        Ok(vec![
            FieldSpec::new("code", "Code", FieldKind::Text).required(),
            FieldSpec::new("description", "Description", FieldKind::Text),
        ])
    }

    fn rows(
        &self,
        persistence: &mut Persistence,
        filter: &ListFilter,
        _ctx: &SessionContext,
    ) -> Result<Vec<TableRow>, ApiError> {
        let permissions: Vec<PermissionData> = persistence.list_permissions(filter)?;
        Ok(permissions
            .into_iter()
            .map(|p| TableRow {
                id: p.permission_id,
                actions: if p.code == WILDCARD_PERMISSION {
                    Vec::new()
                } else {
                    vec![RowAction::DELETE]
                },
                cells: vec![
                    p.permission_id.to_string(),
                    p.code,
                    or_blank(p.description.as_deref()),
                ],
                is_active: None,
            })
            .collect())
    }

    fn load(
        &self,
        persistence: &mut Persistence,
        id: i64,
    ) -> Result<Option<FormFields>, ApiError> {
        Ok(persistence.get_permission(id)?.map(|p| {
            let mut form: FormFields = [("code", p.code)].into_iter().collect();
            set_opt(&mut form, "description", p.description);
            form
        }))
    }

    fn create(
        &self,
        persistence: &mut Persistence,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let code: String = validate_permission_code(form.get("code").unwrap_or_default())?;
        let description: Option<String> = form.optional_text("description", DESCRIPTION_MAX)?;
        let id: i64 = persistence.create_permission(&code, description.as_deref())?;
        Ok(Mutation::new("create", id).with_details(format!("Created permission '{code}'")))
    }

    fn update(
        &self,
        persistence: &mut Persistence,
        id: i64,
        form: &FormFields,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        let code: String = validate_permission_code(form.get("code").unwrap_or_default())?;
        let description: Option<String> = form.optional_text("description", DESCRIPTION_MAX)?;
        Self::guard_wildcard(persistence, id)?;
        persistence.update_permission(id, &code, description.as_deref())?;
        Ok(Mutation::new("update", id).with_details(format!("'{code}'")))
    }

    fn delete(
        &self,
        persistence: &mut Persistence,
        id: i64,
        _ctx: &SessionContext,
    ) -> Result<Mutation, ApiError> {
        Self::guard_wildcard(persistence, id)?;
        persistence.delete_permission(id)?;
        Ok(Mutation::new("delete", id))
    }
}
