// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTML views.
//!
//! Templates live in `templates/` and only see plain strings, booleans and
//! lists; every decision about what to show is made here.

use askama::Template;
use axum::response::Html;
use prf_api::{
    DashboardView, FieldKind, FieldSpec, NavLink, PageView, RowAction, SessionContext, TableRow,
    navigation,
};
use prf_persistence::{AuditLogData, DashboardCounts};
use tracing::error;

use crate::HttpError;

/// Renders a template into an HTML body.
///
/// # Errors
///
/// Returns an internal error if rendering fails.
pub fn render(template: &impl Template) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|e| {
        error!(error = %e, "Template rendering failed");
        HttpError::internal()
    })
}

/// A navigation entry.
pub struct NavItem {
    pub href: String,
    pub title: String,
    pub current: bool,
}

/// Values every page layout needs.
pub struct Layout {
    pub title: String,
    pub signed_in: bool,
    pub username: String,
    pub avatar: String,
    pub csrf_token: String,
    pub nav: Vec<NavItem>,
    pub success: String,
    pub error: String,
}

impl Layout {
    /// Layout for a signed-in page. `current` is the active navigation slug.
    #[must_use]
    pub fn for_session(title: &str, ctx: &SessionContext, current: &str) -> Self {
        let nav: Vec<NavItem> = navigation(ctx)
            .into_iter()
            .map(|NavLink { slug, title }| NavItem {
                href: format!("/{slug}"),
                title: title.to_string(),
                current: slug == current,
            })
            .collect();
        Self {
            title: title.to_string(),
            signed_in: true,
            username: ctx.user.username.clone(),
            avatar: ctx.avatar.clone().unwrap_or_default(),
            csrf_token: ctx.csrf_token.clone(),
            nav,
            success: String::new(),
            error: String::new(),
        }
    }

    /// Layout for a page shown without a session.
    #[must_use]
    pub fn anonymous(title: &str) -> Self {
        Self {
            title: title.to_string(),
            signed_in: false,
            username: String::new(),
            avatar: String::new(),
            csrf_token: String::new(),
            nav: Vec::new(),
            success: String::new(),
            error: String::new(),
        }
    }

    /// Shows the success alert when `ok` is set.
    #[must_use]
    pub fn with_success(mut self, ok: bool, message: &str) -> Self {
        if ok {
            self.success = message.to_string();
        }
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error.unwrap_or_default();
        self
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub username: String,
    pub next: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub message: String,
}

pub struct StatCard {
    pub label: &'static str,
    pub value: i64,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub stats: Vec<StatCard>,
    pub supervisor_roles: Vec<&'static str>,
    pub links: Vec<NavItem>,
}

impl DashboardTemplate {
    #[must_use]
    pub fn new(layout: Layout, view: &DashboardView) -> Self {
        let counts: DashboardCounts = view.counts;
        let stats: Vec<StatCard> = vec![
            StatCard {
                label: "Active employees",
                value: counts.active_employees,
            },
            StatCard {
                label: "Assets",
                value: counts.total_assets,
            },
            StatCard {
                label: "Available assets",
                value: counts.available_assets,
            },
            StatCard {
                label: "Assigned assets",
                value: counts.assigned_assets,
            },
            StatCard {
                label: "Active assignments",
                value: counts.active_assignments,
            },
            StatCard {
                label: "Active users",
                value: counts.active_users,
            },
        ];
        let mut supervisor_roles: Vec<&'static str> = Vec::new();
        if view.supervisor.admin {
            supervisor_roles.push("Administrative supervisor");
        }
        if view.supervisor.technical {
            supervisor_roles.push("Technical supervisor");
        }
        if view.supervisor.second_level {
            supervisor_roles.push("Second-level supervisor");
        }
        let links: Vec<NavItem> = view
            .links
            .iter()
            .map(|link| NavItem {
                href: format!("/{}", link.slug),
                title: link.title.to_string(),
                current: false,
            })
            .collect();
        Self {
            layout,
            stats,
            supervisor_roles,
            links,
        }
    }
}

/// A select or checkbox option.
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A rendered form field.
pub struct FieldView {
    pub name: String,
    pub label: String,
    /// `type` attribute for plain inputs.
    pub input_type: &'static str,
    pub is_select: bool,
    pub is_checkboxes: bool,
    pub is_textarea: bool,
    pub required: bool,
    pub value: String,
    pub options: Vec<OptionView>,
}

impl FieldView {
    fn new(spec: &FieldSpec, view: &PageView) -> Self {
        let options = |choices: &[(String, String)]| -> Vec<OptionView> {
            choices
                .iter()
                .map(|(value, label)| OptionView {
                    value: value.clone(),
                    label: label.clone(),
                    selected: view.form.contains(spec.name, value),
                })
                .collect()
        };
        let (input_type, opts): (&'static str, Vec<OptionView>) = match &spec.kind {
            FieldKind::Text | FieldKind::TextArea => ("text", Vec::new()),
            FieldKind::Email => ("email", Vec::new()),
            FieldKind::Password => ("password", Vec::new()),
            FieldKind::Number => ("number", Vec::new()),
            FieldKind::Date => ("date", Vec::new()),
            FieldKind::Select(choices) | FieldKind::Checkboxes(choices) => {
                ("text", options(choices.as_slice()))
            }
        };
        let value: String = if matches!(spec.kind, FieldKind::Password) {
            String::new()
        } else {
            view.form.get(spec.name).unwrap_or_default().to_string()
        };
        Self {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            input_type,
            is_select: matches!(spec.kind, FieldKind::Select(_)),
            is_checkboxes: matches!(spec.kind, FieldKind::Checkboxes(_)),
            is_textarea: matches!(spec.kind, FieldKind::TextArea),
            required: spec.required,
            value,
            options: opts,
        }
    }
}

/// A per-row action button.
pub struct ActionView {
    pub act: &'static str,
    pub label: &'static str,
    pub has_input: bool,
    pub input_name: &'static str,
    pub input_placeholder: &'static str,
    pub confirm: bool,
}

impl From<&RowAction> for ActionView {
    fn from(action: &RowAction) -> Self {
        let (input_name, input_placeholder) = action.input.unwrap_or(("", ""));
        Self {
            act: action.act,
            label: action.label,
            has_input: action.input.is_some(),
            input_name,
            input_placeholder,
            confirm: action.confirm,
        }
    }
}

pub struct RowView {
    pub id: i64,
    pub cells: Vec<String>,
    pub inactive: bool,
    pub actions: Vec<ActionView>,
}

impl From<&TableRow> for RowView {
    fn from(row: &TableRow) -> Self {
        Self {
            id: row.id,
            cells: row.cells.clone(),
            inactive: row.is_active == Some(false),
            actions: row.actions.iter().map(ActionView::from).collect(),
        }
    }
}

pub struct SubmitView {
    pub act: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "entity.html")]
pub struct EntityTemplate {
    pub layout: Layout,
    pub slug: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub can_manage: bool,
    pub has_active_flag: bool,
    pub q: String,
    pub active: String,
    pub editing: bool,
    pub editing_id: String,
    pub fields: Vec<FieldView>,
    pub submits: Vec<SubmitView>,
}

impl EntityTemplate {
    #[must_use]
    pub fn new(layout: Layout, view: &PageView) -> Self {
        let editing: bool = view.editing.is_some();
        let fields: Vec<FieldView> = view
            .fields
            .iter()
            .filter(|spec| !(editing && spec.create_only))
            .map(|spec| FieldView::new(spec, view))
            .collect();
        Self {
            layout,
            slug: view.slug,
            columns: view.columns.to_vec(),
            rows: view.rows.iter().map(RowView::from).collect(),
            can_manage: view.can_manage,
            has_active_flag: view.has_active_flag,
            q: view.query.q.clone().unwrap_or_default(),
            active: view.query.active.clone().unwrap_or_default(),
            editing,
            editing_id: view.editing.map(|id| id.to_string()).unwrap_or_default(),
            fields,
            submits: view
                .form_actions
                .iter()
                .map(|a| SubmitView {
                    act: a.act,
                    label: a.label,
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub email: String,
}

pub struct AuditRow {
    pub created_at: String,
    pub actor: String,
    pub action: String,
    pub entity: String,
    pub entity_id: String,
    pub details: String,
}

impl From<AuditLogData> for AuditRow {
    fn from(entry: AuditLogData) -> Self {
        Self {
            created_at: entry.created_at,
            actor: entry.actor_username,
            action: entry.action,
            entity: entry.entity,
            entity_id: entry.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            details: entry.details.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "audit.html")]
pub struct AuditTemplate {
    pub layout: Layout,
    pub q: String,
    pub entries: Vec<AuditRow>,
}
