// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Application layer for PRF Asset Management.
//!
//! Authentication and sessions, permission checks, the generic entity pages
//! and the profile operations. Everything here works against a
//! [`prf_persistence::Persistence`] and knows nothing about HTTP.

mod auth;
mod dashboard;
mod error;
pub mod forms;
pub mod pages;
mod password_policy;
mod profile;
mod rbac;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthUser, AuthenticationService, BOOTSTRAP_USERNAME, DEFAULT_SESSION_LIFETIME, LoginOutcome,
    SessionContext, generate_token, tokens_match,
};
pub use dashboard::{AUDIT_PAGE_LIMIT, DashboardView, NavLink, audit_log, dashboard, navigation};
pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use forms::{Choice, FieldKind, FieldSpec, FormFields};
pub use pages::{
    CrudPage, FormAction, Mutation, PageQuery, PageView, RowAction, TableRow, all_pages,
    can_view, find_page, load_page, process_action,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use profile::{ChangePasswordRequest, change_password, upload_avatar};
pub use rbac::{get_user_permissions, supervisor_levels_for};
