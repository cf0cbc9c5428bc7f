// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use prf_persistence::{ListFilter, Persistence};

use crate::auth::{AuthenticationService, DEFAULT_SESSION_LIFETIME, LoginOutcome, SessionContext};
use crate::error::ApiError;
use crate::forms::FormFields;
use crate::pages::{Mutation, find_page, process_action};

pub const ADMIN_PASSWORD: &str = "Bootstrap-Admin-2026";
pub const USER_PASSWORD: &str = "Staff-Password-77";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn login(persistence: &mut Persistence, username: &str, password: &str) -> LoginOutcome {
    AuthenticationService::try_login(
        persistence,
        username,
        password,
        None,
        DEFAULT_SESSION_LIFETIME,
    )
    .expect("Login failed")
}

pub fn session_for(persistence: &mut Persistence, outcome: &LoginOutcome) -> SessionContext {
    AuthenticationService::validate_session(persistence, &outcome.session_token)
        .expect("Session should be valid")
}

/// Bootstraps the administrator and returns a signed-in session for it.
pub fn create_admin_context(persistence: &mut Persistence) -> SessionContext {
    AuthenticationService::bootstrap_admin(persistence, ADMIN_PASSWORD)
        .unwrap()
        .expect("Bootstrap should create the administrator");
    let outcome: LoginOutcome = login(persistence, "admin", ADMIN_PASSWORD);
    session_for(persistence, &outcome)
}

/// Creates a role holding exactly `codes` and returns its id.
pub fn create_role_with(persistence: &mut Persistence, name: &str, codes: &[&str]) -> i64 {
    let permission_ids: Vec<i64> = persistence
        .list_permissions(&ListFilter::default())
        .unwrap()
        .into_iter()
        .filter(|p| codes.contains(&p.code.as_str()))
        .map(|p| p.permission_id)
        .collect();
    assert_eq!(permission_ids.len(), codes.len(), "unknown permission code");
    let role_id: i64 = persistence.create_role(name, None).unwrap();
    persistence
        .replace_role_permissions(role_id, &permission_ids)
        .unwrap();
    role_id
}

/// Creates a user holding the given permission codes and signs it in.
pub fn create_user_context(
    persistence: &mut Persistence,
    username: &str,
    codes: &[&str],
) -> SessionContext {
    let user_id: i64 = persistence
        .create_user(username, USER_PASSWORD, None, None, None)
        .unwrap();
    if !codes.is_empty() {
        let role_id: i64 = create_role_with(persistence, &format!("{username} role"), codes);
        persistence
            .replace_user_roles(user_id, &[role_id], None)
            .unwrap();
    }
    let outcome: LoginOutcome = login(persistence, username, USER_PASSWORD);
    session_for(persistence, &outcome)
}

/// Builds a submitted form carrying the session's CSRF token.
pub fn form_for(ctx: &SessionContext, act: &str, pairs: &[(&str, &str)]) -> FormFields {
    let mut form: FormFields = pairs.iter().copied().collect();
    form.set("act", act);
    form.set("csrf_token", ctx.csrf_token.clone());
    form
}

/// Submits an action to the page served under `slug`.
pub fn submit(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    slug: &str,
    act: &str,
    pairs: &[(&str, &str)],
) -> Result<Mutation, ApiError> {
    let page = find_page(slug).expect("Unknown page");
    process_action(page, persistence, ctx, &form_for(ctx, act, pairs))
}
