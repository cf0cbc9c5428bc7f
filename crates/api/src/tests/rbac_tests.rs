// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prf_domain::SupervisorLevels;
use prf_domain::permissions::codes;
use prf_persistence::{EmployeeFields, Persistence, SessionData};

use super::helpers::{
    USER_PASSWORD, create_role_with, create_test_persistence, create_user_context, login,
    session_for,
};
use crate::auth::{AuthUser, LoginOutcome, SessionContext};
use crate::error::ApiError;
use crate::rbac::supervisor_levels_for;

#[test]
fn test_user_without_roles_holds_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "plain", &[]);

    assert!(!ctx.can(codes::ASSETS_VIEW));
    assert!(!ctx.permissions.is_super_admin());
    assert_eq!(
        ctx.require(codes::ASSETS_VIEW).unwrap_err(),
        ApiError::Unauthorized {
            permission: String::from("assets.view"),
        }
    );
}

#[test]
fn test_role_permissions_are_resolved() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(
        &mut persistence,
        "clerk",
        &[codes::ASSETS_VIEW, codes::ASSIGNMENTS_MANAGE],
    );

    assert!(ctx.can(codes::ASSETS_VIEW));
    assert!(ctx.can(codes::ASSIGNMENTS_MANAGE));
    assert!(!ctx.can(codes::ASSETS_MANAGE));
    assert!(ctx.require(codes::ASSETS_VIEW).is_ok());
}

#[test]
fn test_permissions_are_cached_in_the_session() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[codes::ASSETS_VIEW]);

    let session: SessionData = persistence
        .get_session_by_token(&ctx.session_token)
        .unwrap()
        .unwrap();
    let cached: Vec<String> =
        serde_json::from_str(session.permissions_json.as_deref().unwrap()).unwrap();
    assert_eq!(cached, vec![String::from("assets.view")]);
}

#[test]
fn test_new_grants_apply_at_next_login() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[codes::ASSETS_VIEW]);
    let role_id: i64 = create_role_with(&mut persistence, "Auditors too", &[codes::AUDIT_VIEW]);
    let mut role_ids: Vec<i64> = persistence.get_user_role_ids(ctx.user.id).unwrap();
    role_ids.push(role_id);
    persistence
        .replace_user_roles(ctx.user.id, &role_ids, None)
        .unwrap();

    let same_session: SessionContext =
        crate::auth::AuthenticationService::validate_session(&mut persistence, &ctx.session_token)
            .unwrap();
    assert!(!same_session.can(codes::AUDIT_VIEW));

    let outcome: LoginOutcome = login(&mut persistence, "clerk", USER_PASSWORD);
    let fresh: SessionContext = session_for(&mut persistence, &outcome);
    assert!(fresh.can(codes::AUDIT_VIEW));
    assert!(fresh.can(codes::ASSETS_VIEW));
}

#[test]
fn test_unreadable_cache_is_recomputed() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[codes::ASSETS_VIEW]);
    persistence
        .set_session_permissions(ctx.session_id, "{not json")
        .unwrap();

    let again: SessionContext =
        crate::auth::AuthenticationService::validate_session(&mut persistence, &ctx.session_token)
            .unwrap();

    assert!(again.can(codes::ASSETS_VIEW));
}

#[test]
fn test_user_without_employee_supervises_nobody() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "plain", &[]);

    let levels: SupervisorLevels = supervisor_levels_for(&mut persistence, &ctx.user);

    assert_eq!(levels, SupervisorLevels::NONE);
    assert!(!levels.is_supervisor());
}

#[test]
fn test_supervisor_levels_follow_employee_references() {
    let mut persistence: Persistence = create_test_persistence();
    let boss: i64 = persistence
        .create_employee(&EmployeeFields {
            first_name: String::from("Grace"),
            last_name: String::from("Hopper"),
            ..EmployeeFields::default()
        })
        .unwrap();
    persistence
        .create_employee(&EmployeeFields {
            first_name: String::from("Alan"),
            last_name: String::from("Turing"),
            supervisor_technical_id: Some(boss),
            ..EmployeeFields::default()
        })
        .unwrap();
    let user: AuthUser = AuthUser {
        id: 1,
        username: String::from("ghopper"),
        email: None,
        employee_id: Some(boss),
    };

    let levels: SupervisorLevels = supervisor_levels_for(&mut persistence, &user);

    assert!(levels.technical);
    assert!(!levels.admin);
    assert!(!levels.second_level);
    assert!(levels.is_supervisor());
}
