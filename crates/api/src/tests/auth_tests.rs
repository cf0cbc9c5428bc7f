// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prf_persistence::{Persistence, SessionData, UserData};

use super::helpers::{
    ADMIN_PASSWORD, USER_PASSWORD, create_admin_context, create_test_persistence, login,
    session_for,
};
use crate::auth::{
    AuthenticationService, DEFAULT_SESSION_LIFETIME, LoginOutcome, SessionContext,
    generate_token, tokens_match,
};
use crate::error::ApiError;

fn login_error(persistence: &mut Persistence, username: &str, password: &str) -> ApiError {
    AuthenticationService::try_login(
        persistence,
        username,
        password,
        None,
        DEFAULT_SESSION_LIFETIME,
    )
    .unwrap_err()
}

fn assert_generic_failure(err: &ApiError) {
    match err {
        ApiError::AuthenticationFailed { reason } => {
            assert_eq!(reason, "Invalid username or password");
        }
        other => panic!("Expected AuthenticationFailed, got {other:?}"),
    }
}

#[test]
fn test_login_with_valid_credentials_returns_user() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, Some("jdoe@example.org"), None, None)
        .unwrap();

    let outcome: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);

    assert_eq!(outcome.user.id, user_id);
    assert_eq!(outcome.user.username, "jdoe");
    assert_eq!(outcome.user.email.as_deref(), Some("jdoe@example.org"));
    assert_eq!(outcome.session_token.len(), 64);
    assert_ne!(outcome.session_token, outcome.csrf_token);

    let user: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[test]
fn test_login_username_is_case_insensitive() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();

    let outcome: LoginOutcome = login(&mut persistence, "  JDoe ", USER_PASSWORD);
    assert_eq!(outcome.user.id, user_id);
}

#[test]
fn test_login_failures_share_one_message() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();

    assert_generic_failure(&login_error(&mut persistence, "jdoe", "Wrong-Password-99"));
    assert_generic_failure(&login_error(&mut persistence, "nobody", USER_PASSWORD));
    assert_generic_failure(&login_error(&mut persistence, "", ""));
}

#[test]
fn test_disabled_account_cannot_log_in() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    let active: bool = persistence.toggle_user_active(user_id).unwrap();
    assert!(!active);

    assert_generic_failure(&login_error(&mut persistence, "jdoe", USER_PASSWORD));
}

#[test]
fn test_login_discards_the_presented_session() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    let first: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);

    let second: LoginOutcome = AuthenticationService::try_login(
        &mut persistence,
        "jdoe",
        USER_PASSWORD,
        Some(&first.session_token),
        DEFAULT_SESSION_LIFETIME,
    )
    .unwrap();

    assert_ne!(first.session_token, second.session_token);
    assert!(
        persistence
            .get_session_by_token(&first.session_token)
            .unwrap()
            .is_none()
    );
    assert!(
        persistence
            .get_session_by_token(&second.session_token)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_validate_session_resolves_user() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    let outcome: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);

    let ctx: SessionContext = session_for(&mut persistence, &outcome);

    assert_eq!(ctx.user.id, user_id);
    assert_eq!(ctx.csrf_token, outcome.csrf_token);
    assert!(ctx.permissions.is_empty());
}

#[test]
fn test_unknown_session_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let result = AuthenticationService::validate_session(&mut persistence, "not-a-session");
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_expired_session_is_rejected_and_removed() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    persistence
        .create_session("stale-token", user_id, "stale-csrf", "2000-01-01 00:00:00")
        .unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, "stale-token");

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
    assert!(
        persistence
            .get_session_by_token("stale-token")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_session_of_disabled_user_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    let outcome: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);
    persistence.toggle_user_active(user_id).unwrap();

    let result =
        AuthenticationService::validate_session(&mut persistence, &outcome.session_token);

    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
    assert!(
        persistence
            .get_session_by_token(&outcome.session_token)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_logout_deletes_session() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    let outcome: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);

    AuthenticationService::logout(&mut persistence, &outcome.session_token).unwrap();

    let session: Option<SessionData> = persistence
        .get_session_by_token(&outcome.session_token)
        .unwrap();
    assert!(session.is_none());
}

#[test]
fn test_cleanup_removes_only_expired_sessions() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = persistence
        .create_user("jdoe", USER_PASSWORD, None, None, None)
        .unwrap();
    persistence
        .create_session("old-1", user_id, "csrf-1", "2001-05-01 12:00:00")
        .unwrap();
    persistence
        .create_session("old-2", user_id, "csrf-2", "2001-05-02 12:00:00")
        .unwrap();
    let live: LoginOutcome = login(&mut persistence, "jdoe", USER_PASSWORD);

    let removed: usize = AuthenticationService::cleanup_expired_sessions(&mut persistence).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(persistence.count_sessions_for_user(user_id).unwrap(), 1);
    assert!(
        persistence
            .get_session_by_token(&live.session_token)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_bootstrap_runs_once() {
    let mut persistence: Persistence = create_test_persistence();

    let first: Option<i64> =
        AuthenticationService::bootstrap_admin(&mut persistence, ADMIN_PASSWORD).unwrap();
    let second: Option<i64> =
        AuthenticationService::bootstrap_admin(&mut persistence, ADMIN_PASSWORD).unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(persistence.count_users().unwrap(), 1);
}

#[test]
fn test_bootstrap_rejects_weak_password() {
    let mut persistence: Persistence = create_test_persistence();

    let result = AuthenticationService::bootstrap_admin(&mut persistence, "admin");

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
    assert_eq!(persistence.count_users().unwrap(), 0);
}

#[test]
fn test_bootstrap_admin_holds_wildcard() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_admin_context(&mut persistence);

    assert!(ctx.permissions.is_super_admin());
    assert!(ctx.can("anything.at_all"));
}

#[test]
fn test_csrf_token_must_match() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_admin_context(&mut persistence);

    assert!(ctx.verify_csrf(Some(&ctx.csrf_token.clone())).is_ok());
    assert_eq!(
        ctx.verify_csrf(Some("forged")).unwrap_err(),
        ApiError::InvalidCsrfToken
    );
    assert_eq!(ctx.verify_csrf(None).unwrap_err(), ApiError::InvalidCsrfToken);
}

#[test]
fn test_generated_tokens_are_hex_and_distinct() {
    let a: String = generate_token();
    let b: String = generate_token();

    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
    assert!(tokens_match(&a, &a.clone()));
    assert!(!tokens_match(&a, &b));
    assert!(!tokens_match(&a, &a[..63]));
}
