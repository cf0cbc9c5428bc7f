// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prf_persistence::{Persistence, UserData};

use super::helpers::{
    USER_PASSWORD, create_test_persistence, create_user_context, login, session_for,
};
use crate::auth::{AuthenticationService, LoginOutcome, SessionContext};
use crate::error::ApiError;
use crate::profile::{ChangePasswordRequest, change_password, upload_avatar};

const NEW_PASSWORD: &str = "Another-Long-Secret-5";

fn request(ctx: &SessionContext, current: &str, new: &str, confirm: &str) -> ChangePasswordRequest {
    ChangePasswordRequest {
        csrf_token: Some(ctx.csrf_token.clone()),
        current_password: current.to_string(),
        new_password: new.to_string(),
        confirm_password: confirm.to_string(),
    }
}

fn png_bytes() -> Vec<u8> {
    let mut bytes: Vec<u8> = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
    bytes
}

#[test]
fn test_change_password_keeps_current_session_only() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);
    let other: LoginOutcome = login(&mut persistence, "clerk", USER_PASSWORD);

    change_password(
        &mut persistence,
        &ctx,
        &request(&ctx, USER_PASSWORD, NEW_PASSWORD, NEW_PASSWORD),
    )
    .unwrap();

    assert!(AuthenticationService::validate_session(&mut persistence, &ctx.session_token).is_ok());
    assert!(
        AuthenticationService::validate_session(&mut persistence, &other.session_token).is_err()
    );
    let relogin: LoginOutcome = login(&mut persistence, "clerk", NEW_PASSWORD);
    assert_eq!(relogin.user.id, ctx.user.id);
    assert_eq!(persistence.count_audit_entries_for("profile").unwrap(), 1);
}

#[test]
fn test_change_password_requires_current_password() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);

    let err: ApiError = change_password(
        &mut persistence,
        &ctx,
        &request(&ctx, "Not-The-Password-1", NEW_PASSWORD, NEW_PASSWORD),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::AuthenticationFailed { .. }));
    let outcome: LoginOutcome = login(&mut persistence, "clerk", USER_PASSWORD);
    assert_eq!(outcome.user.id, ctx.user.id);
}

#[test]
fn test_change_password_checks_confirmation_and_policy() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);

    let mismatch: ApiError = change_password(
        &mut persistence,
        &ctx,
        &request(&ctx, USER_PASSWORD, NEW_PASSWORD, "Something-Else-5"),
    )
    .unwrap_err();
    let weak: ApiError = change_password(
        &mut persistence,
        &ctx,
        &request(&ctx, USER_PASSWORD, "abc", "abc"),
    )
    .unwrap_err();

    assert!(matches!(mismatch, ApiError::PasswordPolicyViolation { .. }));
    assert!(matches!(weak, ApiError::PasswordPolicyViolation { .. }));
    assert_eq!(persistence.count_audit_entries_for("profile").unwrap(), 0);
}

#[test]
fn test_change_password_rejects_forged_token() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);
    let mut forged: ChangePasswordRequest =
        request(&ctx, USER_PASSWORD, NEW_PASSWORD, NEW_PASSWORD);
    forged.csrf_token = Some(String::from("forged"));

    let err: ApiError = change_password(&mut persistence, &ctx, &forged).unwrap_err();

    assert_eq!(err, ApiError::InvalidCsrfToken);
    let outcome: LoginOutcome = login(&mut persistence, "clerk", USER_PASSWORD);
    assert_eq!(outcome.user.id, ctx.user.id);
}

#[test]
fn test_avatar_upload_stores_data_url() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);

    upload_avatar(&mut persistence, &ctx, Some(&ctx.csrf_token), &png_bytes()).unwrap();

    let user: UserData = persistence.get_user_by_id(ctx.user.id).unwrap().unwrap();
    assert!(
        user.avatar
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    let outcome: LoginOutcome = login(&mut persistence, "clerk", USER_PASSWORD);
    let refreshed: SessionContext = session_for(&mut persistence, &outcome);
    assert_eq!(refreshed.avatar, user.avatar);
}

#[test]
fn test_avatar_upload_rejects_non_images() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);

    let err: ApiError =
        upload_avatar(&mut persistence, &ctx, Some(&ctx.csrf_token), b"hello, world").unwrap_err();
    let empty: ApiError =
        upload_avatar(&mut persistence, &ctx, Some(&ctx.csrf_token), &[]).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "avatar"));
    assert!(matches!(empty, ApiError::InvalidInput { ref field, .. } if field == "avatar"));
    let user: UserData = persistence.get_user_by_id(ctx.user.id).unwrap().unwrap();
    assert!(user.avatar.is_none());
}

#[test]
fn test_avatar_upload_rejects_forged_token() {
    let mut persistence: Persistence = create_test_persistence();
    let ctx: SessionContext = create_user_context(&mut persistence, "clerk", &[]);

    let err: ApiError =
        upload_avatar(&mut persistence, &ctx, Some("forged"), &png_bytes()).unwrap_err();

    assert_eq!(err, ApiError::InvalidCsrfToken);
    let user: UserData = persistence.get_user_by_id(ctx.user.id).unwrap().unwrap();
    assert!(user.avatar.is_none());
}
