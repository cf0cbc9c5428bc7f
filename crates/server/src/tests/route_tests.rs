// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use prf_api::{AuthenticationService, LoginOutcome};

use super::helpers::{
    ADMIN_PASSWORD, USER_PASSWORD, body_text, cookie_header, create_plain_user,
    create_test_app_state, get, location, post_form, set_cookie, sign_in,
};
use crate::AppState;

async fn designation_count(app_state: &AppState) -> i64 {
    app_state
        .persistence
        .lock()
        .await
        .count_designations()
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let app_state: AppState = create_test_app_state();

    let response = get(&app_state, "/", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_unauthenticated_page_redirects_to_login_with_next() {
    let app_state: AppState = create_test_app_state();

    let response = get(&app_state, "/designations?q=eng", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "/login?next=%2Fdesignations%3Fq%3Deng"
    );
}

#[tokio::test]
async fn test_stale_cookie_redirects_to_login() {
    let app_state: AppState = create_test_app_state();

    let response = get(&app_state, "/dashboard", Some("prf_session=not-a-session")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?next=%2Fdashboard");
}

#[tokio::test]
async fn test_login_page_renders_next() {
    let app_state: AppState = create_test_app_state();

    let response = get(&app_state, "/login?next=assets", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: String = body_text(response).await;
    assert!(body.contains("name=\"next\" value=\"assets\""));
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app_state: AppState = create_test_app_state();

    let response = post_form(
        &app_state,
        "/login",
        None,
        &format!("username=admin&password={ADMIN_PASSWORD}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/dashboard");
    let cookie: String = set_cookie(&response);
    assert!(cookie.starts_with("prf_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
    assert!(!cookie.contains("Max-Age"));
}

#[tokio::test]
async fn test_login_follows_safe_next() {
    let app_state: AppState = create_test_app_state();

    let response = post_form(
        &app_state,
        "/login",
        None,
        &format!("username=admin&password={ADMIN_PASSWORD}&next=%2Fassets%3Fq%3Dlaptop"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/assets?q=laptop");
}

#[tokio::test]
async fn test_login_ignores_external_next() {
    let app_state: AppState = create_test_app_state();

    for next in ["https%3A%2F%2Fevil.example%2F", "%2F%2Fevil.example", "javascript%3Aalert(1)"] {
        let response = post_form(
            &app_state,
            "/login",
            None,
            &format!("username=admin&password={ADMIN_PASSWORD}&next={next}"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/dashboard", "next={next}");
    }
}

#[tokio::test]
async fn test_login_failure_rerenders_form() {
    let app_state: AppState = create_test_app_state();

    let response = post_form(
        &app_state,
        "/login",
        None,
        "username=admin&password=wrong-password",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("set-cookie").is_none());
    let body: String = body_text(response).await;
    assert!(body.contains("Invalid username or password"));
    assert!(body.contains("value=\"admin\""));
}

#[tokio::test]
async fn test_login_page_redirects_signed_in_user() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = get(&app_state, "/login", Some(&cookie_header(&outcome))).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_dashboard_renders_for_admin() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = get(&app_state, "/dashboard", Some(&cookie_header(&outcome))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: String = body_text(response).await;
    assert!(body.contains("Active employees"));
    assert!(body.contains("Audit Log"));
    assert!(body.contains(&outcome.csrf_token));
}

#[tokio::test]
async fn test_entity_page_renders_form_and_table() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = get(&app_state, "/designations", Some(&cookie_header(&outcome))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: String = body_text(response).await;
    assert!(body.contains("<h1>Designations</h1>"));
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("No records found."));
}

#[tokio::test]
async fn test_unknown_entity_is_not_found() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = get(&app_state, "/spaceships", Some(&cookie_header(&outcome))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_valid_post_redirects_with_ok() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = post_form(
        &app_state,
        "/designations",
        Some(&cookie_header(&outcome)),
        &format!("csrf_token={}&act=create&title=Engineer&grade=G5", outcome.csrf_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/designations?ok=1");
    assert_eq!(designation_count(&app_state).await, 1);

    let page = get(&app_state, "/designations?ok=1", Some(&cookie_header(&outcome))).await;
    let body: String = body_text(page).await;
    assert!(body.contains("alert-success"));
    assert!(body.contains("Engineer"));
}

#[tokio::test]
async fn test_csrf_mismatch_is_forbidden_and_changes_nothing() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    for body in [
        "csrf_token=forged&act=create&title=Engineer",
        "act=create&title=Engineer",
    ] {
        let response = post_form(
            &app_state,
            "/designations",
            Some(&cookie_header(&outcome)),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    assert_eq!(designation_count(&app_state).await, 0);
}

#[tokio::test]
async fn test_rejected_post_renders_inline_and_keeps_values() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;
    let cookie: String = cookie_header(&outcome);
    let body: String = format!(
        "csrf_token={}&act=create&title=Engineer&grade=G7",
        outcome.csrf_token
    );

    post_form(&app_state, "/designations", Some(&cookie), &body).await;
    let response = post_form(&app_state, "/designations", Some(&cookie), &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html: String = body_text(response).await;
    assert!(html.contains("alert-danger"));
    assert!(html.contains("already exists"));
    assert!(html.contains("value=\"G7\""));
    assert_eq!(designation_count(&app_state).await, 1);
}

#[tokio::test]
async fn test_page_without_permission_is_forbidden() {
    let app_state: AppState = create_test_app_state();
    create_plain_user(&app_state, "clerk").await;
    let outcome: LoginOutcome = sign_in(&app_state, "clerk", USER_PASSWORD).await;

    let response = get(&app_state, "/designations", Some(&cookie_header(&outcome))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app_state, "/audit", Some(&cookie_header(&outcome))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_cookie_and_session() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = post_form(
        &app_state,
        "/logout",
        Some(&cookie_header(&outcome)),
        &format!("csrf_token={}", outcome.csrf_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login");
    assert!(set_cookie(&response).contains("Max-Age=0"));

    let mut persistence = app_state.persistence.lock().await;
    assert!(
        AuthenticationService::validate_session(&mut persistence, &outcome.session_token).is_err()
    );
}

#[tokio::test]
async fn test_logout_requires_csrf() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = post_form(
        &app_state,
        "/logout",
        Some(&cookie_header(&outcome)),
        "csrf_token=forged",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let mut persistence = app_state.persistence.lock().await;
    assert!(
        AuthenticationService::validate_session(&mut persistence, &outcome.session_token).is_ok()
    );
}

#[tokio::test]
async fn test_profile_password_mismatch_renders_inline() {
    let app_state: AppState = create_test_app_state();
    let outcome: LoginOutcome = sign_in(&app_state, "admin", ADMIN_PASSWORD).await;

    let response = post_form(
        &app_state,
        "/profile",
        Some(&cookie_header(&outcome)),
        &format!(
            "csrf_token={}&current_password={ADMIN_PASSWORD}&new_password=Another-Secret-99&confirm_password=Different-Secret-99",
            outcome.csrf_token
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: String = body_text(response).await;
    assert!(body.contains("alert-danger"));
}
