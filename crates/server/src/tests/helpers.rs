// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helpers for driving the router in-process.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use prf_api::{AuthenticationService, DEFAULT_SESSION_LIFETIME, LoginOutcome};
use prf_persistence::Persistence;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::session::SESSION_COOKIE;
use crate::{AppState, ServerConfig, build_router};

pub const ADMIN_PASSWORD: &str = "Bootstrap-Admin-2026";
pub const USER_PASSWORD: &str = "Staff-Password-77";

/// Creates app state over an in-memory database with the administrator bootstrapped.
pub fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AuthenticationService::bootstrap_admin(&mut persistence, ADMIN_PASSWORD)
        .expect("Bootstrap failed");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: ServerConfig::default(),
    }
}

/// Signs a user in directly and returns the session tokens.
pub async fn sign_in(app_state: &AppState, username: &str, password: &str) -> LoginOutcome {
    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::try_login(
        &mut persistence,
        username,
        password,
        None,
        DEFAULT_SESSION_LIFETIME,
    )
    .expect("Login failed")
}

/// Creates a user with no roles.
pub async fn create_plain_user(app_state: &AppState, username: &str) {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .create_user(username, USER_PASSWORD, None, None, None)
        .expect("Failed to create user");
}

pub fn cookie_header(outcome: &LoginOutcome) -> String {
    format!("{SESSION_COOKIE}={}", outcome.session_token)
}

pub async fn get(app_state: &AppState, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let app: Router = build_router(app_state.clone());
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(
    app_state: &AppState,
    uri: &str,
    cookie: Option<&str>,
    body: &str,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let app: Router = build_router(app_state.clone());
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
