// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Successful form posts redirect (post/redirect/get). Rejected input is
//! rendered inline on the same page with the submitted values kept.

use axum::{
    Form,
    extract::{Multipart, Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use prf_api::{
    ApiError, AuthenticationService, ChangePasswordRequest, CrudPage, DashboardView, FormFields,
    LoginOutcome, PageQuery, PageView, SessionContext, audit_log, change_password, dashboard,
    find_page, load_page, process_action, upload_avatar,
};
use prf_domain::post_login_target;
use prf_persistence::AuditLogData;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::session::{CurrentSession, clear_session_cookie, session_cookie, session_token};
use crate::views::{
    AuditRow, AuditTemplate, DashboardTemplate, EntityTemplate, Layout, LoginTemplate,
    ProfileTemplate, render,
};
use crate::{AppState, HttpError, found};

/// Success message shown after a redirect with `ok=1`.
const SAVED: &str = "Changes saved.";

/// Drops blank query values.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    csrf_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    ok: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntityQuery {
    q: Option<String>,
    active: Option<String>,
    edit: Option<String>,
    ok: Option<String>,
}

impl EntityQuery {
    fn page_query(self) -> PageQuery {
        PageQuery {
            q: non_empty(self.q),
            active: non_empty(self.active),
            edit: self.edit.and_then(|id| id.trim().parse::<i64>().ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    csrf_token: Option<String>,
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
    #[serde(default)]
    confirm_password: String,
}

/// Handler for GET `/`.
#[allow(clippy::unused_async)]
pub async fn handle_root() -> Response {
    found(prf_domain::DEFAULT_LANDING_PATH)
}

fn login_page(
    next: Option<String>,
    username: String,
    error: Option<String>,
) -> Result<Response, HttpError> {
    let template: LoginTemplate = LoginTemplate {
        layout: Layout::anonymous("Sign in").with_error(error),
        username,
        next: next.unwrap_or_default(),
    };
    Ok(render(&template)?.into_response())
}

/// Handler for GET `/login`.
///
/// A browser that already holds a valid session goes straight to its target.
pub async fn handle_login_page(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Result<Response, HttpError> {
    let next: Option<String> = non_empty(query.next);
    if let Some(token) = session_token(&headers) {
        let mut persistence = app_state.persistence.lock().await;
        let valid: bool =
            AuthenticationService::validate_session(&mut persistence, &token).is_ok();
        drop(persistence);
        if valid {
            return Ok(found(&post_login_target(next.as_deref())));
        }
    }
    login_page(next, String::new(), None)
}

/// Handler for POST `/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, HttpError> {
    info!(username = %form.username.trim(), "Handling login request");
    let next: Option<String> = non_empty(form.next);
    let previous: Option<String> = session_token(&headers);

    let mut persistence = app_state.persistence.lock().await;
    let result: Result<LoginOutcome, ApiError> = AuthenticationService::try_login(
        &mut persistence,
        &form.username,
        &form.password,
        previous.as_deref(),
        app_state.config.session_lifetime,
    );
    drop(persistence);

    match result {
        Ok(outcome) => {
            let mut response: Response = found(&post_login_target(next.as_deref()));
            let cookie: String =
                session_cookie(&outcome.session_token, app_state.config.secure_cookies);
            if let Ok(value) = cookie.parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Ok(response)
        }
        Err(ApiError::AuthenticationFailed { reason }) => {
            let mut response: Response = login_page(next, form.username, Some(reason))?;
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            Ok(response)
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for POST `/logout`.
pub async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    Form(form): Form<CsrfForm>,
) -> Result<Response, HttpError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;

    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, &ctx.session_token)?;
    drop(persistence);

    let mut response: Response = found("/login");
    if let Ok(value) = clear_session_cookie(app_state.config.secure_cookies).parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Handler for GET `/dashboard`.
pub async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let view: DashboardView = dashboard(&mut persistence, &ctx)?;
    drop(persistence);

    let template: DashboardTemplate =
        DashboardTemplate::new(Layout::for_session("Dashboard", &ctx, "dashboard"), &view);
    Ok(render(&template)?.into_response())
}

fn profile_page(
    ctx: &SessionContext,
    ok: bool,
    error: Option<String>,
) -> Result<Response, HttpError> {
    let template: ProfileTemplate = ProfileTemplate {
        layout: Layout::for_session("Profile", ctx, "profile")
            .with_success(ok, SAVED)
            .with_error(error),
        email: ctx.user.email.clone().unwrap_or_default(),
    };
    Ok(render(&template)?.into_response())
}

/// Renders a profile error inline when the user can correct it.
fn profile_rejection(ctx: &SessionContext, err: ApiError) -> Result<Response, HttpError> {
    match err {
        ApiError::AuthenticationFailed { reason } => profile_page(ctx, false, Some(reason)),
        e if e.is_user_facing() => profile_page(ctx, false, Some(e.to_string())),
        e => Err(e.into()),
    }
}

/// Handler for GET `/profile`.
#[allow(clippy::unused_async)]
pub async fn handle_profile_page(
    CurrentSession(ctx): CurrentSession,
    Query(query): Query<FlashQuery>,
) -> Result<Response, HttpError> {
    profile_page(&ctx, query.ok.is_some(), None)
}

/// Handler for POST `/profile`.
pub async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    Form(form): Form<PasswordForm>,
) -> Result<Response, HttpError> {
    let request: ChangePasswordRequest = ChangePasswordRequest {
        csrf_token: form.csrf_token,
        current_password: form.current_password,
        new_password: form.new_password,
        confirm_password: form.confirm_password,
    };

    let mut persistence = app_state.persistence.lock().await;
    let result = change_password(&mut persistence, &ctx, &request);
    drop(persistence);

    match result {
        Ok(_) => Ok(found("/profile?ok=1")),
        Err(e) => profile_rejection(&ctx, e),
    }
}

/// Handler for POST `/profile/avatar`.
///
/// Expects a multipart body with a `csrf_token` field and an `avatar` file.
pub async fn handle_avatar_upload(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let mut csrf_token: Option<String> = None;
    let mut bytes: Vec<u8> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed avatar upload");
                return Err(HttpError::bad_request("The upload could not be read"));
            }
        };
        let name: Option<String> = field.name().map(str::to_string);
        match name.as_deref() {
            Some("csrf_token") => {
                csrf_token = field.text().await.ok();
            }
            Some("avatar") => match field.bytes().await {
                Ok(data) => bytes = data.to_vec(),
                Err(e) => {
                    warn!(error = %e, "Avatar upload interrupted");
                    return Err(HttpError::bad_request("The upload could not be read"));
                }
            },
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let mut persistence = app_state.persistence.lock().await;
    let result = upload_avatar(&mut persistence, &ctx, csrf_token.as_deref(), &bytes);
    drop(persistence);

    match result {
        Ok(_) => Ok(found("/profile?ok=1")),
        Err(e) => profile_rejection(&ctx, e),
    }
}

/// Handler for GET `/audit`.
pub async fn handle_audit(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    Query(query): Query<SearchQuery>,
) -> Result<Response, HttpError> {
    let q: Option<String> = non_empty(query.q);

    let mut persistence = app_state.persistence.lock().await;
    let entries: Vec<AuditLogData> = audit_log(&mut persistence, &ctx, q.clone())?;
    drop(persistence);

    let template: AuditTemplate = AuditTemplate {
        layout: Layout::for_session("Audit Log", &ctx, "audit"),
        q: q.unwrap_or_default(),
        entries: entries.into_iter().map(AuditRow::from).collect(),
    };
    Ok(render(&template)?.into_response())
}

fn entity_page(
    ctx: &SessionContext,
    view: &PageView,
    ok: bool,
    error: Option<String>,
) -> Result<Response, HttpError> {
    let layout: Layout = Layout::for_session(view.title, ctx, view.slug)
        .with_success(ok, SAVED)
        .with_error(error);
    let template: EntityTemplate = EntityTemplate::new(layout, view);
    Ok(render(&template)?.into_response())
}

/// Handler for GET `/{entity}`.
pub async fn handle_entity_page(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(entity): Path<String>,
    Query(query): Query<EntityQuery>,
) -> Result<Response, HttpError> {
    let page: &dyn CrudPage = find_page(&entity).ok_or_else(HttpError::not_found)?;
    let ok: bool = query.ok.is_some();
    let page_query: PageQuery = query.page_query();

    let mut persistence = app_state.persistence.lock().await;
    let view: PageView = load_page(page, &mut persistence, &ctx, &page_query)?;
    drop(persistence);

    entity_page(&ctx, &view, ok, None)
}

/// Handler for POST `/{entity}`.
pub async fn handle_entity_action(
    AxumState(app_state): AxumState<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(entity): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, HttpError> {
    let page: &dyn CrudPage = find_page(&entity).ok_or_else(HttpError::not_found)?;
    let form: FormFields = pairs.into_iter().collect();
    info!(
        user_id = ctx.user.id,
        page = page.slug(),
        act = form.get("act").unwrap_or_default(),
        "Handling page action"
    );

    let mut persistence = app_state.persistence.lock().await;
    let rejected: Result<(PageView, String), ApiError> =
        match process_action(page, &mut persistence, &ctx, &form) {
            Ok(_) => {
                drop(persistence);
                return Ok(found(&format!("/{}?ok=1", page.slug())));
            }
            Err(e) if e.is_user_facing() => {
                load_page(page, &mut persistence, &ctx, &PageQuery::default()).map(|mut view| {
                    view.keep_submitted(page, &form);
                    (view, e.to_string())
                })
            }
            Err(e) => Err(e),
        };
    drop(persistence);

    let (view, message) = rejected?;
    debug!(page = page.slug(), error = %message, "Action rejected");
    entity_page(&ctx, &view, false, Some(message))
}
