// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session cookie handling and the authenticated-session extractor.
//!
//! The session token travels in the `prf_session` cookie. Pages extract a
//! [`CurrentSession`]; requests without a valid session are redirected to
//! the login page with the original target in `next`.

use std::fmt::Write;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Response},
};
use cookie::{Cookie, SameSite};
use prf_api::{AuthenticationService, SessionContext};
use tracing::debug;

use crate::{AppState, found};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "prf_session";

/// Returns the session token from the request's cookies, if present.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Builds the `Set-Cookie` value for a new session.
///
/// The cookie has no `Max-Age`, so it ends with the browser session; the
/// server-side expiry still applies.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
        .to_string()
}

/// Builds the `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie: Cookie<'static> = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

/// Percent-encodes a value for use in a query string.
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    let mut encoded: String = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Extractor for a signed-in session.
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next: String = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
        let rejection = || LoginRedirect { next: next.clone() };

        let Some(token) = session_token(&parts.headers) else {
            debug!(path = %parts.uri.path(), "No session cookie");
            return Err(rejection());
        };

        let mut persistence = state.persistence.lock().await;
        match AuthenticationService::validate_session(&mut persistence, &token) {
            Ok(ctx) => Ok(Self(ctx)),
            Err(e) => {
                debug!(error = %e, "Session rejected");
                Err(rejection())
            }
        }
    }
}

/// Redirects an unauthenticated request to the login page.
#[derive(Debug)]
pub struct LoginRedirect {
    /// The path and query the user asked for.
    pub next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        found(&format!("/login?next={}", encode_query_value(&self.next)))
    }
}
