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
#![allow(clippy::multiple_crate_versions)]

mod handlers;
mod session;
mod views;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use prf_api::{ApiError, AuthenticationService};
use prf_persistence::{Persistence, PersistenceError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::views::{ErrorTemplate, Layout};

/// PRF Asset Management server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an in-memory database.
    #[arg(short, long, env = "PRF_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long, env = "PRF_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "PRF_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PRF_PORT", default_value_t = 3000)]
    port: u16,

    /// Mark the session cookie `Secure` (serve over HTTPS)
    #[arg(long, env = "PRF_SECURE_COOKIES")]
    secure_cookies: bool,

    /// Session lifetime in hours
    #[arg(long, env = "PRF_SESSION_HOURS", default_value_t = 12)]
    session_hours: u16,

    /// Password for the `admin` account created when no users exist
    #[arg(long, env = "PRF_BOOTSTRAP_PASSWORD", hide_env_values = true)]
    bootstrap_password: Option<String>,
}

/// Settings the handlers need at request time.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub secure_cookies: bool,
    pub session_lifetime: time::Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            secure_cookies: false,
            session_lifetime: prf_api::DEFAULT_SESSION_LIFETIME,
        }
    }
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex so one request at a time
/// holds the connection.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<Mutex<Persistence>>,
    pub config: ServerConfig,
}

/// An error rendered as a full error page.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    #[must_use]
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("An internal error occurred"),
        }
    }

    #[must_use]
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: String::from("Page not found"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let template: ErrorTemplate = ErrorTemplate {
            layout: Layout::anonymous(self.status.canonical_reason().unwrap_or("Error")),
            status: self.status.as_u16(),
            message: self.message.clone(),
        };
        match views::render(&template) {
            Ok(html) => (self.status, html).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } | ApiError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        Self::from(ApiError::from(err))
    }
}

/// A `302 Found` redirect.
#[must_use]
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Largest request body accepted by the avatar upload.
const AVATAR_BODY_LIMIT: usize = prf_domain::MAX_AVATAR_BYTES + 64 * 1024;

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route(
            "/login",
            get(handlers::handle_login_page).post(handlers::handle_login),
        )
        .route("/logout", post(handlers::handle_logout))
        .route("/dashboard", get(handlers::handle_dashboard))
        .route(
            "/profile",
            get(handlers::handle_profile_page).post(handlers::handle_change_password),
        )
        .route(
            "/profile/avatar",
            post(handlers::handle_avatar_upload).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        .route("/audit", get(handlers::handle_audit))
        .route(
            "/{entity}",
            get(handlers::handle_entity_page).post(handlers::handle_entity_action),
        )
        .with_state(app_state)
}

/// Opens the configured database.
fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        Persistence::new_with_mysql(url)
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)
    } else {
        warn!("Using in-memory database; all data is lost on exit");
        Persistence::new_in_memory()
    }
}

/// Runs startup housekeeping: expired sessions and the first administrator.
fn prepare(
    persistence: &mut Persistence,
    bootstrap_password: Option<&str>,
) -> Result<(), ApiError> {
    AuthenticationService::cleanup_expired_sessions(persistence)?;
    match bootstrap_password {
        Some(password) => {
            AuthenticationService::bootstrap_admin(persistence, password)?;
        }
        None => {
            if persistence.count_users()? == 0 {
                warn!("No users exist and no bootstrap password is configured; nobody can sign in");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing PRF Asset Management server");

    let mut persistence: Persistence = open_persistence(&args).inspect_err(|e| {
        error!(error = %e, "Failed to open the database");
    })?;
    prepare(&mut persistence, args.bootstrap_password.as_deref())?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: ServerConfig {
            secure_cookies: args.secure_cookies,
            session_lifetime: time::Duration::hours(i64::from(args.session_hours)),
        },
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
