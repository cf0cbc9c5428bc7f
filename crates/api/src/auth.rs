// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication.

use prf_audit::Actor;
use prf_domain::PermissionSet;
use prf_persistence::clock::{format_timestamp, now_timestamp};
use prf_persistence::{Persistence, SessionData, UserData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::rbac::get_user_permissions;

/// Default session lifetime.
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::hours(12);

/// Username of the administrator created at first start.
pub const BOOTSTRAP_USERNAME: &str = "admin";

/// The reason reported for every failed login.
const LOGIN_FAILED: &str = "Invalid username or password";

/// The signed-in user as held by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub employee_id: Option<i64>,
}

impl AuthUser {
    /// Converts this user into the audit actor for mutations it performs.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id, self.username.clone())
    }
}

impl From<&UserData> for AuthUser {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            employee_id: user.employee_id,
        }
    }
}

/// A validated session with its resolved permissions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: i64,
    pub session_token: String,
    pub csrf_token: String,
    pub user: AuthUser,
    pub avatar: Option<String>,
    pub permissions: PermissionSet,
}

impl SessionContext {
    /// Returns `true` if the session user holds `code` (or the wildcard).
    #[must_use]
    pub fn can(&self, code: &str) -> bool {
        self.permissions.can(code)
    }

    /// Requires a permission code.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` naming the missing code.
    pub fn require(&self, code: &str) -> Result<(), ApiError> {
        if self.can(code) {
            return Ok(());
        }
        warn!(
            user_id = self.user.id,
            permission = code,
            "Permission denied"
        );
        Err(ApiError::Unauthorized {
            permission: code.to_string(),
        })
    }

    /// Checks a submitted CSRF token against the session's token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCsrfToken` if the token is missing or differs.
    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), ApiError> {
        match submitted {
            Some(token) if tokens_match(token, &self.csrf_token) => Ok(()),
            _ => {
                warn!(user_id = self.user.id, "CSRF token mismatch");
                Err(ApiError::InvalidCsrfToken)
            }
        }
    }
}

/// The result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The newly issued session token (the cookie value).
    pub session_token: String,
    pub csrf_token: String,
    pub user: AuthUser,
}

/// Generates a 256-bit random token, hex encoded.
#[must_use]
pub fn generate_token() -> String {
    (0..4)
        .map(|_| format!("{:016x}", rand::random::<u64>()))
        .collect()
}

/// Compares two tokens without short-circuiting on the first differing byte.
#[must_use]
pub fn tokens_match(a: &str, b: &str) -> bool {
    let a: &[u8] = a.as_bytes();
    let b: &[u8] = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and opens a new session.
    ///
    /// Any session token the client presented is deleted first, so a login
    /// never reuses an identifier chosen before authentication.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `username` - The submitted username (matched case-insensitively)
    /// * `password` - The submitted password
    /// * `previous_token` - The session token the client presented, if any
    /// * `lifetime` - How long the new session stays valid
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` with the same reason for unknown users,
    /// wrong passwords and disabled accounts.
    pub fn try_login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
        previous_token: Option<&str>,
        lifetime: Duration,
    ) -> Result<LoginOutcome, ApiError> {
        let username: &str = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Self::login_failed());
        }

        let Some(user) = persistence.get_user_by_username(username)? else {
            warn!(username, "Login rejected: unknown user");
            return Err(Self::login_failed());
        };

        if !user.is_active {
            warn!(user_id = user.user_id, "Login rejected: account disabled");
            return Err(Self::login_failed());
        }

        match bcrypt::verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = user.user_id, "Login rejected: wrong password");
                return Err(Self::login_failed());
            }
            Err(e) => {
                warn!(
                    user_id = user.user_id,
                    error = %e,
                    "Login rejected: unreadable password hash"
                );
                return Err(Self::login_failed());
            }
        }

        if let Some(token) = previous_token {
            persistence.delete_session(token)?;
        }

        persistence.update_last_login(user.user_id)?;

        let session_token: String = generate_token();
        let csrf_token: String = generate_token();
        let expires_at: String = Self::expiry_from_now(lifetime)?;
        persistence.create_session(&session_token, user.user_id, &csrf_token, &expires_at)?;

        info!(user_id = user.user_id, username = %user.username, "User logged in");

        Ok(LoginOutcome {
            session_token,
            csrf_token,
            user: AuthUser::from(&user),
        })
    }

    /// Validates a session token and resolves the session user.
    ///
    /// Expired sessions and sessions of disabled or deleted users are removed.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the session is unknown, expired or
    /// belongs to an inactive user.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<SessionContext, ApiError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)?
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: String::from("Invalid session"),
            })?;

        if session.expires_at <= now_timestamp() {
            debug!(session_id = session.session_id, "Session expired");
            persistence.delete_session(session_token)?;
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = match persistence.get_user_by_id(session.user_id)? {
            Some(user) if user.is_active => user,
            _ => {
                warn!(
                    user_id = session.user_id,
                    "Session rejected: user missing or disabled"
                );
                persistence.delete_session(session_token)?;
                return Err(ApiError::AuthenticationFailed {
                    reason: String::from("Account is not active"),
                });
            }
        };

        persistence.update_session_activity(session.session_id)?;
        let permissions: PermissionSet = get_user_permissions(persistence, &session)?;

        Ok(SessionContext {
            session_id: session.session_id,
            session_token: session.session_token,
            csrf_token: session.csrf_token,
            avatar: user.avatar.clone(),
            user: AuthUser::from(&user),
            permissions,
        })
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session row cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
        let removed: usize = persistence.delete_session(session_token)?;
        info!(removed, "User logged out");
        Ok(())
    }

    /// Deletes every session whose expiry has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup query fails.
    pub fn cleanup_expired_sessions(persistence: &mut Persistence) -> Result<usize, ApiError> {
        let removed: usize = persistence.delete_expired_sessions(&now_timestamp())?;
        if removed > 0 {
            info!(removed, "Removed expired sessions");
        }
        Ok(removed)
    }

    /// Creates the bootstrap administrator when no users exist.
    ///
    /// # Returns
    ///
    /// The new user's id, or `None` if users already exist.
    ///
    /// # Errors
    ///
    /// Returns `PasswordPolicyViolation` if the configured password is weak,
    /// or an error if the account cannot be created.
    pub fn bootstrap_admin(
        persistence: &mut Persistence,
        password: &str,
    ) -> Result<Option<i64>, ApiError> {
        PasswordPolicy::default().validate(password, password, BOOTSTRAP_USERNAME)?;
        let created: Option<i64> = persistence.bootstrap_admin(BOOTSTRAP_USERNAME, password)?;
        match created {
            Some(user_id) => {
                info!(user_id, "Bootstrap administrator '{}' created", BOOTSTRAP_USERNAME);
            }
            None => debug!("Users exist; bootstrap skipped"),
        }
        Ok(created)
    }

    fn expiry_from_now(lifetime: Duration) -> Result<String, ApiError> {
        OffsetDateTime::now_utc()
            .checked_add(lifetime)
            .map(format_timestamp)
            .ok_or_else(|| ApiError::Internal {
                message: String::from("Session lifetime overflows the calendar"),
            })
    }

    fn login_failed() -> ApiError {
        ApiError::AuthenticationFailed {
            reason: String::from(LOGIN_FAILED),
        }
    }
}
