// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use prf_domain::DomainError;
use prf_persistence::PersistenceError;
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// contract the HTTP layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    ///
    /// Login failures always carry the same generic reason so callers cannot
    /// tell unknown users, wrong passwords and disabled accounts apart.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session user lacks a permission.
    Unauthorized {
        /// The permission code that was required.
        permission: String,
    },
    /// The submitted CSRF token does not match the session's token.
    InvalidCsrfToken,
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns `true` for errors a page renders inline next to the form.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DomainRuleViolation { .. }
                | Self::InvalidInput { .. }
                | Self::ResourceNotFound { .. }
                | Self::PasswordPolicyViolation { .. }
        )
    }

    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rule(rule: &str, message: impl Into<String>) -> Self {
        Self::DomainRuleViolation {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { permission } => {
                write!(f, "Forbidden: requires the '{permission}' permission")
            }
            Self::InvalidCsrfToken => write!(f, "Invalid CSRF token"),
            Self::DomainRuleViolation { message, .. } => write!(f, "{message}"),
            Self::InvalidInput { message, .. } => write!(f, "{message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::MissingField { field }
        | DomainError::FieldTooLong { field, .. }
        | DomainError::InvalidNumber { field, .. }
        | DomainError::InvalidDate { field, .. } => ApiError::InvalidInput { field, message },
        DomainError::InvalidUsername(_) => ApiError::invalid("username", message),
        DomainError::InvalidEmail(_) => ApiError::invalid("email", message),
        DomainError::InvalidPermissionCode(_) => ApiError::invalid("code", message),
        DomainError::InvalidAssetStatus(_) => ApiError::invalid("status", message),
        DomainError::MissingAssignmentTarget => ApiError::rule("assignment_target", message),
        DomainError::EmptyImage
        | DomainError::UnsupportedImageType
        | DomainError::ImageTooLarge { .. } => ApiError::invalid("avatar", message),
    }
}

/// Translates a persistence error into an API error.
///
/// Expected rule violations map to their API counterparts. Anything else is
/// logged and surfaced as an internal error without database detail.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateName(name) => {
            ApiError::rule("unique_name", format!("'{name}' already exists"))
        }
        PersistenceError::ActiveAssignmentExists { asset_id } => ApiError::rule(
            "single_active_assignment",
            format!("Asset {asset_id} already has an active assignment"),
        ),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::Conflict(message) => ApiError::rule("referential_integrity", message),
        PersistenceError::InvalidInput(message) => ApiError::invalid("input", message),
        other => {
            error!(error = %other, "Persistence operation failed");
            ApiError::Internal {
                message: String::from("A database error occurred"),
            }
        }
    }
}
