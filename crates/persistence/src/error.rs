// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors that can occur during persistence operations.
///
/// The first group are rule violations the API layer reports to the user;
/// the rest are infrastructure failures it logs and hides.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A row with the same normalized name or code already exists.
    #[error("'{0}' already exists")]
    DuplicateName(String),
    /// The asset already has an active assignment.
    #[error("Asset {asset_id} already has an active assignment")]
    ActiveAssignmentExists { asset_id: i64 },
    /// The change conflicts with existing data, such as a row still referenced elsewhere.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The requested row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Input rejected before reaching the database.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// The database location could not be prepared.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    #[error("Failed to hash password: {0}")]
    PasswordHashing(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound(String::from("Record not found")),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::DuplicateName(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Self::Conflict(String::from(
                    "the record is referenced by other records or references a missing one",
                ))
            }
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
