// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Connection setup, migrations, and the few helpers Diesel DSL cannot
//! express (`PRAGMA`, `last_insert_rowid()`, transaction control) live here.
//! Everything else lives in `queries/` and `mutations/`.
//!
//! - `sqlite` — `SQLite` backend (default for development and testing)
//! - `mysql` — MySQL/MariaDB backend (validated via opt-in tests)

pub mod mysql;
pub mod sqlite;

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::result::Error as DieselError;
use diesel::{Connection, MysqlConnection, SqliteConnection};
use tracing::warn;

use crate::error::PersistenceError;

/// Backend-specific operations shared by the generated query functions.
pub trait PersistenceBackend: Connection {
    /// Retrieves the id of the row most recently inserted on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}

/// Opens a writer-serialized `SQLite` transaction (`BEGIN IMMEDIATE`).
///
/// Inside an enclosing transaction this opens a savepoint instead; the
/// enclosing `BEGIN IMMEDIATE` already holds the write lock.
///
/// # Errors
///
/// Returns an error if the transaction cannot start.
pub fn begin_serialized_sqlite(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    match AnsiTransactionManager::begin_transaction_sql(conn, "BEGIN IMMEDIATE") {
        Err(DieselError::AlreadyInTransaction) => {
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::begin_transaction(
                conn,
            )?;
            Ok(())
        }
        other => other.map_err(PersistenceError::from),
    }
}

/// Opens a `MySQL` transaction, or a savepoint inside an enclosing one.
///
/// Exclusion comes from `FOR UPDATE` reads on existing rows (see
/// [`mysql::lock_writer`]).
///
/// # Errors
///
/// Returns an error if the transaction cannot start.
pub fn begin_serialized_mysql(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    <AnsiTransactionManager as TransactionManager<MysqlConnection>>::begin_transaction(conn)?;
    Ok(())
}

/// Commits or rolls back the innermost transaction or savepoint.
///
/// # Errors
///
/// Returns an error if the commit or rollback fails.
pub fn end_transaction<C>(conn: &mut C, commit: bool) -> Result<(), PersistenceError>
where
    C: Connection<TransactionManager = AnsiTransactionManager>,
{
    if commit {
        <AnsiTransactionManager as TransactionManager<C>>::commit_transaction(conn)?;
    } else {
        <AnsiTransactionManager as TransactionManager<C>>::rollback_transaction(conn)?;
    }
    Ok(())
}

/// Commits on `Ok`, rolls back on `Err`, and passes `result` through.
///
/// A failed rollback is logged; the caller sees the original error.
///
/// # Errors
///
/// Returns the error in `result`, or the commit error.
pub fn finish_transaction<C, T, E>(conn: &mut C, result: Result<T, E>) -> Result<T, E>
where
    C: Connection<TransactionManager = AnsiTransactionManager>,
    E: From<PersistenceError>,
{
    match result {
        Ok(value) => {
            end_transaction(conn, true)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = end_transaction(conn, false) {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}

/// Runs `f` in a writer-serialized `SQLite` transaction (`BEGIN IMMEDIATE`).
///
/// # Errors
///
/// Returns the closure's error, or a database error if the transaction
/// cannot start or commit. The transaction is rolled back on any error.
pub fn serialized_sqlite<T, F>(conn: &mut SqliteConnection, f: F) -> Result<T, PersistenceError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
{
    begin_serialized_sqlite(conn)?;
    let result: Result<T, PersistenceError> = f(conn);
    finish_transaction(conn, result)
}

/// Runs `f` in a `MySQL` writer transaction.
///
/// Check-then-insert sequences inside `f` must first take a row lock with
/// [`mysql::lock_writer`] or `FOR UPDATE` on an existing row.
///
/// # Errors
///
/// Returns the closure's error, or a database error if the transaction
/// cannot start or commit. The transaction is rolled back on any error.
pub fn serialized_mysql<T, F>(conn: &mut MysqlConnection, f: F) -> Result<T, PersistenceError>
where
    F: FnOnce(&mut MysqlConnection) -> Result<T, PersistenceError>,
{
    begin_serialized_mysql(conn)?;
    let result: Result<T, PersistenceError> = f(conn);
    finish_transaction(conn, result)
}
