// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! `MySQL` support is compiled by default but validated only by tests marked
//! `#[ignore]`, run through `cargo xtask test-mariadb`. That command starts a
//! `MariaDB` container, exports `DATABASE_URL` and `PRF_TEST_BACKEND=mariadb`,
//! runs the ignored tests, and removes the container.
//!
//! Writer serialization on `MySQL` takes an exclusive row lock before any
//! check-then-insert: the writer's row in `write_locks`, or the existing row
//! being changed. Gap locks taken by `FOR UPDATE` on an empty range do not
//! conflict with each other, so they are never the only guard.
//!
//! `migrations_mysql/` must stay schema-equivalent to `migrations/`. Check
//! with `cargo xtask verify-migrations`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{MysqlConnection, QueryableByName};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::diesel_schema::write_locks;
use crate::error::PersistenceError;

#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Returns `LAST_INSERT_ID()` for this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// `MySQL`-specific migrations.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Connects to `MySQL` and runs migrations.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database");

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Runs pending migrations.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verifies that `@@foreign_key_checks` is on.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    let result: Result<ForeignKeyCheck, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(check) if check.fk_checks == 1 => {
            info!("MySQL foreign key enforcement is enabled");
            Ok(())
        }
        Ok(_) => Err(PersistenceError::ForeignKeyEnforcementNotEnabled),
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}

/// Takes the exclusive row lock for `writer` until the transaction ends.
///
/// `writer` names a row seeded in `write_locks`.
///
/// # Errors
///
/// Returns `InitializationError` if the row is missing, or a database error
/// (including lock wait timeouts).
pub fn lock_writer(conn: &mut MysqlConnection, writer: &str) -> Result<(), PersistenceError> {
    let locked: Vec<String> = write_locks::table
        .filter(write_locks::lock_name.eq(writer))
        .select(write_locks::lock_name)
        .for_update()
        .load(conn)?;
    if locked.is_empty() {
        return Err(PersistenceError::InitializationError(format!(
            "Writer lock '{writer}' is not seeded"
        )));
    }
    Ok(())
}
