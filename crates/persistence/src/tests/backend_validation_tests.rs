// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! `SQLite` is covered by the rest of the suite. These tests are marked
//! `#[ignore]` and run only via `cargo xtask test-mariadb`, which provides:
//! - `DATABASE_URL` pointing at a throwaway `MariaDB` instance
//! - `PRF_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if required infrastructure is missing.
//!
//! They focus on schema compatibility (constraints, generated columns,
//! transactions). The database is shared between tests, so every test
//! uses names that cannot collide with another test's rows.

use diesel::MysqlConnection;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::env;
use std::sync::{Arc, Barrier};
use std::thread;

use crate::backend::mysql;
use crate::{Persistence, PersistenceError};

/// Result type for COUNT queries.
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Result type for `LAST_INSERT_ID` queries.
#[derive(QueryableByName)]
struct LastInsertIdResult {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `PRF_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("PRF_TEST_BACKEND").expect(
        "PRF_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "PRF_TEST_BACKEND must be 'mariadb'");
}

fn unique_suffix() -> String {
    format!("{}-{:?}", std::process::id(), std::thread::current().id())
        .replace(['(', ')'], "")
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );

    let dangling = diesel::sql_query(
        "INSERT INTO employees (first_name, last_name, department_id) VALUES ('Fk', 'Check', 999999)",
    )
    .execute(&mut conn);
    assert!(
        dangling.is_err(),
        "Employee with non-existent department should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_seeded_access_control() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let count: i64 = diesel::sql_query(
        "SELECT COUNT(*) AS count
         FROM role_permissions rp
         JOIN roles r ON r.role_id = rp.role_id
         JOIN permissions p ON p.permission_id = rp.permission_id
         WHERE r.role_name = 'Administrator' AND p.code = '*'",
    )
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count administrator grants");

    assert_eq!(count, 1, "Administrator role must hold the wildcard permission");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_single_active_assignment_per_asset() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let suffix: String = unique_suffix();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(format!(
        "INSERT INTO asset_categories (category_name) VALUES ('Validation {suffix}')"
    ))
    .execute(&mut conn)
    .expect("Failed to insert category");
    let category_id: i64 = diesel::sql_query("SELECT LAST_INSERT_ID() AS id")
        .get_result::<LastInsertIdResult>(&mut conn)
        .map(|r| r.id)
        .expect("Failed to get category_id");

    diesel::sql_query(format!(
        "INSERT INTO assets (asset_tag, asset_name, category_id) VALUES ('VAL-{suffix}', 'Validation', {category_id})"
    ))
    .execute(&mut conn)
    .expect("Failed to insert asset");
    let asset_id: i64 = diesel::sql_query("SELECT LAST_INSERT_ID() AS id")
        .get_result::<LastInsertIdResult>(&mut conn)
        .map(|r| r.id)
        .expect("Failed to get asset_id");

    diesel::sql_query("INSERT INTO locations (location_code, location_code_key, location_name, created_at) VALUES ('V', 'v', 'V', '2026-01-01 00:00:00') ON DUPLICATE KEY UPDATE location_name = location_name")
        .execute(&mut conn)
        .expect("Failed to upsert location");
    let location_id: i64 = diesel::sql_query(
        "SELECT location_id AS id FROM locations WHERE location_code_key = 'v'",
    )
    .get_result::<LastInsertIdResult>(&mut conn)
    .map(|r| r.id)
    .expect("Failed to get location_id");

    let insert = format!(
        "INSERT INTO assignments (asset_id, assigned_to_location_id, assigned_at, is_active, created_at)
         VALUES ({asset_id}, {location_id}, '2026-01-01 00:00:00', 1, '2026-01-01 00:00:00')"
    );
    diesel::sql_query(&insert)
        .execute(&mut conn)
        .expect("Failed to insert first assignment");

    let duplicate = diesel::sql_query(&insert).execute(&mut conn);
    assert!(
        duplicate.is_err(),
        "A second active assignment for one asset should fail on the generated unique column"
    );

    diesel::sql_query(format!(
        "UPDATE assignments SET is_active = 0 WHERE asset_id = {asset_id}"
    ))
    .execute(&mut conn)
    .expect("Failed to close assignment");
    diesel::sql_query(&insert)
        .execute(&mut conn)
        .expect("A new active assignment is allowed once the previous one is closed");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_create_designation_rejects_duplicates() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let title: String = format!("Validation Title {}", unique_suffix());

    let mut persistence =
        Persistence::new_with_mysql(&url).expect("Failed to initialize MariaDB persistence");

    let first = persistence
        .create_designation(&title, None, None)
        .expect("First designation insert failed");
    assert!(first >= 1);

    let second = persistence.create_designation(&title.to_uppercase(), None, None);
    assert!(
        matches!(second, Err(PersistenceError::DuplicateName(_))),
        "Expected DuplicateName, got {second:?}"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_concurrent_designation_creates_yield_one_row() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let title: String = format!("Concurrent Title {}", unique_suffix());

    // Applies migrations once before the writers connect.
    Persistence::new_with_mysql(&url).expect("Failed to initialize MariaDB persistence");

    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));
    let handles: Vec<thread::JoinHandle<Result<i64, PersistenceError>>> =
        [title.clone(), format!("  {}  ", title.to_lowercase())]
            .into_iter()
            .map(|candidate| {
                let barrier: Arc<Barrier> = Arc::clone(&barrier);
                let url: String = url.clone();
                thread::spawn(move || {
                    let mut persistence: Persistence = Persistence::new_with_mysql(&url)?;
                    barrier.wait();
                    persistence.create_designation(&candidate, None, None)
                })
            })
            .collect();

    let results: Vec<Result<i64, PersistenceError>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Writer thread panicked"))
        .collect();

    let successes: usize = results.iter().filter(|r| r.is_ok()).count();
    let duplicates: usize = results
        .iter()
        .filter(|r| matches!(r, Err(PersistenceError::DuplicateName(_))))
        .count();
    assert_eq!(successes, 1, "Expected one insert, got {results:?}");
    assert_eq!(duplicates, 1, "Expected one DuplicateName, got {results:?}");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_atomically_rolls_back_nested_writers() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let title: String = format!("Atomic Title {}", unique_suffix());

    let mut persistence =
        Persistence::new_with_mysql(&url).expect("Failed to initialize MariaDB persistence");

    let result: Result<(), PersistenceError> = persistence.atomically(|p| {
        p.create_designation(&title, None, None)?;
        Err(PersistenceError::InvalidInput(String::from("stop")))
    });
    assert!(matches!(result, Err(PersistenceError::InvalidInput(_))));

    persistence
        .create_designation(&title, None, None)
        .expect("The rolled-back title must be free");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let name: String = format!("Rollback {}", unique_suffix());

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(format!(
        "INSERT INTO departments (department_name) VALUES ('{name}')"
    ))
    .execute(&mut conn)
    .expect("Failed to insert department");

    let count: i64 = diesel::sql_query(format!(
        "SELECT COUNT(*) AS count FROM departments WHERE department_name = '{name}'"
    ))
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count departments");
    assert_eq!(count, 1, "Department should exist within transaction");

    // Test transactions roll back when the connection is dropped.
    drop(conn);

    let mut new_conn = mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");
    let count_after: i64 = diesel::sql_query(format!(
        "SELECT COUNT(*) AS count FROM departments WHERE department_name = '{name}'"
    ))
    .get_result::<CountResult>(&mut new_conn)
    .map(|r| r.count)
    .expect("Failed to count departments after rollback");

    assert_eq!(count_after, 0, "Department should not exist after rollback");
}
