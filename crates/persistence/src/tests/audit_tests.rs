// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;

use diesel::{Connection, RunQueryDsl, SqliteConnection};

use super::create_test_persistence;
use crate::{AuditLogData, ListFilter, Persistence, PersistenceError};
use prf_audit::{Action, Actor, AuditEntry, Subject};

fn entry(action: &str, entity: &str, entity_id: Option<i64>) -> AuditEntry {
    AuditEntry::new(
        Actor::new(1, String::from("admin")),
        Action::new(action.to_string(), Some(format!("{action} {entity}"))),
        Subject::new(entity.to_string(), entity_id),
    )
}

#[test]
fn test_record_audit_returns_increasing_ids() {
    let mut persistence = create_test_persistence();
    let first: i64 = persistence.record_audit(&entry("create", "departments", Some(1))).unwrap();
    let second: i64 = persistence.record_audit(&entry("toggle", "departments", Some(1))).unwrap();
    assert!(second > first);
}

#[test]
fn test_audit_log_lists_newest_first_with_limit() {
    let mut persistence = create_test_persistence();
    for action in ["create", "update", "delete"] {
        persistence.record_audit(&entry(action, "assets", Some(9))).unwrap();
    }

    let entries: Vec<AuditLogData> = persistence.list_audit_log(&ListFilter::default(), 2).unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["delete", "update"]);
    assert_eq!(entries[0].actor_username, "admin");
    assert_eq!(entries[0].entity_id, Some(9));
}

#[test]
fn test_audit_log_search_and_entity_count() {
    let mut persistence = create_test_persistence();
    persistence.record_audit(&entry("create", "assets", Some(1))).unwrap();
    persistence.record_audit(&entry("create", "locations", Some(2))).unwrap();
    persistence.record_audit(&entry("login", "session", None)).unwrap();

    let search: ListFilter = ListFilter {
        search: Some(String::from("locations")),
        active: None,
    };
    assert_eq!(persistence.list_audit_log(&search, 100).unwrap().len(), 1);
    assert_eq!(persistence.count_audit_entries_for("assets").unwrap(), 1);
    assert_eq!(persistence.count_audit_entries_for("users").unwrap(), 0);
}

/// Makes every audit insert on the database file fail.
fn reject_audit_inserts(path: &Path) {
    let mut conn: SqliteConnection = SqliteConnection::establish(path.to_str().unwrap()).unwrap();
    diesel::sql_query(
        "CREATE TRIGGER reject_audit BEFORE INSERT ON audit_log \
         BEGIN SELECT RAISE(ABORT, 'audit log unavailable'); END",
    )
    .execute(&mut conn)
    .unwrap();
}

#[test]
fn test_atomically_commits_write_and_audit_together() {
    let mut persistence = create_test_persistence();
    let result: Result<i64, PersistenceError> = persistence.atomically(|p| {
        let id: i64 = p.create_designation("Driver", None, None)?;
        p.record_audit(&entry("create", "designations", Some(id)))?;
        Ok(id)
    });

    assert_eq!(result.unwrap(), 1);
    assert_eq!(persistence.count_designations().unwrap(), 1);
    assert_eq!(persistence.count_audit_entries_for("designations").unwrap(), 1);
}

#[test]
fn test_atomically_discards_writes_when_audit_insert_fails() {
    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.db");
    let mut setup: Persistence = Persistence::new_with_file(&path).unwrap();
    reject_audit_inserts(&path);

    let mut persistence: Persistence = Persistence::connect_existing_file(&path).unwrap();
    let result: Result<i64, PersistenceError> = persistence.atomically(|p| {
        let id: i64 = p.create_designation("Driver", None, None)?;
        p.record_audit(&entry("create", "designations", Some(id)))?;
        Ok(id)
    });

    assert!(result.is_err());
    assert_eq!(setup.count_designations().unwrap(), 0);
    assert_eq!(persistence.count_designations().unwrap(), 0);
}

#[test]
fn test_atomically_rolls_back_nested_writers_on_error() {
    let mut persistence = create_test_persistence();
    let result: Result<(), PersistenceError> = persistence.atomically(|p| {
        p.create_designation("Driver", None, None)?;
        p.create_designation("Mechanic", None, None)?;
        Err(PersistenceError::InvalidInput(String::from("stop")))
    });
    assert!(matches!(result, Err(PersistenceError::InvalidInput(_))));
    assert_eq!(persistence.count_designations().unwrap(), 0);

    // The connection is usable and the ids were never taken.
    assert_eq!(persistence.create_designation("Driver", None, None).unwrap(), 1);
}
