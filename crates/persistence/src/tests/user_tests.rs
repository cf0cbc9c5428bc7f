// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{TEST_PASSWORD, create_test_employee, create_test_persistence, create_test_user};
use crate::{ADMINISTRATOR_ROLE, ListFilter, PersistenceError, UserData};

#[test]
fn test_create_user_stores_bcrypt_hash() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");

    let user: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.is_active);
    assert_ne!(user.password_hash, TEST_PASSWORD);
    assert!(bcrypt::verify(TEST_PASSWORD, &user.password_hash).unwrap());
}

#[test]
fn test_username_lookup_ignores_case_and_padding() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "Alice.Smith");

    let found: Option<UserData> = persistence.get_user_by_username("  alice.smith ").unwrap();
    assert_eq!(found.map(|u| u.user_id), Some(user_id));

    assert!(persistence.get_user_by_username("bob").unwrap().is_none());
}

#[test]
fn test_duplicate_username_differing_in_case_is_rejected() {
    let mut persistence = create_test_persistence();
    create_test_user(&mut persistence, "alice");

    let result = persistence.create_user("ALICE", TEST_PASSWORD, None, None, None);
    assert_eq!(result, Err(PersistenceError::DuplicateName(String::from("ALICE"))));
}

#[test]
fn test_toggle_user_active_flips_flag() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");

    assert!(!persistence.toggle_user_active(user_id).unwrap());
    assert!(!persistence.get_user_by_id(user_id).unwrap().unwrap().is_active);
    assert!(persistence.toggle_user_active(user_id).unwrap());
}

#[test]
fn test_list_users_filters_by_search_and_active_flag() {
    let mut persistence = create_test_persistence();
    create_test_user(&mut persistence, "alice");
    let bob: i64 = create_test_user(&mut persistence, "bob");
    persistence.toggle_user_active(bob).unwrap();

    let search: ListFilter = ListFilter {
        search: Some(String::from("ali")),
        active: None,
    };
    let names: Vec<String> = persistence
        .list_users(&search)
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec![String::from("alice")]);

    let inactive: ListFilter = ListFilter {
        search: None,
        active: Some(false),
    };
    let ids: Vec<i64> = persistence
        .list_users(&inactive)
        .unwrap()
        .into_iter()
        .map(|u| u.user_id)
        .collect();
    assert_eq!(ids, vec![bob]);
}

#[test]
fn test_update_user_links_employee() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    let employee_id: i64 = create_test_employee(&mut persistence, "Alice", "Smith");

    persistence
        .update_user(user_id, Some("alice@example.org"), Some(employee_id))
        .unwrap();

    let user: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("alice@example.org"));
    assert_eq!(user.employee_id, Some(employee_id));
}

#[test]
fn test_update_missing_user_is_not_found() {
    let mut persistence = create_test_persistence();
    let result = persistence.update_user(999, None, None);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_update_password_replaces_hash() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");

    persistence.update_password(user_id, "Another-Secret-7").unwrap();

    let user: UserData = persistence.get_user_by_id(user_id).unwrap().unwrap();
    assert!(bcrypt::verify("Another-Secret-7", &user.password_hash).unwrap());
    assert!(!bcrypt::verify(TEST_PASSWORD, &user.password_hash).unwrap());
}

#[test]
fn test_set_and_clear_avatar() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");

    persistence
        .set_avatar(user_id, Some("data:image/png;base64,iVBORw0KGgo="))
        .unwrap();
    assert!(persistence.get_user_by_id(user_id).unwrap().unwrap().avatar.is_some());

    persistence.set_avatar(user_id, None).unwrap();
    assert!(persistence.get_user_by_id(user_id).unwrap().unwrap().avatar.is_none());
}

#[test]
fn test_update_last_login_sets_timestamp() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    assert!(persistence.get_user_by_id(user_id).unwrap().unwrap().last_login_at.is_none());

    persistence.update_last_login(user_id).unwrap();

    let last_login: Option<String> = persistence
        .get_user_by_id(user_id)
        .unwrap()
        .unwrap()
        .last_login_at;
    assert_eq!(last_login.map(|ts| ts.len()), Some(19));
}

#[test]
fn test_replace_user_roles_is_all_or_nothing() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    let admin_role: i64 = persistence
        .get_role_by_name(ADMINISTRATOR_ROLE)
        .unwrap()
        .unwrap()
        .role_id;

    persistence.replace_user_roles(user_id, &[admin_role], None).unwrap();
    assert_eq!(persistence.get_user_role_ids(user_id).unwrap(), vec![admin_role]);

    // 9999 does not exist, so the whole replacement is rolled back.
    let result = persistence.replace_user_roles(user_id, &[9999], None);
    assert!(result.is_err());
    assert_eq!(persistence.get_user_role_ids(user_id).unwrap(), vec![admin_role]);

    persistence.replace_user_roles(user_id, &[], None).unwrap();
    assert!(persistence.get_user_role_ids(user_id).unwrap().is_empty());
}

#[test]
fn test_bootstrap_admin_runs_only_on_empty_table() {
    let mut persistence = create_test_persistence();

    let created: Option<i64> = persistence.bootstrap_admin("admin", TEST_PASSWORD).unwrap();
    let admin_id: i64 = created.unwrap();
    assert_eq!(
        persistence.get_permission_codes_for_user(admin_id).unwrap(),
        vec![String::from("*")]
    );

    let second: Option<i64> = persistence.bootstrap_admin("admin", "Different-Pass-9").unwrap();
    assert!(second.is_none());
    assert_eq!(persistence.count_users().unwrap(), 1);
}

#[test]
fn test_bootstrap_admin_skipped_when_users_exist() {
    let mut persistence = create_test_persistence();
    create_test_user(&mut persistence, "alice");

    assert!(persistence.bootstrap_admin("admin", TEST_PASSWORD).unwrap().is_none());
    assert!(persistence.get_user_by_username("admin").unwrap().is_none());
}

#[test]
fn test_delete_user_cascades_sessions_and_roles() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    let admin_role: i64 = persistence
        .get_role_by_name(ADMINISTRATOR_ROLE)
        .unwrap()
        .unwrap()
        .role_id;
    persistence.replace_user_roles(user_id, &[admin_role], None).unwrap();
    persistence
        .create_session("token-a", user_id, "csrf-a", "2099-01-01 00:00:00")
        .unwrap();

    persistence.delete_user(user_id).unwrap();

    assert!(persistence.get_user_by_id(user_id).unwrap().is_none());
    assert!(persistence.get_session_by_token("token-a").unwrap().is_none());
    assert_eq!(persistence.count_active_users().unwrap(), 0);
}
