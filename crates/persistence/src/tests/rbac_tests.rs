// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, create_test_user};
use crate::{ListFilter, PermissionData, PersistenceError, RoleData};

fn permission_id(persistence: &mut crate::Persistence, code: &str) -> i64 {
    let filter: ListFilter = ListFilter {
        search: Some(code.to_string()),
        active: None,
    };
    persistence
        .list_permissions(&filter)
        .unwrap()
        .into_iter()
        .find(|p| p.code == code)
        .map(|p| p.permission_id)
        .unwrap()
}

#[test]
fn test_seeded_catalog_contains_wildcard_and_audit_view() {
    let mut persistence = create_test_persistence();
    let codes: Vec<String> = persistence
        .list_permissions(&ListFilter::default())
        .unwrap()
        .into_iter()
        .map(|p: PermissionData| p.code)
        .collect();

    assert!(codes.contains(&String::from("*")));
    assert!(codes.contains(&String::from("audit.view")));
    assert!(codes.contains(&String::from("assets.manage")));
}

#[test]
fn test_seeded_roles_hold_expected_permissions() {
    let mut persistence = create_test_persistence();
    let admin: RoleData = persistence.get_role_by_name("Administrator").unwrap().unwrap();
    let auditor: RoleData = persistence.get_role_by_name("Auditor").unwrap().unwrap();

    let wildcard: i64 = permission_id(&mut persistence, "*");
    let audit_view: i64 = permission_id(&mut persistence, "audit.view");

    assert_eq!(
        persistence.get_role_permission_ids(admin.role_id).unwrap(),
        vec![wildcard]
    );
    assert_eq!(
        persistence.get_role_permission_ids(auditor.role_id).unwrap(),
        vec![audit_view]
    );
}

#[test]
fn test_user_without_roles_has_no_permissions() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    assert!(persistence.get_permission_codes_for_user(user_id).unwrap().is_empty());
}

#[test]
fn test_permissions_are_union_of_roles_without_duplicates() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");

    let assets_view: i64 = permission_id(&mut persistence, "assets.view");
    let assets_manage: i64 = permission_id(&mut persistence, "assets.manage");
    let audit_view: i64 = permission_id(&mut persistence, "audit.view");

    let clerk: i64 = persistence.create_role("Clerk", None).unwrap();
    persistence
        .replace_role_permissions(clerk, &[assets_view, audit_view])
        .unwrap();
    let keeper: i64 = persistence.create_role("Keeper", Some("Store keeper")).unwrap();
    persistence
        .replace_role_permissions(keeper, &[assets_view, assets_manage])
        .unwrap();

    persistence.replace_user_roles(user_id, &[clerk, keeper], None).unwrap();

    assert_eq!(
        persistence.get_permission_codes_for_user(user_id).unwrap(),
        vec![
            String::from("assets.manage"),
            String::from("assets.view"),
            String::from("audit.view"),
        ]
    );
}

#[test]
fn test_duplicate_role_name_is_rejected() {
    let mut persistence = create_test_persistence();
    let result = persistence.create_role("Auditor", None);
    assert_eq!(result, Err(PersistenceError::DuplicateName(String::from("Auditor"))));
}

#[test]
fn test_deleting_role_removes_it_from_users() {
    let mut persistence = create_test_persistence();
    let user_id: i64 = create_test_user(&mut persistence, "alice");
    let role_id: i64 = persistence.create_role("Temporary", None).unwrap();
    persistence.replace_user_roles(user_id, &[role_id], None).unwrap();

    persistence.delete_role(role_id).unwrap();

    assert!(persistence.get_role(role_id).unwrap().is_none());
    assert!(persistence.get_user_role_ids(user_id).unwrap().is_empty());
}

#[test]
fn test_permission_crud() {
    let mut persistence = create_test_persistence();
    let permission_id: i64 = persistence
        .create_permission("reports.view", Some("View reports"))
        .unwrap();

    persistence
        .update_permission(permission_id, "reports.read", None)
        .unwrap();
    let updated: PermissionData = persistence.get_permission(permission_id).unwrap().unwrap();
    assert_eq!(updated.code, "reports.read");
    assert!(updated.description.is_none());

    let duplicate = persistence.create_permission("reports.read", None);
    assert!(matches!(duplicate, Err(PersistenceError::DuplicateName(_))));

    persistence.delete_permission(permission_id).unwrap();
    assert!(persistence.get_permission(permission_id).unwrap().is_none());
}
