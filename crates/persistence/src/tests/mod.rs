// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod audit_tests;
mod backend_validation_tests;
mod rbac_tests;
mod user_tests;

use crate::{AssetFields, EmployeeFields, Persistence};

pub const TEST_PASSWORD: &str = "Correct-Horse-42";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// Creates an active user with no roles and returns its id.
pub fn create_test_user(persistence: &mut Persistence, username: &str) -> i64 {
    persistence
        .create_user(username, TEST_PASSWORD, None, None, None)
        .expect("Failed to create test user")
}

/// Creates an employee with no references and returns its id.
pub fn create_test_employee(persistence: &mut Persistence, first: &str, last: &str) -> i64 {
    let fields: EmployeeFields = EmployeeFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..EmployeeFields::default()
    };
    persistence
        .create_employee(&fields)
        .expect("Failed to create test employee")
}

/// Creates an available asset in a fresh category and returns its id.
pub fn create_test_asset(persistence: &mut Persistence, tag: &str) -> i64 {
    let category_id: i64 = persistence
        .create_asset_category(&format!("Category for {tag}"))
        .expect("Failed to create test category");
    let fields: AssetFields = AssetFields {
        asset_tag: tag.to_string(),
        asset_name: format!("Asset {tag}"),
        category_id,
        status: String::from("Available"),
    };
    persistence
        .create_asset(&fields)
        .expect("Failed to create test asset")
}
