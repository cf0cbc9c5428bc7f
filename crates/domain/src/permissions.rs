// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Effective permission sets.
//!
//! A user's effective permissions are the union of the permission codes of
//! every role assigned to them. There is no hierarchy and no deny rule: a
//! check is plain set membership, with the wildcard code granting everything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The permission code that grants every permission.
pub const WILDCARD_PERMISSION: &str = "*";

/// Permission codes checked by the application.
pub mod codes {
    pub const USERS_VIEW: &str = "users.view";
    pub const USERS_MANAGE: &str = "users.manage";
    pub const ROLES_VIEW: &str = "roles.view";
    pub const ROLES_MANAGE: &str = "roles.manage";
    pub const PERMISSIONS_VIEW: &str = "permissions.view";
    pub const PERMISSIONS_MANAGE: &str = "permissions.manage";
    pub const EMPLOYEES_VIEW: &str = "employees.view";
    pub const EMPLOYEES_MANAGE: &str = "employees.manage";
    pub const DEPARTMENTS_VIEW: &str = "departments.view";
    pub const DEPARTMENTS_MANAGE: &str = "departments.manage";
    pub const DESIGNATIONS_VIEW: &str = "designations.view";
    pub const DESIGNATIONS_MANAGE: &str = "designations.manage";
    pub const LOCATIONS_VIEW: &str = "locations.view";
    pub const LOCATIONS_MANAGE: &str = "locations.manage";
    pub const LEAVE_TYPES_VIEW: &str = "leave_types.view";
    pub const LEAVE_TYPES_MANAGE: &str = "leave_types.manage";
    pub const ASSET_CATEGORIES_VIEW: &str = "asset_categories.view";
    pub const ASSET_CATEGORIES_MANAGE: &str = "asset_categories.manage";
    pub const ASSETS_VIEW: &str = "assets.view";
    pub const ASSETS_MANAGE: &str = "assets.manage";
    pub const ASSIGNMENTS_VIEW: &str = "assignments.view";
    pub const ASSIGNMENTS_MANAGE: &str = "assignments.manage";
    pub const AUDIT_VIEW: &str = "audit.view";
}

/// A resolved set of permission codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    codes: BTreeSet<String>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codes: BTreeSet::new(),
        }
    }

    /// Returns `true` if the set grants `code`.
    ///
    /// The wildcard code grants everything.
    #[must_use]
    pub fn can(&self, code: &str) -> bool {
        self.codes.contains(WILDCARD_PERMISSION) || self.codes.contains(code)
    }

    /// Returns `true` if the set grants any of `codes`.
    #[must_use]
    pub fn can_any(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.can(code))
    }

    /// Returns `true` if the set holds the wildcard code.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.codes.contains(WILDCARD_PERMISSION)
    }

    /// Returns the number of distinct codes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the set holds no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates over the codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
