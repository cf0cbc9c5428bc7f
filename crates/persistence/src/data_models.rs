// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Search and active-flag filter applied to list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Free-text search, matched with `LIKE %q%` over the entity's search columns.
    pub search: Option<String>,
    /// Restrict to active (`true`) or inactive (`false`) rows.
    pub active: Option<bool>,
}

impl ListFilter {
    /// Returns the `LIKE` pattern for the search text, if any.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"))
    }

    /// Returns the stored active-flag value to filter on, if any.
    #[must_use]
    pub fn active_flag(&self) -> Option<i32> {
        self.active.map(i32::from)
    }
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<i64>,
    pub last_login_at: Option<String>,
    pub avatar: Option<String>,
    pub employee_id: Option<i64>,
}

/// A server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub csrf_token: String,
    /// Cached effective permission codes, as a JSON array.
    pub permissions_json: Option<String>,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleData {
    pub role_id: i64,
    pub role_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionData {
    pub permission_id: i64,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentData {
    pub department_id: i64,
    pub department_name: String,
    pub is_active: bool,
}

/// A job title. The id is allocated by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationData {
    pub job_title_id: i64,
    pub title: String,
    pub grade: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub location_id: i64,
    pub location_code: String,
    pub location_type: Option<String>,
    pub location_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<i64>,
}

/// Editable location fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFields {
    pub location_code: String,
    pub location_type: Option<String>,
    pub location_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeData {
    pub leave_type_id: i64,
    pub leave_name: String,
    pub days_per_year: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub location_id: Option<i64>,
    pub job_title_id: Option<i64>,
    pub supervisor_admin_id: Option<i64>,
    pub supervisor_technical_id: Option<i64>,
    pub supervisor_second_level_id: Option<i64>,
    pub is_active: bool,
}

impl EmployeeData {
    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Editable employee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department_id: Option<i64>,
    pub location_id: Option<i64>,
    pub job_title_id: Option<i64>,
    pub supervisor_admin_id: Option<i64>,
    pub supervisor_technical_id: Option<i64>,
    pub supervisor_second_level_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCategoryData {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetData {
    pub asset_id: i64,
    pub asset_tag: String,
    pub asset_name: String,
    pub category_id: i64,
    pub current_holder_employee_id: Option<i64>,
    pub current_location_id: Option<i64>,
    pub status: String,
}

/// Editable asset fields. Holder and location are owned by assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFields {
    pub asset_tag: String,
    pub asset_name: String,
    pub category_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentData {
    pub assignment_id: i64,
    pub asset_id: i64,
    pub assigned_to_employee_id: Option<i64>,
    pub assigned_to_location_id: Option<i64>,
    pub assigned_at: String,
    pub expected_return_date: Option<String>,
    pub returned_at: Option<String>,
    pub is_active: bool,
    pub condition_at_assign: Option<String>,
    pub condition_at_return: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub created_by: Option<i64>,
}

/// Input for a new assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAssignment {
    pub asset_id: i64,
    pub employee_id: Option<i64>,
    pub location_id: Option<i64>,
    /// `YYYY-MM-DD`.
    pub expected_return_date: Option<String>,
    pub condition_at_assign: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentHistoryData {
    pub history_id: i64,
    pub assignment_id: i64,
    pub asset_id: i64,
    pub event: String,
    pub employee_id: Option<i64>,
    pub location_id: Option<i64>,
    pub actor_user_id: Option<i64>,
    pub occurred_at: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogData {
    pub audit_id: i64,
    pub actor_user_id: i64,
    pub actor_username: String,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub created_at: String,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub active_employees: i64,
    pub total_assets: i64,
    pub available_assets: i64,
    pub assigned_assets: i64,
    pub active_assignments: i64,
    pub active_users: i64,
}
