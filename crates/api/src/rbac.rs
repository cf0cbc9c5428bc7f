// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permission resolution and supervisor lookup.

use prf_domain::{PermissionSet, SupervisorLevels};
use prf_persistence::{Persistence, SessionData};
use tracing::{debug, error, warn};

use crate::auth::AuthUser;
use crate::error::ApiError;

/// Returns the effective permissions of a session's user.
///
/// The set is computed from the user's roles once per session and cached in
/// the session row. A fresh login is the only thing that refreshes it.
///
/// # Errors
///
/// Returns an error if the permission query or the cache write fails.
pub fn get_user_permissions(
    persistence: &mut Persistence,
    session: &SessionData,
) -> Result<PermissionSet, ApiError> {
    if let Some(cached) = session.permissions_json.as_deref() {
        match serde_json::from_str::<Vec<String>>(cached) {
            Ok(codes) => return Ok(codes.into_iter().collect()),
            Err(e) => {
                warn!(
                    session_id = session.session_id,
                    error = %e,
                    "Discarding unreadable permission cache"
                );
            }
        }
    }

    let codes: Vec<String> = persistence.get_permission_codes_for_user(session.user_id)?;
    let encoded: String = serde_json::to_string(&codes).map_err(|e| ApiError::Internal {
        message: format!("Failed to encode permission cache: {e}"),
    })?;
    persistence.set_session_permissions(session.session_id, &encoded)?;

    debug!(
        session_id = session.session_id,
        count = codes.len(),
        "Resolved session permissions"
    );
    Ok(codes.into_iter().collect())
}

/// Returns which supervisor roles the user's linked employee holds.
///
/// Users without an employee link supervise nobody. Lookup failures are
/// logged and reported as no supervision so pages still render.
#[must_use]
pub fn supervisor_levels_for(persistence: &mut Persistence, user: &AuthUser) -> SupervisorLevels {
    let Some(employee_id) = user.employee_id else {
        return SupervisorLevels::NONE;
    };
    match persistence.get_supervisor_levels(employee_id) {
        Ok(levels) => levels,
        Err(e) => {
            error!(
                user_id = user.id,
                employee_id,
                error = %e,
                "Supervisor lookup failed"
            );
            SupervisorLevels::NONE
        }
    }
}
