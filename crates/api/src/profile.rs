// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The signed-in user's own account: password change and avatar.

use prf_domain::avatar_data_url;
use prf_persistence::{Persistence, UserData};
use tracing::{info, warn};

use crate::auth::SessionContext;
use crate::error::ApiError;
use crate::pages::{Mutation, audited};
use crate::password_policy::PasswordPolicy;

/// Audit entity for profile changes.
const PROFILE_ENTITY: &str = "profile";

/// A password change submitted from the profile page.
#[derive(Debug, Clone, Default)]
pub struct ChangePasswordRequest {
    pub csrf_token: Option<String>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Changes the session user's password.
///
/// The current password must verify. Every other session of the user is
/// ended; the session that made the change stays signed in.
///
/// # Errors
///
/// Returns `InvalidCsrfToken`, `AuthenticationFailed` for a wrong current
/// password, or `PasswordPolicyViolation`.
pub fn change_password(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    request: &ChangePasswordRequest,
) -> Result<Mutation, ApiError> {
    ctx.verify_csrf(request.csrf_token.as_deref())?;

    let user: UserData =
        persistence
            .get_user_by_id(ctx.user.id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("User"),
                message: format!("user {}", ctx.user.id),
            })?;

    let verified: bool =
        bcrypt::verify(&request.current_password, &user.password_hash).unwrap_or(false);
    if !verified {
        warn!(user_id = user.user_id, "Password change rejected: current password wrong");
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.confirm_password,
        &user.username,
    )?;

    audited(persistence, ctx, PROFILE_ENTITY, |persistence| {
        persistence.update_password(user.user_id, &request.new_password)?;
        let ended: usize =
            persistence.delete_other_sessions_for_user(user.user_id, &ctx.session_token)?;
        info!(user_id = user.user_id, ended, "Password changed");

        Ok(Mutation::new("change_password", user.user_id)
            .with_details(format!("Ended {ended} other session(s)")))
    })
}

/// Replaces the session user's avatar with an uploaded image.
///
/// The image type comes from the file's magic bytes; whatever content type
/// the browser declared is ignored.
///
/// # Errors
///
/// Returns `InvalidCsrfToken`, or `InvalidInput` for an empty, oversized or
/// unsupported image.
pub fn upload_avatar(
    persistence: &mut Persistence,
    ctx: &SessionContext,
    csrf_token: Option<&str>,
    bytes: &[u8],
) -> Result<Mutation, ApiError> {
    ctx.verify_csrf(csrf_token)?;

    let data_url: String = avatar_data_url(bytes)?;
    audited(persistence, ctx, PROFILE_ENTITY, |persistence| {
        persistence.set_avatar(ctx.user.id, Some(&data_url))?;
        Ok(Mutation::new("upload_avatar", ctx.user.id)
            .with_details(format!("{} bytes", bytes.len())))
    })
}
