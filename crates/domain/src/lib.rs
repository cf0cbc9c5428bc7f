// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod avatar;
mod error;
mod navigation;
pub mod permissions;
mod supervisor;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use avatar::{ImageMime, MAX_AVATAR_BYTES, avatar_data_url, detect_image_mime, validate_avatar};
pub use error::DomainError;
pub use navigation::{DEFAULT_LANDING_PATH, is_safe_relative_path, post_login_target};
pub use permissions::{PermissionSet, WILDCARD_PERMISSION};
pub use supervisor::SupervisorLevels;
pub use types::{AssetStatus, AssignmentEvent, Username, name_key, normalize_name};
pub use validation::{
    optional_text, parse_optional_count, parse_optional_date, parse_optional_id,
    parse_required_id, require_text, validate_email, validate_permission_code,
};
