// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Where a user lands after login when no usable `next` target was given.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Returns `true` if `path` may be used as a post-login redirect target.
///
/// Accepted: relative paths (`dashboard`, `assets?q=x`) and absolute-path
/// references (`/assets`). Rejected: empty input, any URI scheme (including
/// `http://` and `https://` in any case), protocol-relative `//host`, any
/// backslash, any control character, and any `..` sequence.
#[must_use]
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if path.starts_with("//") || path.contains('\\') || path.contains("..") {
        return false;
    }
    if path.chars().any(char::is_control) {
        return false;
    }
    !has_scheme(path)
}

/// Resolves the post-login redirect target.
#[must_use]
pub fn post_login_target(next: Option<&str>) -> String {
    match next {
        Some(candidate) if is_safe_relative_path(candidate) => {
            if candidate.starts_with('/') {
                candidate.to_string()
            } else {
                format!("/{candidate}")
            }
        }
        _ => DEFAULT_LANDING_PATH.to_string(),
    }
}

// Any colon before the first path separator or query delimiter is treated as
// a scheme delimiter. `mailto:x`, `javascript:x` and `c:` all land here.
fn has_scheme(path: &str) -> bool {
    let head: &str = path.split(['/', '?', '#']).next().unwrap_or_default();
    head.contains(':')
}
