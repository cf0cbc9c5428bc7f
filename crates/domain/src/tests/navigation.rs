// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DEFAULT_LANDING_PATH, is_safe_relative_path, post_login_target};

#[test]
fn test_accepts_relative_and_absolute_paths() {
    assert!(is_safe_relative_path("dashboard"));
    assert!(is_safe_relative_path("/assets"));
    assert!(is_safe_relative_path("assets?q=laptop&active=1"));
    assert!(is_safe_relative_path("/audit?q=a:b"));
}

#[test]
fn test_rejects_absolute_urls() {
    assert!(!is_safe_relative_path("http://evil.example"));
    assert!(!is_safe_relative_path("https://evil.example/x"));
    assert!(!is_safe_relative_path("HTTPS://evil.example"));
    assert!(!is_safe_relative_path("//evil.example"));
    assert!(!is_safe_relative_path("javascript:alert(1)"));
}

#[test]
fn test_rejects_traversal_backslash_and_control() {
    assert!(!is_safe_relative_path("../etc/passwd"));
    assert!(!is_safe_relative_path("/assets/../users"));
    assert!(!is_safe_relative_path("\\evil"));
    assert!(!is_safe_relative_path("/dashboard\r\nSet-Cookie: x"));
    assert!(!is_safe_relative_path(""));
}

#[test]
fn test_post_login_target() {
    assert_eq!(post_login_target(Some("assets")), "/assets");
    assert_eq!(post_login_target(Some("/users?edit=3")), "/users?edit=3");
    assert_eq!(post_login_target(Some("https://evil")), DEFAULT_LANDING_PATH);
    assert_eq!(post_login_target(None), DEFAULT_LANDING_PATH);
}
