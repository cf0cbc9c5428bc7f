// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AssetStatus, AssignmentEvent, DomainError, Username, name_key, normalize_name};
use std::str::FromStr;

#[test]
fn test_normalize_name_collapses_whitespace() {
    assert_eq!(normalize_name("  Senior   Network\tEngineer "), "Senior Network Engineer");
    assert_eq!(normalize_name("   "), "");
}

#[test]
fn test_name_key_ignores_case_and_spacing() {
    assert_eq!(name_key("IT  Manager"), name_key(" it manager"));
    assert_ne!(name_key("IT Manager"), name_key("IT Managers"));
}

#[test]
fn test_username_parse_trims_and_keeps_case() {
    let username: Username = Username::parse("  Admin.User ").unwrap();
    assert_eq!(username.value(), "Admin.User");
    assert_eq!(username.lookup_key(), "admin.user");
}

#[test]
fn test_username_case_insensitive_equality() {
    let lower: Username = Username::parse("jdoe").unwrap();
    let upper: Username = Username::parse("JDOE").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn test_username_rejects_short_long_and_symbols() {
    assert!(matches!(
        Username::parse("ab"),
        Err(DomainError::InvalidUsername(_))
    ));
    assert!(Username::parse(&"a".repeat(Username::MAX_LEN + 1)).is_err());
    assert!(Username::parse("john doe").is_err());
    assert!(Username::parse("john@doe").is_err());
    assert!(Username::parse("john_doe-1").is_ok());
}

#[test]
fn test_asset_status_round_trips_through_strings() {
    for status in AssetStatus::ALL {
        assert_eq!(AssetStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert_eq!(AssetStatus::default(), AssetStatus::Available);
}

#[test]
fn test_asset_status_rejects_unknown() {
    let result: Result<AssetStatus, DomainError> = AssetStatus::from_str("available");
    assert_eq!(
        result,
        Err(DomainError::InvalidAssetStatus(String::from("available")))
    );
}

#[test]
fn test_assignment_event_strings() {
    assert_eq!(AssignmentEvent::Assigned.to_string(), "ASSIGNED");
    assert_eq!(AssignmentEvent::Returned.to_string(), "RETURNED");
}
