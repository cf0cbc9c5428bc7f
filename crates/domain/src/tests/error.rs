// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::MissingField {
        field: String::from("title"),
    };
    assert_eq!(format!("{err}"), "Field 'title' is required");

    let err: DomainError = DomainError::FieldTooLong {
        field: String::from("grade"),
        max: 50,
    };
    assert_eq!(format!("{err}"), "Field 'grade' must be at most 50 characters");

    let err: DomainError = DomainError::InvalidNumber {
        field: String::from("days_per_year"),
        value: String::from("-3"),
    };
    assert_eq!(
        format!("{err}"),
        "Field 'days_per_year' must be a valid number, got '-3'"
    );

    let err: DomainError = DomainError::InvalidUsername(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid username: test");

    let err: DomainError = DomainError::InvalidAssetStatus(String::from("Lost"));
    assert_eq!(format!("{err}"), "Unknown asset status: Lost");

    let err: DomainError = DomainError::MissingAssignmentTarget;
    assert_eq!(
        format!("{err}"),
        "An assignment needs an employee or a location"
    );

    let err: DomainError = DomainError::ImageTooLarge { size: 10, max: 5 };
    assert_eq!(format!("{err}"), "Image is 10 bytes; the limit is 5 bytes");
}
