// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing or blank.
    MissingField {
        /// The form field name.
        field: String,
    },
    /// A text field exceeded its maximum length.
    FieldTooLong {
        /// The form field name.
        field: String,
        /// The maximum number of characters allowed.
        max: usize,
    },
    /// A numeric field could not be parsed or is out of range.
    InvalidNumber {
        /// The form field name.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// A date field could not be parsed.
    InvalidDate {
        /// The form field name.
        field: String,
        /// The rejected value.
        value: String,
    },
    /// Username is malformed.
    InvalidUsername(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// Permission code is malformed.
    InvalidPermissionCode(String),
    /// Asset status string is not a known status.
    InvalidAssetStatus(String),
    /// An assignment must target an employee, a location, or both.
    MissingAssignmentTarget,
    /// An uploaded image was empty.
    EmptyImage,
    /// An uploaded image is not JPEG, PNG, GIF or WEBP.
    UnsupportedImageType,
    /// An uploaded image exceeds the size ceiling.
    ImageTooLarge {
        /// The uploaded size in bytes.
        size: usize,
        /// The maximum size in bytes.
        max: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "Field '{field}' is required"),
            Self::FieldTooLong { field, max } => {
                write!(f, "Field '{field}' must be at most {max} characters")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "Field '{field}' must be a valid number, got '{value}'")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "Field '{field}' must be a date (YYYY-MM-DD), got '{value}'")
            }
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidPermissionCode(msg) => write!(f, "Invalid permission code: {msg}"),
            Self::InvalidAssetStatus(status) => write!(f, "Unknown asset status: {status}"),
            Self::MissingAssignmentTarget => {
                write!(f, "An assignment needs an employee or a location")
            }
            Self::EmptyImage => write!(f, "Uploaded image is empty"),
            Self::UnsupportedImageType => {
                write!(f, "Image must be JPEG, PNG, GIF or WEBP")
            }
            Self::ImageTooLarge { size, max } => {
                write!(f, "Image is {size} bytes; the limit is {max} bytes")
            }
        }
    }
}

impl std::error::Error for DomainError {}
