// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::normalize_name;
use time::Date;
use time::macros::format_description;

/// Validates a required text field.
///
/// The value is whitespace-normalized before the checks.
///
/// # Arguments
///
/// * `field` - The field name used in error messages
/// * `value` - The raw submitted value
/// * `max_len` - The maximum number of characters allowed
///
/// # Returns
///
/// The normalized value.
///
/// # Errors
///
/// Returns an error if the value is blank or longer than `max_len`.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, DomainError> {
    let normalized: String = normalize_name(value);
    if normalized.is_empty() {
        return Err(DomainError::MissingField {
            field: field.to_string(),
        });
    }
    if normalized.chars().count() > max_len {
        return Err(DomainError::FieldTooLong {
            field: field.to_string(),
            max: max_len,
        });
    }
    Ok(normalized)
}

/// Validates an optional text field.
///
/// Blank values become `None`.
///
/// # Errors
///
/// Returns an error if the trimmed value is longer than `max_len`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, DomainError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::FieldTooLong {
            field: field.to_string(),
            max: max_len,
        });
    }
    Ok(Some(trimmed.to_string()))
}

/// Parses an optional positive identifier (e.g. a foreign-key select).
///
/// Blank values become `None`.
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn parse_optional_id(field: &str, value: Option<&str>) -> Result<Option<i64>, DomainError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(DomainError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parses a required positive identifier.
///
/// # Errors
///
/// Returns an error if the value is missing or not a positive integer.
pub fn parse_required_id(field: &str, value: Option<&str>) -> Result<i64, DomainError> {
    parse_optional_id(field, value)?.ok_or_else(|| DomainError::MissingField {
        field: field.to_string(),
    })
}

/// Parses an optional non-negative whole number.
///
/// # Errors
///
/// Returns an error if the value is not a non-negative integer.
pub fn parse_optional_count(field: &str, value: Option<&str>) -> Result<Option<i32>, DomainError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i32>() {
        Ok(count) if count >= 0 => Ok(Some(count)),
        _ => Err(DomainError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parses an optional calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns an error if the value is present but not a valid date.
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, DomainError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| DomainError::InvalidDate {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Validates an optional email address.
///
/// This is a shape check only: one `@`, a non-empty local part and a dotted domain.
///
/// # Errors
///
/// Returns an error if the address is present but malformed.
pub fn validate_email(value: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(email) = optional_text("email", value, 255)? else {
        return Ok(None);
    };

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::InvalidEmail(String::from("missing '@'")));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::InvalidEmail(format!("'{email}' is malformed")));
    }

    let domain_ok: bool = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.chars().any(char::is_whitespace);
    if !domain_ok {
        return Err(DomainError::InvalidEmail(format!(
            "'{domain}' is not a valid domain"
        )));
    }

    Ok(Some(email))
}

/// Validates a permission code.
///
/// Codes are the wildcard `*` or dotted lowercase identifiers such as
/// `assets.manage`.
///
/// # Errors
///
/// Returns an error if the code is malformed.
pub fn validate_permission_code(value: &str) -> Result<String, DomainError> {
    let code: &str = value.trim();
    if code == crate::permissions::WILDCARD_PERMISSION {
        return Ok(code.to_string());
    }
    if code.is_empty() || code.len() > 100 {
        return Err(DomainError::InvalidPermissionCode(String::from(
            "must be between 1 and 100 characters",
        )));
    }
    let well_formed: bool = code.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    });
    if !well_formed {
        return Err(DomainError::InvalidPermissionCode(format!(
            "'{code}' must be dotted lowercase segments"
        )));
    }
    Ok(code.to_string())
}
