// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trims a display name and collapses internal runs of whitespace to a single space.
#[must_use]
pub fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Returns the comparison key for a name: whitespace-normalized and lowercased.
///
/// Two names that differ only in case or spacing share a key. Duplicate
/// checks and unique constraints are expressed over this key.
#[must_use]
pub fn name_key(value: &str) -> String {
    normalize_name(value).to_lowercase()
}

/// A validated login name.
///
/// Usernames are stored as entered (trimmed) and compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Username {
    value: String,
}

impl Username {
    /// Maximum username length.
    pub const MAX_LEN: usize = 50;

    /// Parses and validates a username.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is shorter than 3 characters, longer
    /// than [`Self::MAX_LEN`], or contains characters other than ASCII
    /// letters, digits, `.`, `_` and `-`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.len() < 3 {
            return Err(DomainError::InvalidUsername(String::from(
                "must be at least 3 characters",
            )));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(DomainError::InvalidUsername(String::from(
                "may only contain letters, digits, '.', '_' and '-'",
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the username as entered.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the lowercase lookup key.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.value.to_lowercase()
    }
}

impl PartialEq for Username {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_ignore_ascii_case(&other.value)
    }
}

impl Eq for Username {}

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    /// In stock and free to assign.
    #[default]
    Available,
    /// Held by an employee or location through an active assignment.
    Assigned,
    /// Temporarily out of service.
    UnderMaintenance,
    /// Permanently out of service.
    Retired,
}

impl AssetStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::Assigned,
        Self::UnderMaintenance,
        Self::Retired,
    ];

    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::UnderMaintenance => "UnderMaintenance",
            Self::Retired => "Retired",
        }
    }
}

impl FromStr for AssetStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Assigned" => Ok(Self::Assigned),
            "UnderMaintenance" => Ok(Self::UnderMaintenance),
            "Retired" => Ok(Self::Retired),
            _ => Err(DomainError::InvalidAssetStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of entry in the append-only assignment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentEvent {
    /// An asset was handed to an employee or location.
    Assigned,
    /// An active assignment was closed and the asset returned.
    Returned,
}

impl AssignmentEvent {
    /// Converts this event to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "ASSIGNED",
            Self::Returned => "RETURNED",
        }
    }
}

impl std::fmt::Display for AssignmentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
