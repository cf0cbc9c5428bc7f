// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submitted form values and the field descriptions pages render.

use std::collections::BTreeMap;

use prf_domain::{
    optional_text, parse_optional_count, parse_optional_date, parse_optional_id,
    parse_required_id, require_text,
};
use time::Date;

use crate::error::ApiError;

/// Decoded `application/x-www-form-urlencoded` fields.
///
/// Repeated names (checkbox lists) keep every value in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: BTreeMap<String, Vec<String>>,
}

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Replaces every value under `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), vec![value.into()]);
    }

    /// Returns the first value submitted under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value submitted under `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `name` holds `value` among its values.
    #[must_use]
    pub fn contains(&self, name: &str, value: &str) -> bool {
        self.get_all(name).iter().any(|v| v == value)
    }

    /// Required, whitespace-normalized text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if blank or too long.
    pub fn required_text(&self, name: &str, max_len: usize) -> Result<String, ApiError> {
        Ok(require_text(name, self.get(name).unwrap_or_default(), max_len)?)
    }

    /// Optional trimmed text; blank becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if too long.
    pub fn optional_text(&self, name: &str, max_len: usize) -> Result<Option<String>, ApiError> {
        Ok(optional_text(name, self.get(name), max_len)?)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` if missing or not a positive integer.
    pub fn required_id(&self, name: &str) -> Result<i64, ApiError> {
        Ok(parse_required_id(name, self.get(name))?)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` if present but not a positive integer.
    pub fn optional_id(&self, name: &str) -> Result<Option<i64>, ApiError> {
        Ok(parse_optional_id(name, self.get(name))?)
    }

    /// Every value under `name`, parsed as ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for the first value that is not a positive integer.
    pub fn id_list(&self, name: &str) -> Result<Vec<i64>, ApiError> {
        let mut ids: Vec<i64> = Vec::new();
        for raw in self.get_all(name) {
            if let Some(id) = parse_optional_id(name, Some(raw))? {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` if missing or not a non-negative integer.
    pub fn required_count(&self, name: &str) -> Result<i32, ApiError> {
        parse_optional_count(name, self.get(name))?
            .ok_or_else(|| ApiError::invalid(name, format!("Field '{name}' is required")))
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` if present but not a `YYYY-MM-DD` date.
    pub fn optional_date(&self, name: &str) -> Result<Option<Date>, ApiError> {
        Ok(parse_optional_date(name, self.get(name))?)
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields: Self = Self::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}

/// An option in a select or checkbox list: `(value, label)`.
pub type Choice = (String, String);

/// How a form field is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Date,
    TextArea,
    /// A single choice; the blank option is offered when the field is optional.
    Select(Vec<Choice>),
    /// Any number of choices, submitted as repeated values.
    Checkboxes(Vec<Choice>),
}

/// A form field a page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Only shown when creating a record.
    pub create_only: bool,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            create_only: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn create_only(mut self) -> Self {
        self.create_only = true;
        self
    }
}
