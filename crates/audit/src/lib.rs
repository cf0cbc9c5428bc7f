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
    clippy::all
)]

#[cfg(test)]
mod tests;

/// The signed-in user who performed a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's id.
    pub user_id: i64,
    /// The acting user's username at the time of the action.
    pub username: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(user_id: i64, username: String) -> Self {
        Self { user_id, username }
    }
}

/// What was done (e.g. `create`, `toggle`, `assign_roles`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action.
    pub name: String,
    /// Optional human-readable details.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The record an action touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// The entity slug (e.g. `designations`).
    pub entity: String,
    /// The affected row's id, when one exists.
    pub entity_id: Option<i64>,
}

impl Subject {
    /// Creates a new Subject.
    #[must_use]
    pub const fn new(entity: String, entity_id: Option<i64>) -> Self {
        Self { entity, entity_id }
    }
}

/// One row of the append-only audit trail.
///
/// Every successful mutation produces exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Assigned by the database once persisted.
    pub audit_id: Option<i64>,
    /// Who performed the action.
    pub actor: Actor,
    /// What was performed.
    pub action: Action,
    /// What it was performed on.
    pub subject: Subject,
}

impl AuditEntry {
    /// Creates a new, unpersisted `AuditEntry`.
    #[must_use]
    pub const fn new(actor: Actor, action: Action, subject: Subject) -> Self {
        Self {
            audit_id: None,
            actor,
            action,
            subject,
        }
    }

    /// Returns a copy carrying the id the database assigned.
    #[must_use]
    pub fn with_id(self, audit_id: i64) -> Self {
        Self {
            audit_id: Some(audit_id),
            ..self
        }
    }
}
