// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Single-statement mutations are generated for both backends by
//! `backend_fn!`. Multi-statement mutations that must not interleave with
//! another writer have a shared `backend_fn!` body and thin `_sqlite` /
//! `_mysql` wrappers that open the backend's writer-serialized transaction
//! (see `backend::serialized_sqlite` and `backend::serialized_mysql`).

pub mod assets;
pub mod assignments;
pub mod audit;
pub mod designations;
pub mod employees;
pub mod locations;
pub mod rbac;
pub mod reference;
pub mod sessions;
pub mod users;

use crate::error::PersistenceError;

/// Maps an affected-row count of zero to `NotFound`.
pub(crate) fn require_row(rows: usize, entity: &str, id: i64) -> Result<(), PersistenceError> {
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("{entity} {id}")));
    }
    Ok(())
}

/// Flips a stored 0/1 flag.
pub(crate) const fn flip(flag: i32) -> i32 {
    if flag == 0 { 1 } else { 0 }
}

/// Converts a diesel error, naming the value that collided on a unique key.
pub(crate) fn rename_duplicate(err: diesel::result::Error, name: &str) -> PersistenceError {
    match PersistenceError::from(err) {
        PersistenceError::DuplicateName(_) => PersistenceError::DuplicateName(name.to_string()),
        other => other,
    }
}
