// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function is generated twice by `backend_fn!`, suffixed `_sqlite`
//! and `_mysql`. The `Persistence` adapter in `lib.rs` dispatches to the
//! version matching the open connection.
//!
//! - `users` — login accounts and their role links
//! - `sessions` — server-side sessions
//! - `rbac` — roles, permissions, effective permission resolution
//! - `reference` — departments, leave types, asset categories
//! - `designations`, `locations`, `employees` — organization data
//! - `assets`, `assignments` — inventory and custody
//! - `audit` — the audit log

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
