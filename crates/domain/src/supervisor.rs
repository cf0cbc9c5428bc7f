// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Which supervisor roles an employee holds.
///
/// An employee is a supervisor at a level when at least one other employee
/// names them in the matching supervisor column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorLevels {
    /// Referenced as an administrative supervisor.
    pub admin: bool,
    /// Referenced as a technical supervisor.
    pub technical: bool,
    /// Referenced as a second-level supervisor.
    pub second_level: bool,
}

impl SupervisorLevels {
    /// Levels for an employee who supervises nobody.
    pub const NONE: Self = Self {
        admin: false,
        technical: false,
        second_level: false,
    };

    /// Returns `true` if any level is held.
    #[must_use]
    pub const fn is_supervisor(&self) -> bool {
        self.admin || self.technical || self.second_level
    }
}
