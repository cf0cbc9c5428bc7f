// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored timestamp format.
//!
//! Timestamps are UTC `YYYY-MM-DD HH:MM:SS` strings. The fixed width makes
//! string comparison agree with chronological order on every backend.

use time::OffsetDateTime;

/// Formats a timestamp for storage.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at: OffsetDateTime = at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Returns the current time formatted for storage.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}
