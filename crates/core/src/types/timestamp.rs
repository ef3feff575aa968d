//! Timestamp formatting for API query parameters.

use chrono::{DateTime, Utc};

/// `chrono` format string for the `since` query parameter
/// (e.g. `2024-05-01T08:00:00.000Z`).
pub const SINCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a UTC timestamp the way the inventory endpoint expects `since`.
#[must_use]
pub fn format_since(at: DateTime<Utc>) -> String {
    at.format(SINCE_FORMAT).to_string()
}
