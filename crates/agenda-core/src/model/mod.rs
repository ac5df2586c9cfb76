//! Plain data holders for tasks and events.

pub mod event;
pub mod task;

pub use event::{parse_participants, Event};
pub use task::{Category, Priority, Task};

use chrono::{DateTime, NaiveDateTime};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a local date-time the way it is stored and sent.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parse an ISO-8601 local date-time.
///
/// Accepts second or minute precision, fractional seconds, a space instead
/// of `T`, and a trailing offset (the offset is dropped, the wall-clock time kept).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
