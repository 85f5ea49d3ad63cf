//! Task record and timestamp handling.
//!
//! This module defines the `Task` struct persisted by the task store, along
//! with helpers for parsing user-entered date-times and formatting stored
//! timestamps for display.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single planner entry: a description plus the instant it refers to.
///
/// `timestamp` is always a UTC ISO-8601 string with millisecond precision
/// (e.g. `2024-01-01T10:00:00.000Z`). `id` is assigned once at creation and
/// never reused; older slot files without ids load as 0 and are backfilled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: u64,
    pub text: String,
    pub timestamp: String,
}

/// The current instant as a UTC ISO-8601 string.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a user-entered date-time and normalise it to a UTC ISO-8601 string.
///
/// Accepts the datetime-input format (`YYYY-MM-DDTHH:MM`, optionally with
/// seconds) and full RFC 3339. Returns `None` for anything else.
pub fn parse_when_input(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            let utc = Utc.from_utc_datetime(&naive);
            return Some(utc.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Render a stored timestamp in local time for display.
///
/// Falls back to the raw stored string when it does not parse, so a damaged
/// record still shows something rather than hiding the row.
pub fn format_timestamp_local(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt.with_timezone(&Local).format("%d %b %Y %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_when_input_normalises_to_utc_millis() {
        assert_eq!(
            parse_when_input("2024-01-01T10:00"),
            Some("2024-01-01T10:00:00.000Z".to_string())
        );
        assert_eq!(
            parse_when_input("2024-01-01T10:00:30"),
            Some("2024-01-01T10:00:30.000Z".to_string())
        );
        assert_eq!(
            parse_when_input("2024-01-01T10:00:00+02:00"),
            Some("2024-01-01T08:00:00.000Z".to_string())
        );
    }

    #[test]
    fn test_parse_when_input_rejects_garbage() {
        assert_eq!(parse_when_input(""), None);
        assert_eq!(parse_when_input("   "), None);
        assert_eq!(parse_when_input("next tuesday"), None);
        assert_eq!(parse_when_input("2024-13-01T10:00"), None);
    }

    #[test]
    fn test_now_iso_round_trips() {
        let now = now_iso();
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
        assert!(now.ends_with('Z'));
    }

    #[test]
    fn test_format_timestamp_local_falls_back_on_bad_input() {
        assert_eq!(format_timestamp_local("not a date"), "not a date");
    }
}
