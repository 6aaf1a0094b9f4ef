//! Parsing and arithmetic helpers for clock times and scan timestamps.

use chrono::{NaiveDateTime, NaiveTime};

use crate::error::{EngineError, EngineResult};

/// Format used when writing schedule times back out.
pub const TIME_FORMAT: &str = "%H:%M";

const TIME_INPUT_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

const TIMESTAMP_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a schedule time in `HH:mm` (or `HH:mm:ss`) form.
///
/// # Examples
///
/// ```
/// use attendance_engine::models::parse_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time("08:30").unwrap(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
/// assert!(parse_time("8h30").is_err());
/// ```
pub fn parse_time(value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeFormat {
            value: value.to_string(),
            expected: "HH:mm".to_string(),
        })
}

/// Parses a scan timestamp such as `2026-01-15T08:10:00` or `2026-01-15 08:10`.
pub fn parse_timestamp(value: &str) -> EngineResult<NaiveDateTime> {
    let trimmed = value.trim();
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeFormat {
            value: value.to_string(),
            expected: "YYYY-MM-DDTHH:mm[:ss]".to_string(),
        })
}

/// Formats a schedule time as `HH:mm`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Whole minutes from `start` to `end`, truncated toward zero.
///
/// Negative when `end` is before `start`.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Whole minutes between two clock times on the same day.
pub fn clock_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}
