//! Tolerance policy: classifying arrivals against their expected time.
//!
//! Entry lateness within the configured tolerance is recoverable and must be
//! made up at shift end. Returning late from a split break has no tolerance
//! window at all.

use chrono::NaiveDateTime;

use crate::models::{Lateness, minutes_between};

/// Classifies a shift entry.
///
/// `diff = actual - expected` in whole minutes:
/// - `diff <= 0` is on time,
/// - `0 < diff <= tolerance_minutes` is recoverable,
/// - `diff > tolerance_minutes` is late.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::classify_entry_lateness;
/// use attendance_engine::models::Lateness;
/// use chrono::NaiveDateTime;
///
/// let expected = NaiveDateTime::parse_from_str("2026-01-15 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let actual = NaiveDateTime::parse_from_str("2026-01-15 08:10:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// assert_eq!(classify_entry_lateness(actual, expected, 15), Lateness::Recoverable { minutes: 10 });
/// assert_eq!(classify_entry_lateness(actual, expected, 5), Lateness::Late { minutes: 10 });
/// ```
pub fn classify_entry_lateness(
    actual: NaiveDateTime,
    expected: NaiveDateTime,
    tolerance_minutes: u32,
) -> Lateness {
    let diff = minutes_between(expected, actual);
    if diff <= 0 {
        Lateness::OnTime
    } else if diff <= i64::from(tolerance_minutes) {
        Lateness::Recoverable { minutes: diff }
    } else {
        Lateness::Late { minutes: diff }
    }
}

/// Classifies a return from a split break. Any delay is non-recoverable.
pub fn classify_break_return_lateness(actual: NaiveDateTime, expected: NaiveDateTime) -> Lateness {
    classify_entry_lateness(actual, expected, 0)
}
