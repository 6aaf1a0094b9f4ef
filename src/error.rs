//! Error types for the attendance engine.
//!
//! Every rejection the engine can produce is a variant of [`EngineError`].
//! None of them are fatal: a rejected scan leaves the event store untouched
//! and the operator is expected to re-scan.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::EventKind;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
/// use attendance_engine::models::EventKind;
///
/// let error = EngineError::SequenceViolation {
///     attempted: EventKind::ExitShift,
///     expected: Some(EventKind::EntryShift),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Cannot record EXIT_SHIFT now: expected ENTRY_SHIFT next"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The employee is not scheduled to work on the given date.
    #[error("Employee '{employee_id}' has no schedule for {date}")]
    ScheduleNotFound {
        /// The employee that scanned.
        employee_id: String,
        /// The date of the scan.
        date: NaiveDate,
    },

    /// The event kind does not follow from the events already recorded.
    #[error("{}", sequence_message(*attempted, *expected))]
    SequenceViolation {
        /// The kind that was submitted (or inferred).
        attempted: EventKind,
        /// The kind the day is waiting for, `None` once the day is complete.
        expected: Option<EventKind>,
    },

    /// The event kind was already recorded for this employee and date.
    #[error("{kind} already recorded for employee '{employee_id}' on {date}")]
    DuplicateEvent {
        /// The employee that scanned.
        employee_id: String,
        /// The date of the scan.
        date: NaiveDate,
        /// The kind that was repeated.
        kind: EventKind,
    },

    /// A timestamp or schedule time string could not be parsed.
    #[error("Invalid time format '{value}': expected {expected}")]
    InvalidTimeFormat {
        /// The offending input.
        value: String,
        /// A description of the accepted format.
        expected: String,
    },

    /// A schedule is structurally inconsistent.
    #[error("Invalid schedule: {message}")]
    InvalidSchedule {
        /// A description of what made the schedule invalid.
        message: String,
    },

    /// A required policy value is absent and no default may be used.
    #[error("Configuration value missing: {field}")]
    ConfigurationMissing {
        /// The configuration key that was absent.
        field: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// A report range ended before it started or spans too many days.
    #[error("Invalid date range: {from} to {to}")]
    InvalidDateRange {
        /// The start of the range.
        from: NaiveDate,
        /// The end of the range.
        to: NaiveDate,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

fn sequence_message(attempted: EventKind, expected: Option<EventKind>) -> String {
    match expected {
        Some(expected) => format!("Cannot record {attempted} now: expected {expected} next"),
        None => format!("Cannot record {attempted} now: the day is already complete"),
    }
}

impl EngineError {
    /// Returns the event kind the operator should scan next, if the error
    /// carries one.
    pub fn expected_next(&self) -> Option<EventKind> {
        match self {
            EngineError::SequenceViolation { expected, .. } => *expected,
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
