//! Lateness aggregation against the monthly limit.
//!
//! A late event is an accepted event carrying non-recoverable late minutes:
//! an entry beyond tolerance or any delayed return from a split break.
//! Recoverable lateness never counts here.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceEvent;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 to 12.
    pub month: u32,
}

impl ReportMonth {
    /// Creates a month, rejecting month numbers outside 1 to 12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidTimeFormat {
                value: format!("{year:04}-{month:02}"),
                expected: "YYYY-MM".to_string(),
            });
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl FromStr for ReportMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTimeFormat {
            value: s.to_string(),
            expected: "YYYY-MM".to_string(),
        };
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for ReportMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReportMonth> for String {
    fn from(month: ReportMonth) -> Self {
        month.to_string()
    }
}

/// One employee's lateness for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatenessSummary {
    /// The employee.
    pub employee_id: String,
    /// The month the monthly count covers.
    pub month: ReportMonth,
    /// Late events within `month`.
    pub late_count_this_month: u32,
    /// Late events across all supplied history.
    pub late_count_total: u32,
    /// Date of the most recent late event, if any.
    pub last_late_date: Option<NaiveDate>,
    /// Whether the monthly count is above the limit.
    pub exceeds_limit: bool,
}

/// Summarizes one employee's lateness.
///
/// Events for other employees are ignored, so the full event history can be
/// passed in.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{ReportMonth, summarize};
///
/// let month: ReportMonth = "2026-01".parse()?;
/// let summary = summarize("emp_001", [], month, 3);
/// assert_eq!(summary.late_count_this_month, 0);
/// assert!(!summary.exceeds_limit);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn summarize<'a>(
    employee_id: &str,
    events: impl IntoIterator<Item = &'a AttendanceEvent>,
    month: ReportMonth,
    monthly_limit: u32,
) -> LatenessSummary {
    let mut late_count_this_month = 0;
    let mut late_count_total = 0;
    let mut last_late_date: Option<NaiveDate> = None;

    for event in events
        .into_iter()
        .filter(|e| e.employee_id == employee_id && e.is_late())
    {
        late_count_total += 1;
        if month.contains(event.date) {
            late_count_this_month += 1;
        }
        last_late_date = last_late_date.max(Some(event.date));
    }

    let exceeds_limit = late_count_this_month > monthly_limit;
    debug!(
        employee_id,
        %month,
        late_count_this_month,
        late_count_total,
        monthly_limit,
        exceeds_limit,
        "Lateness summarized"
    );

    LatenessSummary {
        employee_id: employee_id.to_string(),
        month,
        late_count_this_month,
        late_count_total,
        last_late_date,
        exceeds_limit,
    }
}

/// Summarizes every employee that appears in `events`, each against their
/// own effective monthly limit.
pub fn summarize_all(
    events: &[AttendanceEvent],
    month: ReportMonth,
    config: &Configuration,
) -> Vec<LatenessSummary> {
    let mut by_employee: BTreeMap<&str, Vec<&AttendanceEvent>> = BTreeMap::new();
    for event in events {
        by_employee
            .entry(event.employee_id.as_str())
            .or_default()
            .push(event);
    }

    let summaries: Vec<LatenessSummary> = by_employee
        .into_iter()
        .map(|(employee_id, events)| {
            summarize(
                employee_id,
                events,
                month,
                config.monthly_limit_for(employee_id),
            )
        })
        .collect();

    info!(%month, employees = summaries.len(), "Lateness report summarized");
    summaries
}

/// Orders summaries worst first: monthly count descending, then total count
/// descending, then employee id ascending.
pub fn rank_by_lateness(mut summaries: Vec<LatenessSummary>) -> Vec<LatenessSummary> {
    summaries.sort_by(|a, b| {
        (
            Reverse(a.late_count_this_month),
            Reverse(a.late_count_total),
            &a.employee_id,
        )
            .cmp(&(
                Reverse(b.late_count_this_month),
                Reverse(b.late_count_total),
                &b.employee_id,
            ))
    });
    summaries
}

/// Severity of a lateness alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// One more late event reaches the limit.
    Warning,
    /// The limit has been reached or passed.
    Violation,
}

/// Alert raised for an employee approaching or at the monthly limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatenessAlert {
    /// The employee.
    pub employee_id: String,
    /// Severity.
    pub level: AlertLevel,
    /// Human-readable description.
    pub message: String,
}

/// Derives the alert for a summary, if any.
///
/// A count of `limit - 1` warns, a count at or above `limit` is a
/// violation. A zero count never alerts, so with a limit of 1 the
/// `limit - 1` warning is not raised for an employee with no late events.
pub fn lateness_alert(summary: &LatenessSummary, monthly_limit: u32) -> Option<LatenessAlert> {
    let count = summary.late_count_this_month;
    let level = if count >= monthly_limit && count > 0 {
        AlertLevel::Violation
    } else if count > 0 && count + 1 == monthly_limit {
        AlertLevel::Warning
    } else {
        return None;
    };

    let message = match level {
        AlertLevel::Warning => format!(
            "Employee '{}' has {} late arrivals in {}; one more reaches the limit of {}",
            summary.employee_id, count, summary.month, monthly_limit
        ),
        AlertLevel::Violation => format!(
            "Employee '{}' has {} late arrivals in {}, at or above the limit of {}",
            summary.employee_id, count, summary.month, monthly_limit
        ),
    };

    Some(LatenessAlert {
        employee_id: summary.employee_id.clone(),
        level,
        message,
    })
}
