//! Worked-hours calculation.
//!
//! Compares the time a schedule expects against the time actually covered by
//! accepted scans, for a single day and over a date range.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEvent, DaySchedule, Employee, EventKind, minutes_between};

use super::schedule_resolution::resolve_day;

/// Longest range, in days, a single worked-hours report may cover.
pub const MAX_REPORT_DAYS: i64 = 366;

/// Converts minutes to hours, rounded to two decimal places.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::new(minutes, 0) / Decimal::new(60, 0)).round_dp(2)
}

/// Theoretical vs. actual time for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWorked {
    /// Minutes the schedule expects, net of breaks.
    pub theoretical_minutes: i64,
    /// Minutes covered by complete scan pairs.
    pub actual_minutes: i64,
    /// Whether every scan pair the day requires is present.
    pub complete: bool,
}

impl DailyWorked {
    /// Theoretical time in hours.
    pub fn theoretical_hours(&self) -> Decimal {
        minutes_to_hours(self.theoretical_minutes)
    }

    /// Actual time in hours.
    pub fn actual_hours(&self) -> Decimal {
        minutes_to_hours(self.actual_minutes)
    }

    /// Actual minus theoretical; negative when the day fell short.
    pub fn balance_minutes(&self) -> i64 {
        self.actual_minutes - self.theoretical_minutes
    }
}

fn find(events: &[AttendanceEvent], kind: EventKind) -> Option<&AttendanceEvent> {
    events.iter().find(|e| e.kind == kind)
}

fn pair_minutes(events: &[AttendanceEvent], start: EventKind, end: EventKind) -> Option<i64> {
    let start = find(events, start)?;
    let end = find(events, end)?;
    Some(minutes_between(start.timestamp, end.timestamp).max(0))
}

/// Computes theoretical and actual minutes for one day.
///
/// `events` are the day's accepted events. A pair only counts when both of
/// its endpoints exist; configured meal breaks are not deducted from actual
/// time because they are never scanned.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::compute_daily_worked;
/// use attendance_engine::models::{DaySchedule, parse_time};
///
/// let day = DaySchedule::new(parse_time("08:00")?, parse_time("17:00")?)?
///     .with_meal(parse_time("12:00")?, parse_time("13:00")?)?;
///
/// let worked = compute_daily_worked(&day, &[]);
/// assert_eq!(worked.theoretical_minutes, 480);
/// assert_eq!(worked.actual_minutes, 0);
/// assert!(!worked.complete);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn compute_daily_worked(day: &DaySchedule, events: &[AttendanceEvent]) -> DailyWorked {
    let pairs: &[(EventKind, EventKind)] = if day.is_split() {
        &[
            (EventKind::EntryShift, EventKind::ExitBreak),
            (EventKind::EntryPostBreak, EventKind::ExitShift),
        ]
    } else {
        &[(EventKind::EntryShift, EventKind::ExitShift)]
    };

    let counted: Vec<Option<i64>> = pairs
        .iter()
        .map(|(start, end)| pair_minutes(events, *start, *end))
        .collect();

    DailyWorked {
        theoretical_minutes: day.theoretical_minutes(),
        actual_minutes: counted.iter().flatten().sum(),
        complete: counted.iter().all(Option::is_some),
    }
}

/// One scheduled day within a range summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedDay {
    /// The date.
    pub date: NaiveDate,
    /// The day's figures.
    pub worked: DailyWorked,
}

/// Worked time for an employee over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedRangeSummary {
    /// The employee.
    pub employee_id: String,
    /// First date of the range.
    pub from: NaiveDate,
    /// Last date of the range.
    pub to: NaiveDate,
    /// Every scheduled day in the range.
    pub days: Vec<WorkedDay>,
    /// Sum of theoretical minutes.
    pub total_theoretical_minutes: i64,
    /// Sum of actual minutes, partial days included.
    pub total_actual_minutes: i64,
    /// Sum of theoretical time in hours.
    pub total_theoretical_hours: Decimal,
    /// Sum of actual time in hours.
    pub total_actual_hours: Decimal,
    /// Number of days flagged incomplete.
    pub incomplete_days: u32,
}

/// Aggregates daily worked time over `from..=to`.
///
/// Dates the employee is not scheduled on are skipped. Scheduled days with
/// missing scans are included with their partial actual minutes and flagged
/// incomplete.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDateRange`] when `from` is after `to` or the
/// range covers more than [`MAX_REPORT_DAYS`] days.
pub fn aggregate_worked(
    employee: &Employee,
    events: &[AttendanceEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> EngineResult<WorkedRangeSummary> {
    if from > to || (to - from).num_days() >= MAX_REPORT_DAYS {
        return Err(EngineError::InvalidDateRange { from, to });
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<AttendanceEvent>> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.employee_id == employee.id && (from..=to).contains(&e.date))
    {
        by_date.entry(event.date).or_default().push(event.clone());
    }

    let mut days = Vec::new();
    for date in from.iter_days().take_while(|d| *d <= to) {
        let Some(day) = resolve_day(employee, date) else {
            debug!(employee_id = %employee.id, %date, "Skipping unscheduled date");
            continue;
        };
        let day_events = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
        days.push(WorkedDay {
            date,
            worked: compute_daily_worked(day, day_events),
        });
    }

    let total_theoretical_minutes: i64 = days.iter().map(|d| d.worked.theoretical_minutes).sum();
    let total_actual_minutes: i64 = days.iter().map(|d| d.worked.actual_minutes).sum();
    let incomplete_days = days.iter().filter(|d| !d.worked.complete).count() as u32;

    info!(
        employee_id = %employee.id,
        %from,
        %to,
        days = days.len(),
        incomplete_days,
        total_actual_minutes,
        "Worked-hours range aggregated"
    );

    Ok(WorkedRangeSummary {
        employee_id: employee.id.clone(),
        from,
        to,
        days,
        total_theoretical_minutes,
        total_actual_minutes,
        total_theoretical_hours: minutes_to_hours(total_theoretical_minutes),
        total_actual_hours: minutes_to_hours(total_actual_minutes),
        incomplete_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreakOutMarks, EventMarks, Schedule, parse_time, parse_timestamp};
    use chrono::{NaiveTime, Weekday};
    use std::str::FromStr;
    use uuid::Uuid;

    fn hm(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn event(kind: EventKind, timestamp: &str) -> AttendanceEvent {
        let timestamp = parse_timestamp(timestamp).unwrap();
        AttendanceEvent {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            date: timestamp.date(),
            kind,
            timestamp,
            marks: EventMarks::BreakOut(BreakOutMarks {
                expected_time: timestamp.time(),
            }),
            applied: false,
            synced: false,
        }
    }

    fn continuous() -> DaySchedule {
        DaySchedule::new(hm("08:00"), hm("17:00")).unwrap()
    }

    fn split() -> DaySchedule {
        continuous().with_split(hm("12:00"), hm("13:00")).unwrap()
    }

    #[test]
    fn test_split_day_actual_minutes() {
        let events = vec![
            event(EventKind::EntryShift, "2026-01-15T08:00"),
            event(EventKind::ExitBreak, "2026-01-15T12:00"),
            event(EventKind::EntryPostBreak, "2026-01-15T13:00"),
            event(EventKind::ExitShift, "2026-01-15T17:00"),
        ];
        let worked = compute_daily_worked(&split(), &events);
        assert_eq!(worked.actual_minutes, 480);
        assert_eq!(worked.theoretical_minutes, 480);
        assert!(worked.complete);
        assert_eq!(worked.actual_hours(), dec("8"));
    }

    #[test]
    fn test_continuous_day_with_meal_theoretical() {
        let day = continuous().with_meal(hm("12:00"), hm("13:00")).unwrap();

        let events = vec![
            event(EventKind::EntryShift, "2026-01-15T08:00"),
            event(EventKind::ExitShift, "2026-01-15T17:00"),
        ];
        let worked = compute_daily_worked(&day, &events);
        assert_eq!(worked.theoretical_minutes, 480);
        assert_eq!(worked.actual_minutes, 540);
        assert_eq!(worked.balance_minutes(), 60);
    }

    #[test]
    fn test_continuous_day_missing_exit_is_incomplete() {
        let events = vec![event(EventKind::EntryShift, "2026-01-15T08:00")];
        let worked = compute_daily_worked(&continuous(), &events);
        assert_eq!(worked.actual_minutes, 0);
        assert!(!worked.complete);
    }

    #[test]
    fn test_split_day_partial_counts_complete_pair_only() {
        let events = vec![
            event(EventKind::EntryShift, "2026-01-15T08:00"),
            event(EventKind::ExitBreak, "2026-01-15T12:00"),
            event(EventKind::EntryPostBreak, "2026-01-15T13:00"),
        ];
        let worked = compute_daily_worked(&split(), &events);
        assert_eq!(worked.actual_minutes, 240);
        assert!(!worked.complete);
    }

    #[test]
    fn test_actual_minutes_clamped_at_zero() {
        let events = vec![
            event(EventKind::EntryShift, "2026-01-15T17:00"),
            event(EventKind::ExitShift, "2026-01-15T08:00"),
        ];
        let worked = compute_daily_worked(&continuous(), &events);
        assert_eq!(worked.actual_minutes, 0);
        assert!(worked.complete);
    }

    #[test]
    fn test_minutes_to_hours_rounds() {
        assert_eq!(minutes_to_hours(90), dec("1.5"));
        assert_eq!(minutes_to_hours(10), dec("0.17"));
    }

    fn employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: String::new(),
            schedule: Schedule::Fixed {
                weekdays: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed],
                day: continuous(),
            },
            active: true,
        }
    }

    #[test]
    fn test_aggregate_week_skips_unscheduled_and_flags_partial() {
        // 2026-01-12 Monday .. 2026-01-18 Sunday; scheduled Mon-Wed.
        let events = vec![
            event(EventKind::EntryShift, "2026-01-12T08:00"),
            event(EventKind::ExitShift, "2026-01-12T17:00"),
            event(EventKind::EntryShift, "2026-01-13T08:00"),
            // Thursday is not scheduled; its events are ignored.
            event(EventKind::EntryShift, "2026-01-15T08:00"),
            event(EventKind::ExitShift, "2026-01-15T17:00"),
        ];
        let from = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();

        let summary = aggregate_worked(&employee(), &events, from, to).unwrap();
        assert_eq!(summary.days.len(), 3);
        assert_eq!(summary.total_theoretical_minutes, 3 * 540);
        assert_eq!(summary.total_actual_minutes, 540);
        assert_eq!(summary.incomplete_days, 2);
        assert_eq!(summary.total_actual_hours, dec("9"));
    }

    #[test]
    fn test_aggregate_rejects_inverted_range() {
        let from = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(
            aggregate_worked(&employee(), &[], from, to).unwrap_err(),
            EngineError::InvalidDateRange { from, to }
        );
    }

    #[test]
    fn test_aggregate_rejects_range_longer_than_limit() {
        let from = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(
            aggregate_worked(&employee(), &[], from, to).unwrap_err(),
            EngineError::InvalidDateRange { from, to }
        );

        // 2024 is a leap year: 366 days is the widest accepted range.
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert!(aggregate_worked(&employee(), &[], from, to).is_ok());
        assert!(aggregate_worked(&employee(), &[], from, to.succ_opt().unwrap()).is_err());
    }

    #[test]
    fn test_aggregate_single_day_range() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let summary = aggregate_worked(&employee(), &[], date, date).unwrap();
        assert_eq!(summary.days.len(), 1);
        assert_eq!(summary.incomplete_days, 1);
    }
}
