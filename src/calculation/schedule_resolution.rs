//! Schedule resolution: which pattern applies on a date, and when each event
//! kind is expected.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{DaySchedule, Employee, EventKind};

/// Resolves the day schedule an employee works on `date`.
///
/// Returns `None` (not an error) when the employee is inactive, the weekday
/// is not scheduled, or the configured day is inactive.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::resolve_day;
/// use attendance_engine::models::{DaySchedule, Employee, Schedule, parse_time};
/// use chrono::{NaiveDate, Weekday};
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: String::new(),
///     schedule: Schedule::Fixed {
///         weekdays: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
///         day: DaySchedule::new(parse_time("08:00")?, parse_time("17:00")?)?,
///     },
///     active: true,
/// };
///
/// // 2026-01-15 is a Thursday, 2026-01-17 a Saturday
/// assert!(resolve_day(&employee, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()).is_some());
/// assert!(resolve_day(&employee, NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()).is_none());
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn resolve_day(employee: &Employee, date: NaiveDate) -> Option<&DaySchedule> {
    if !employee.active {
        return None;
    }
    employee
        .schedule
        .day_for(date.weekday())
        .filter(|day| day.is_active())
}

/// Maps an event kind to the schedule's expected clock time.
///
/// Break kinds only map on split days; `None` tells the caller the kind is
/// not valid for this day.
pub fn expected_time_for(day: &DaySchedule, kind: EventKind) -> Option<NaiveTime> {
    match kind {
        EventKind::EntryShift => Some(day.entry_time()),
        EventKind::ExitShift => Some(day.exit_time()),
        EventKind::ExitBreak => day.split().map(|s| s.break_out),
        EventKind::EntryPostBreak => day.split().map(|s| s.break_in),
    }
}

/// [`expected_time_for`] anchored on a date.
pub fn expected_datetime_for(
    day: &DaySchedule,
    date: NaiveDate,
    kind: EventKind,
) -> Option<NaiveDateTime> {
    expected_time_for(day, kind).map(|time| date.and_time(time))
}

/// The kinds a complete day must contain, in order.
pub fn required_kinds(day: &DaySchedule) -> &'static [EventKind] {
    if day.is_split() {
        &[
            EventKind::EntryShift,
            EventKind::ExitBreak,
            EventKind::EntryPostBreak,
            EventKind::ExitShift,
        ]
    } else {
        &[EventKind::EntryShift, EventKind::ExitShift]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Schedule, WeeklySchedule, parse_time};
    use chrono::Weekday;

    fn hm(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn split_day() -> DaySchedule {
        DaySchedule::new(hm("08:00"), hm("17:00"))
            .unwrap()
            .with_split(hm("12:00"), hm("13:00"))
            .unwrap()
    }

    fn weekly_employee(active: bool) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: String::new(),
            schedule: Schedule::Weekly {
                days: WeeklySchedule::new()
                    .with_day(Weekday::Mon, split_day())
                    .with_day(
                        Weekday::Tue,
                        DaySchedule::new(hm("08:00"), hm("12:00"))
                            .unwrap()
                            .with_active(false),
                    ),
            },
            active,
        }
    }

    #[test]
    fn test_resolve_scheduled_weekday() {
        // 2026-01-12 is a Monday
        let employee = weekly_employee(true);
        let day = resolve_day(&employee, make_date("2026-01-12")).unwrap();
        assert!(day.is_split());
    }

    #[test]
    fn test_resolve_inactive_day_is_none() {
        // 2026-01-13 is a Tuesday
        let employee = weekly_employee(true);
        assert!(resolve_day(&employee, make_date("2026-01-13")).is_none());
    }

    #[test]
    fn test_resolve_unscheduled_weekday_is_none() {
        let employee = weekly_employee(true);
        assert!(resolve_day(&employee, make_date("2026-01-14")).is_none());
    }

    #[test]
    fn test_resolve_inactive_employee_is_none() {
        let employee = weekly_employee(false);
        assert!(resolve_day(&employee, make_date("2026-01-12")).is_none());
    }

    #[test]
    fn test_expected_time_on_split_day() {
        let day = split_day();
        assert_eq!(expected_time_for(&day, EventKind::EntryShift), Some(hm("08:00")));
        assert_eq!(expected_time_for(&day, EventKind::ExitBreak), Some(hm("12:00")));
        assert_eq!(expected_time_for(&day, EventKind::EntryPostBreak), Some(hm("13:00")));
        assert_eq!(expected_time_for(&day, EventKind::ExitShift), Some(hm("17:00")));
    }

    #[test]
    fn test_break_kinds_have_no_expected_time_on_continuous_day() {
        let day = DaySchedule::new(hm("08:00"), hm("17:00")).unwrap();
        assert_eq!(expected_time_for(&day, EventKind::ExitBreak), None);
        assert_eq!(expected_time_for(&day, EventKind::EntryPostBreak), None);
    }

    #[test]
    fn test_required_kinds() {
        assert_eq!(required_kinds(&split_day()).len(), 4);
        let continuous = DaySchedule::new(hm("08:00"), hm("17:00")).unwrap();
        assert_eq!(
            required_kinds(&continuous),
            &[EventKind::EntryShift, EventKind::ExitShift]
        );
    }
}
