//! Event sequencer: the per-(employee, date) state machine.
//!
//! The state of a day is derived from the kinds already recorded; nothing is
//! cached between calls. Two scans for the same employee and date must be
//! serialized by the caller, otherwise both could be decided against the same
//! prior events.
//!
//! | State    | Accepts                          | Next     |
//! |----------|----------------------------------|----------|
//! | None     | `ENTRY_SHIFT`                    | Entered  |
//! | Entered  | `EXIT_BREAK` (split days)        | OnBreak  |
//! | Entered  | `EXIT_SHIFT` (continuous days)   | Exited   |
//! | OnBreak  | `ENTRY_POST_BREAK`               | Returned |
//! | Returned | `EXIT_SHIFT`                     | Exited   |

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Configuration;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceEvent, BreakOutMarks, BreakReturnMarks, DaySchedule, DayState, Employee,
    EntryMarks, EventKind, EventMarks, ExitMarks,
};

use super::schedule_resolution::{expected_datetime_for, resolve_day};
use super::tolerance::{classify_break_return_lateness, classify_entry_lateness};

/// A raw scan from the scanning layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    /// The employee that scanned.
    pub employee_id: String,
    /// The intended kind; `None` lets the state machine decide.
    #[serde(default)]
    pub kind: Option<EventKind>,
    /// When the scan happened.
    pub timestamp: NaiveDateTime,
}

impl Scan {
    /// The working date the scan belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The kind a day in `state` is waiting for, `None` once it is complete.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::next_expected_kind;
/// use attendance_engine::models::{DayState, EventKind};
///
/// assert_eq!(next_expected_kind(DayState::Entered, true), Some(EventKind::ExitBreak));
/// assert_eq!(next_expected_kind(DayState::Entered, false), Some(EventKind::ExitShift));
/// assert_eq!(next_expected_kind(DayState::Exited, true), None);
/// ```
pub fn next_expected_kind(state: DayState, is_split: bool) -> Option<EventKind> {
    match state {
        DayState::None => Some(EventKind::EntryShift),
        DayState::Entered if is_split => Some(EventKind::ExitBreak),
        DayState::Entered => Some(EventKind::ExitShift),
        DayState::OnBreak => Some(EventKind::EntryPostBreak),
        DayState::Returned => Some(EventKind::ExitShift),
        DayState::Exited => None,
    }
}

/// Decides whether a scan is accepted and, if so, classifies it.
///
/// `existing` must be the employee's already-accepted events for the scan's
/// date (extra events for other days or employees are ignored). The returned
/// event has not been stored; the caller appends it. A rejected scan must not
/// produce a stored event.
///
/// # Errors
///
/// - [`EngineError::EmployeeNotFound`] when the scan names a different employee
/// - [`EngineError::ScheduleNotFound`] when the employee does not work that date
/// - [`EngineError::DuplicateEvent`] when the kind is already recorded
/// - [`EngineError::SequenceViolation`] when the kind is not the next one expected
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{Scan, process_scan};
/// use attendance_engine::config::Configuration;
/// use attendance_engine::models::{DaySchedule, Employee, EventKind, Schedule, parse_time, parse_timestamp};
/// use chrono::Weekday;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: String::new(),
///     schedule: Schedule::Fixed {
///         weekdays: vec![Weekday::Thu],
///         day: DaySchedule::new(parse_time("08:00")?, parse_time("17:00")?)?,
///     },
///     active: true,
/// };
/// let config = Configuration::new(15, 3, true);
///
/// let scan = Scan {
///     employee_id: "emp_001".to_string(),
///     kind: None,
///     timestamp: parse_timestamp("2026-01-15T08:10")?,
/// };
/// let event = process_scan(&scan, &employee, &[], &config)?;
/// assert_eq!(event.kind, EventKind::EntryShift);
/// assert_eq!(event.marks.recoverable_late_minutes(), 10);
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
pub fn process_scan(
    scan: &Scan,
    employee: &Employee,
    existing: &[AttendanceEvent],
    config: &Configuration,
) -> EngineResult<AttendanceEvent> {
    if scan.employee_id != employee.id {
        warn!(
            scan_employee_id = %scan.employee_id,
            employee_id = %employee.id,
            "Scan checked against another employee"
        );
        return Err(EngineError::EmployeeNotFound {
            employee_id: scan.employee_id.clone(),
        });
    }

    let date = scan.date();

    let day = resolve_day(employee, date).ok_or_else(|| {
        warn!(employee_id = %employee.id, %date, "Scan on a day without schedule");
        EngineError::ScheduleNotFound {
            employee_id: employee.id.clone(),
            date,
        }
    })?;

    let day_events: Vec<&AttendanceEvent> = existing
        .iter()
        .filter(|e| e.employee_id == employee.id && e.date == date)
        .collect();
    let state = DayState::from_events(day_events.iter().copied());
    let expected = next_expected_kind(state, day.is_split());

    let kind = match (scan.kind, expected) {
        (Some(kind), _) => kind,
        (None, Some(kind)) => {
            debug!(employee_id = %employee.id, %date, kind = %kind, "Inferred scan kind");
            kind
        }
        (None, None) => {
            // The day is complete; report the last kind as the rejected attempt.
            let attempted = day_events
                .iter()
                .map(|e| e.kind)
                .max()
                .unwrap_or(EventKind::ExitShift);
            warn!(employee_id = %employee.id, %date, "Scan after day completed");
            return Err(EngineError::SequenceViolation {
                attempted,
                expected: None,
            });
        }
    };

    if day_events.iter().any(|e| e.kind == kind) {
        warn!(employee_id = %employee.id, %date, kind = %kind, "Duplicate scan rejected");
        return Err(EngineError::DuplicateEvent {
            employee_id: employee.id.clone(),
            date,
            kind,
        });
    }

    if expected != Some(kind) {
        warn!(
            employee_id = %employee.id,
            %date,
            kind = %kind,
            expected = ?expected,
            "Out-of-sequence scan rejected"
        );
        return Err(EngineError::SequenceViolation {
            attempted: kind,
            expected,
        });
    }

    let compensation_enabled =
        day.compensation_enabled() && config.compensation_enabled_for(&employee.id);
    let marks = classify(
        kind,
        scan.timestamp,
        date,
        day,
        &day_events,
        config.tolerance_for(&employee.id),
        compensation_enabled,
    )?;

    info!(
        employee_id = %employee.id,
        %date,
        kind = %kind,
        recoverable = marks.recoverable_late_minutes(),
        non_recoverable = marks.non_recoverable_late_minutes(),
        shortfall = marks.compensation_shortfall_minutes(),
        "Scan accepted"
    );

    Ok(AttendanceEvent {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        date,
        kind,
        timestamp: scan.timestamp,
        marks,
        applied: false,
        synced: false,
    })
}

fn classify(
    kind: EventKind,
    actual: NaiveDateTime,
    date: NaiveDate,
    day: &DaySchedule,
    day_events: &[&AttendanceEvent],
    tolerance_minutes: u32,
    compensation_enabled: bool,
) -> EngineResult<EventMarks> {
    // Break kinds are only ever expected on split days.
    let expected = expected_datetime_for(day, date, kind).ok_or(EngineError::SequenceViolation {
        attempted: kind,
        expected: None,
    })?;
    let expected_time = expected.time();

    Ok(match kind {
        EventKind::EntryShift => EventMarks::Entry(EntryMarks {
            expected_time,
            lateness: classify_entry_lateness(actual, expected, tolerance_minutes),
        }),
        EventKind::ExitBreak => EventMarks::BreakOut(BreakOutMarks { expected_time }),
        EventKind::EntryPostBreak => EventMarks::BreakReturn(BreakReturnMarks {
            expected_time,
            late_minutes: classify_break_return_lateness(actual, expected)
                .non_recoverable_minutes(),
        }),
        EventKind::ExitShift => {
            let owed = if compensation_enabled {
                day_events
                    .iter()
                    .find(|e| e.kind == EventKind::EntryShift)
                    .map(|e| e.marks.recoverable_late_minutes())
                    .unwrap_or(0)
            } else {
                0
            };
            EventMarks::Exit(compensate_exit(actual, expected, owed))
        }
    })
}

/// Any part of a minute short of the required exit counts as a whole minute.
fn compensate_exit(actual: NaiveDateTime, scheduled_exit: NaiveDateTime, owed: i64) -> ExitMarks {
    if owed <= 0 {
        return ExitMarks {
            expected_time: scheduled_exit.time(),
            required_exit: None,
            compensation_shortfall_minutes: 0,
        };
    }

    let required = scheduled_exit + Duration::minutes(owed);
    let short_seconds = (required - actual).num_seconds().max(0);
    let shortfall = (short_seconds + 59) / 60;
    ExitMarks {
        expected_time: scheduled_exit.time(),
        required_exit: Some(required.time()),
        compensation_shortfall_minutes: shortfall,
    }
}
