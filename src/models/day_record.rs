//! Derived per-day view of an employee's accepted events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::{AttendanceEvent, EventKind};

/// Where an employee's day stands, derived from the kinds already recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    /// Nothing recorded yet.
    None,
    /// `ENTRY_SHIFT` recorded.
    Entered,
    /// `EXIT_BREAK` recorded.
    OnBreak,
    /// `ENTRY_POST_BREAK` recorded.
    Returned,
    /// `EXIT_SHIFT` recorded; the day is complete.
    Exited,
}

impl DayState {
    /// The state reached after recording `kind`.
    pub fn after(kind: EventKind) -> Self {
        match kind {
            EventKind::EntryShift => DayState::Entered,
            EventKind::ExitBreak => DayState::OnBreak,
            EventKind::EntryPostBreak => DayState::Returned,
            EventKind::ExitShift => DayState::Exited,
        }
    }

    /// Derives the state from a day's events: the furthest kind present wins.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a AttendanceEvent>) -> Self {
        events
            .into_iter()
            .map(|e| e.kind)
            .max()
            .map(DayState::after)
            .unwrap_or(DayState::None)
    }
}

/// The ordered set of one employee's accepted events for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The working date.
    pub date: NaiveDate,
    /// Events for the date in day-sequence order.
    pub events: Vec<AttendanceEvent>,
}

impl DayRecord {
    /// Builds the record from any events, keeping only those for
    /// `employee_id` on `date`.
    pub fn from_events<'a>(
        employee_id: &str,
        date: NaiveDate,
        events: impl IntoIterator<Item = &'a AttendanceEvent>,
    ) -> Self {
        let mut events: Vec<AttendanceEvent> = events
            .into_iter()
            .filter(|e| e.employee_id == employee_id && e.date == date)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.kind, e.timestamp));

        Self {
            employee_id: employee_id.to_string(),
            date,
            events,
        }
    }

    /// Returns the event of the given kind, if recorded.
    pub fn event(&self, kind: EventKind) -> Option<&AttendanceEvent> {
        self.events.iter().find(|e| e.kind == kind)
    }

    /// Whether the given kind has been recorded.
    pub fn has(&self, kind: EventKind) -> bool {
        self.event(kind).is_some()
    }

    /// The derived state of the day.
    pub fn state(&self) -> DayState {
        DayState::from_events(&self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreakOutMarks, EventMarks};
    use chrono::NaiveTime;
    use uuid::Uuid;

    fn event(employee_id: &str, date: &str, kind: EventKind, time: &str) -> AttendanceEvent {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let time = NaiveTime::parse_from_str(time, "%H:%M").unwrap();
        AttendanceEvent {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            date,
            kind,
            timestamp: date.and_time(time),
            marks: EventMarks::BreakOut(BreakOutMarks {
                expected_time: time,
            }),
            applied: false,
            synced: false,
        }
    }

    #[test]
    fn test_empty_day_state_is_none() {
        assert_eq!(DayState::from_events(&Vec::<AttendanceEvent>::new()), DayState::None);
    }

    #[test]
    fn test_state_follows_furthest_kind() {
        let events = vec![
            event("e1", "2026-01-15", EventKind::EntryShift, "08:00"),
            event("e1", "2026-01-15", EventKind::ExitBreak, "12:00"),
        ];
        assert_eq!(DayState::from_events(&events), DayState::OnBreak);
    }

    #[test]
    fn test_record_filters_and_orders_events() {
        let events = vec![
            event("e1", "2026-01-15", EventKind::ExitShift, "17:00"),
            event("e2", "2026-01-15", EventKind::EntryShift, "08:00"),
            event("e1", "2026-01-16", EventKind::EntryShift, "08:00"),
            event("e1", "2026-01-15", EventKind::EntryShift, "08:05"),
        ];
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let record = DayRecord::from_events("e1", date, &events);

        assert_eq!(record.events.len(), 2);
        assert_eq!(record.events[0].kind, EventKind::EntryShift);
        assert_eq!(record.events[1].kind, EventKind::ExitShift);
        assert!(record.has(EventKind::ExitShift));
        assert!(!record.has(EventKind::ExitBreak));
        assert_eq!(record.state(), DayState::Exited);
    }
}
