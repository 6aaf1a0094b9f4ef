//! Attendance event model and the per-kind computed marks.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a scan within a working day.
///
/// Continuous days only use [`EventKind::EntryShift`] and
/// [`EventKind::ExitShift`]. Variants are declared in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Start of the working day.
    EntryShift,
    /// End of the morning sub-shift on a split day.
    ExitBreak,
    /// Start of the afternoon sub-shift on a split day.
    EntryPostBreak,
    /// End of the working day.
    ExitShift,
}

impl EventKind {
    /// The wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EntryShift => "ENTRY_SHIFT",
            EventKind::ExitBreak => "EXIT_BREAK",
            EventKind::EntryPostBreak => "ENTRY_POST_BREAK",
            EventKind::ExitShift => "EXIT_SHIFT",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing an arrival against its expected time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lateness {
    /// Early or punctual.
    OnTime,
    /// Late within tolerance; the minutes are owed at shift end.
    Recoverable {
        /// Minutes late.
        minutes: i64,
    },
    /// Late beyond tolerance; counts toward the monthly limit.
    Late {
        /// Minutes late.
        minutes: i64,
    },
}

impl Lateness {
    /// Minutes that must be made up at shift end.
    pub fn recoverable_minutes(&self) -> i64 {
        match self {
            Lateness::Recoverable { minutes } => *minutes,
            _ => 0,
        }
    }

    /// Minutes of lateness that count toward the monthly limit.
    pub fn non_recoverable_minutes(&self) -> i64 {
        match self {
            Lateness::Late { minutes } => *minutes,
            _ => 0,
        }
    }
}

/// Marks computed for an `ENTRY_SHIFT` scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMarks {
    /// Scheduled entry time.
    pub expected_time: NaiveTime,
    /// Lateness classification with the configured tolerance.
    pub lateness: Lateness,
}

/// Marks computed for an `EXIT_BREAK` scan. Leaving for the break carries no penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakOutMarks {
    /// Scheduled break-out time.
    pub expected_time: NaiveTime,
}

/// Marks computed for an `ENTRY_POST_BREAK` scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakReturnMarks {
    /// Scheduled break-in time.
    pub expected_time: NaiveTime,
    /// Minutes late returning from the break, always non-recoverable.
    pub late_minutes: i64,
}

/// Marks computed for an `EXIT_SHIFT` scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitMarks {
    /// Scheduled exit time.
    pub expected_time: NaiveTime,
    /// Exit time required to offset recoverable lateness, if any is owed.
    pub required_exit: Option<NaiveTime>,
    /// Minutes by which the actual exit fell short of `required_exit`.
    pub compensation_shortfall_minutes: i64,
}

/// Computed fields of an accepted event, one variant per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventMarks {
    /// Marks for `ENTRY_SHIFT`.
    Entry(EntryMarks),
    /// Marks for `EXIT_BREAK`.
    BreakOut(BreakOutMarks),
    /// Marks for `ENTRY_POST_BREAK`.
    BreakReturn(BreakReturnMarks),
    /// Marks for `EXIT_SHIFT`.
    Exit(ExitMarks),
}

impl EventMarks {
    /// The schedule time the event was measured against.
    pub fn expected_time(&self) -> NaiveTime {
        match self {
            EventMarks::Entry(m) => m.expected_time,
            EventMarks::BreakOut(m) => m.expected_time,
            EventMarks::BreakReturn(m) => m.expected_time,
            EventMarks::Exit(m) => m.expected_time,
        }
    }

    /// Minutes owed at shift end because of a late entry within tolerance.
    pub fn recoverable_late_minutes(&self) -> i64 {
        match self {
            EventMarks::Entry(m) => m.lateness.recoverable_minutes(),
            _ => 0,
        }
    }

    /// Minutes of lateness counted toward the monthly limit.
    pub fn non_recoverable_late_minutes(&self) -> i64 {
        match self {
            EventMarks::Entry(m) => m.lateness.non_recoverable_minutes(),
            EventMarks::BreakReturn(m) => m.late_minutes,
            _ => 0,
        }
    }

    /// Minutes short of the compensated exit time.
    pub fn compensation_shortfall_minutes(&self) -> i64 {
        match self {
            EventMarks::Exit(m) => m.compensation_shortfall_minutes,
            _ => 0,
        }
    }
}

/// An accepted, classified scan.
///
/// Created exactly once per accepted scan and never modified by the engine.
/// The `applied` and `synced` flags belong to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Unique identifier for the event.
    pub id: Uuid,
    /// The employee that scanned.
    pub employee_id: String,
    /// The working date the event belongs to.
    pub date: NaiveDate,
    /// What the scan represents.
    pub kind: EventKind,
    /// When the scan happened.
    pub timestamp: NaiveDateTime,
    /// Lateness and compensation computed at acceptance.
    pub marks: EventMarks,
    /// Set by the persistence layer once the event has been applied.
    #[serde(default)]
    pub applied: bool,
    /// Set by the persistence layer once the event has been synchronized.
    #[serde(default)]
    pub synced: bool,
}

impl AttendanceEvent {
    /// Whether the event counts toward the monthly lateness limit.
    pub fn is_late(&self) -> bool {
        self.marks.non_recoverable_late_minutes() > 0
    }
}
