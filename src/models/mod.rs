//! Core data models for the attendance engine.
//!
//! This module contains the schedule, employee and event types shared by
//! every calculation.

mod day_record;
mod employee;
mod event;
mod schedule;
mod time;

pub use day_record::{DayRecord, DayState};
pub use employee::Employee;
pub use event::{
    AttendanceEvent, BreakOutMarks, BreakReturnMarks, EntryMarks, EventKind, EventMarks,
    ExitMarks, Lateness,
};
pub use schedule::{DaySchedule, DayScheduleConfig, MealBreak, Schedule, SplitBreak, WeeklySchedule};
pub use time::{
    TIME_FORMAT, clock_minutes, format_time, minutes_between, parse_time, parse_timestamp,
};
