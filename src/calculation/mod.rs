//! Calculation logic for the attendance engine.
//!
//! This module contains schedule resolution, the tolerance policy, the
//! event sequencer that accepts or rejects scans, worked-hours calculation
//! per day and per date range, and lateness aggregation against the monthly
//! limit.

mod lateness;
mod schedule_resolution;
mod sequencer;
mod tolerance;
mod worked_hours;

pub use lateness::{
    AlertLevel, LatenessAlert, LatenessSummary, ReportMonth, lateness_alert, rank_by_lateness,
    summarize, summarize_all,
};
pub use schedule_resolution::{
    expected_datetime_for, expected_time_for, required_kinds, resolve_day,
};
pub use sequencer::{Scan, next_expected_kind, process_scan};
pub use tolerance::{classify_break_return_lateness, classify_entry_lateness};
pub use worked_hours::{
    DailyWorked, MAX_REPORT_DAYS, WorkedDay, WorkedRangeSummary, aggregate_worked,
    compute_daily_worked, minutes_to_hours,
};
