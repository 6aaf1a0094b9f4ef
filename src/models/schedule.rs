//! Schedule model: the expected working pattern of an employee.
//!
//! A [`DaySchedule`] describes one weekday. It is always validated on
//! construction, so a split day without break times or a meal break outside
//! the working interval cannot exist. Raw input arrives in the loosely typed
//! [`DayScheduleConfig`] shape and is converted with `TryFrom`.

use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::time::{clock_minutes, format_time, parse_time};

/// The mid-day break that divides a split day into two sub-shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitBreak {
    /// End of the morning sub-shift.
    pub break_out: NaiveTime,
    /// Start of the afternoon sub-shift.
    pub break_in: NaiveTime,
}

/// An unscanned meal break deducted from theoretical time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealBreak {
    /// Start of the meal break.
    pub start: NaiveTime,
    /// End of the meal break.
    pub end: NaiveTime,
}

impl MealBreak {
    /// Duration of the meal break in minutes.
    pub fn duration_minutes(&self) -> i64 {
        clock_minutes(self.start, self.end)
    }

    /// Minutes of the meal break falling inside `[from, to)`.
    pub fn overlap_minutes(&self, from: NaiveTime, to: NaiveTime) -> i64 {
        let start = self.start.max(from);
        let end = self.end.min(to);
        clock_minutes(start, end).max(0)
    }
}

/// One weekday's expected working pattern.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{DaySchedule, parse_time};
///
/// let day = DaySchedule::new(parse_time("08:00")?, parse_time("17:00")?)?
///     .with_split(parse_time("12:00")?, parse_time("13:00")?)?;
/// assert!(day.is_split());
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DayScheduleConfig", into = "DayScheduleConfig")]
pub struct DaySchedule {
    active: bool,
    entry_time: NaiveTime,
    exit_time: NaiveTime,
    split: Option<SplitBreak>,
    meal: Option<MealBreak>,
    compensation_enabled: bool,
}

impl DaySchedule {
    /// Creates an active, continuous day with compensation enabled.
    pub fn new(entry_time: NaiveTime, exit_time: NaiveTime) -> EngineResult<Self> {
        if entry_time >= exit_time {
            return Err(EngineError::InvalidSchedule {
                message: format!(
                    "entry_time {} must be before exit_time {}",
                    format_time(entry_time),
                    format_time(exit_time)
                ),
            });
        }

        Ok(Self {
            active: true,
            entry_time,
            exit_time,
            split: None,
            meal: None,
            compensation_enabled: true,
        })
    }

    /// Splits the day into two sub-shifts around a mid-day break.
    ///
    /// Requires `entry_time < break_out < break_in < exit_time`.
    pub fn with_split(mut self, break_out: NaiveTime, break_in: NaiveTime) -> EngineResult<Self> {
        if !(self.entry_time < break_out && break_out < break_in && break_in < self.exit_time) {
            return Err(EngineError::InvalidSchedule {
                message: format!(
                    "split break {}-{} must fall strictly between entry {} and exit {}, \
                     with break_out before break_in",
                    format_time(break_out),
                    format_time(break_in),
                    format_time(self.entry_time),
                    format_time(self.exit_time)
                ),
            });
        }
        self.split = Some(SplitBreak {
            break_out,
            break_in,
        });
        Ok(self)
    }

    /// Adds a meal break, which must fall strictly inside the working interval.
    pub fn with_meal(mut self, start: NaiveTime, end: NaiveTime) -> EngineResult<Self> {
        if !(self.entry_time < start && start < end && end < self.exit_time) {
            return Err(EngineError::InvalidSchedule {
                message: format!(
                    "meal break {}-{} must fall strictly inside {}-{}",
                    format_time(start),
                    format_time(end),
                    format_time(self.entry_time),
                    format_time(self.exit_time)
                ),
            });
        }
        self.meal = Some(MealBreak { start, end });
        Ok(self)
    }

    /// Sets whether recoverable lateness must be made up at shift end.
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensation_enabled = enabled;
        self
    }

    /// Sets whether the day is worked at all.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the day is worked.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Scheduled start of the day.
    pub fn entry_time(&self) -> NaiveTime {
        self.entry_time
    }

    /// Scheduled end of the day.
    pub fn exit_time(&self) -> NaiveTime {
        self.exit_time
    }

    /// The split break, if the day is split.
    pub fn split(&self) -> Option<SplitBreak> {
        self.split
    }

    /// Whether the day is divided into two sub-shifts.
    pub fn is_split(&self) -> bool {
        self.split.is_some()
    }

    /// The meal break, if configured.
    pub fn meal(&self) -> Option<MealBreak> {
        self.meal
    }

    /// Whether recoverable lateness must be made up at shift end.
    pub fn compensation_enabled(&self) -> bool {
        self.compensation_enabled
    }

    /// Minutes the day expects, net of the split break and meal break.
    ///
    /// On split days the meal break is only deducted where it overlaps a
    /// sub-shift.
    pub fn theoretical_minutes(&self) -> i64 {
        let intervals = match self.split {
            Some(split) => vec![
                (self.entry_time, split.break_out),
                (split.break_in, self.exit_time),
            ],
            None => vec![(self.entry_time, self.exit_time)],
        };

        intervals
            .into_iter()
            .map(|(from, to)| {
                let meal = self.meal.map(|m| m.overlap_minutes(from, to)).unwrap_or(0);
                clock_minutes(from, to) - meal
            })
            .sum()
    }
}

fn default_true() -> bool {
    true
}

/// The raw, loosely typed shape a day schedule arrives in.
///
/// Times are `HH:mm` strings and the split/meal flags are independent of the
/// presence of their times; [`DaySchedule::try_from`] reconciles the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScheduleConfig {
    /// Whether the day is worked.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Scheduled start, `HH:mm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    /// Scheduled end, `HH:mm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    /// Whether the day is split into two sub-shifts.
    #[serde(default)]
    pub is_split: bool,
    /// End of the morning sub-shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_out_time: Option<String>,
    /// Start of the afternoon sub-shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_in_time: Option<String>,
    /// Whether a meal break is configured.
    #[serde(default)]
    pub has_meal_break: bool,
    /// Start of the meal break.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_start: Option<String>,
    /// End of the meal break.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_end: Option<String>,
    /// Whether recoverable lateness must be made up at shift end.
    #[serde(default = "default_true")]
    pub compensation_enabled: bool,
}

fn required_time(value: &Option<String>, field: &str) -> EngineResult<NaiveTime> {
    match value.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_time(raw),
        _ => Err(EngineError::InvalidSchedule {
            message: format!("{field} is required"),
        }),
    }
}

impl TryFrom<DayScheduleConfig> for DaySchedule {
    type Error = EngineError;

    fn try_from(config: DayScheduleConfig) -> EngineResult<Self> {
        let entry = required_time(&config.entry_time, "entry_time")?;
        let exit = required_time(&config.exit_time, "exit_time")?;
        let mut day = DaySchedule::new(entry, exit)?
            .with_active(config.active)
            .with_compensation(config.compensation_enabled);

        if config.is_split {
            let break_out = required_time(&config.break_out_time, "break_out_time")?;
            let break_in = required_time(&config.break_in_time, "break_in_time")?;
            day = day.with_split(break_out, break_in)?;
        }

        if config.has_meal_break {
            let start = required_time(&config.meal_start, "meal_start")?;
            let end = required_time(&config.meal_end, "meal_end")?;
            day = day.with_meal(start, end)?;
        }

        Ok(day)
    }
}

impl From<DaySchedule> for DayScheduleConfig {
    fn from(day: DaySchedule) -> Self {
        DayScheduleConfig {
            active: day.active,
            entry_time: Some(format_time(day.entry_time)),
            exit_time: Some(format_time(day.exit_time)),
            is_split: day.split.is_some(),
            break_out_time: day.split.map(|s| format_time(s.break_out)),
            break_in_time: day.split.map(|s| format_time(s.break_in)),
            has_meal_break: day.meal.is_some(),
            meal_start: day.meal.map(|m| format_time(m.start)),
            meal_end: day.meal.map(|m| format_time(m.end)),
            compensation_enabled: day.compensation_enabled,
        }
    }
}

/// A per-weekday schedule.
///
/// Inactive entries in the raw configuration are dropped without validating
/// their times, so a day listed as `active: false` with blank times is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<Weekday, DayScheduleConfig>",
    into = "HashMap<Weekday, DayScheduleConfig>"
)]
pub struct WeeklySchedule {
    days: HashMap<Weekday, DaySchedule>,
}

impl WeeklySchedule {
    /// Creates an empty weekly schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schedule for one weekday.
    pub fn with_day(mut self, weekday: Weekday, day: DaySchedule) -> Self {
        self.days.insert(weekday, day);
        self
    }

    /// Returns the schedule for a weekday, if one is configured.
    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days.get(&weekday)
    }
}

impl TryFrom<HashMap<Weekday, DayScheduleConfig>> for WeeklySchedule {
    type Error = EngineError;

    fn try_from(raw: HashMap<Weekday, DayScheduleConfig>) -> EngineResult<Self> {
        let mut days = HashMap::new();
        for (weekday, config) in raw {
            if !config.active {
                continue;
            }
            let day = DaySchedule::try_from(config).map_err(|err| match err {
                EngineError::InvalidSchedule { message } => EngineError::InvalidSchedule {
                    message: format!("{weekday}: {message}"),
                },
                other => other,
            })?;
            days.insert(weekday, day);
        }
        Ok(Self { days })
    }
}

impl From<WeeklySchedule> for HashMap<Weekday, DayScheduleConfig> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule
            .days
            .into_iter()
            .map(|(weekday, day)| (weekday, day.into()))
            .collect()
    }
}

/// An employee's working pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// The same day pattern on every listed weekday.
    Fixed {
        /// Weekdays worked.
        weekdays: Vec<Weekday>,
        /// The shared pattern.
        day: DaySchedule,
    },
    /// An independent pattern per weekday.
    Weekly {
        /// The per-weekday patterns.
        days: WeeklySchedule,
    },
}

impl Schedule {
    /// Returns the configured pattern for a weekday, active or not.
    pub fn day_for(&self, weekday: Weekday) -> Option<&DaySchedule> {
        match self {
            Schedule::Fixed { weekdays, day } => weekdays.contains(&weekday).then_some(day),
            Schedule::Weekly { days } => days.day(weekday),
        }
    }
}
