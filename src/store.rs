//! Event storage.
//!
//! [`EventStore`] is the seam between the engine and wherever accepted events
//! live. [`InMemoryEventStore`] keeps them in a map keyed by employee and
//! date and serializes writers per store, so a scan is always decided against
//! the events that are actually stored.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::AttendanceEvent;

/// Storage for accepted attendance events.
pub trait EventStore {
    /// Events recorded for one employee on one date, in insertion order.
    fn events_for_day(&self, employee_id: &str, date: NaiveDate) -> Vec<AttendanceEvent>;

    /// Every event recorded for one employee, ordered by date then timestamp.
    fn events_for_employee(&self, employee_id: &str) -> Vec<AttendanceEvent>;

    /// Every event in the store, ordered by employee, date and timestamp.
    fn all_events(&self) -> Vec<AttendanceEvent>;

    /// Runs `decide` against the day's events and appends the event it
    /// returns. Reading, deciding and appending happen atomically with
    /// respect to other calls on the same store. When `decide` fails nothing
    /// is stored.
    fn record<F>(&self, employee_id: &str, date: NaiveDate, decide: F) -> EngineResult<AttendanceEvent>
    where
        F: FnOnce(&[AttendanceEvent]) -> EngineResult<AttendanceEvent>;
}

type DayKey = (String, NaiveDate);

/// An [`EventStore`] held in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    days: RwLock<HashMap<DayKey, Vec<AttendanceEvent>>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.days
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect<P>(&self, keep: P) -> Vec<AttendanceEvent>
    where
        P: Fn(&DayKey) -> bool,
    {
        let days = self.days.read().unwrap_or_else(PoisonError::into_inner);
        let mut events: Vec<AttendanceEvent> = days
            .iter()
            .filter(|(key, _)| keep(key))
            .flat_map(|(_, events)| events.iter().cloned())
            .collect();
        events.sort_by(|a, b| {
            (&a.employee_id, a.date, a.timestamp).cmp(&(&b.employee_id, b.date, b.timestamp))
        });
        events
    }
}

impl EventStore for InMemoryEventStore {
    fn events_for_day(&self, employee_id: &str, date: NaiveDate) -> Vec<AttendanceEvent> {
        self.days
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(employee_id.to_string(), date))
            .cloned()
            .unwrap_or_default()
    }

    fn events_for_employee(&self, employee_id: &str) -> Vec<AttendanceEvent> {
        self.collect(|(id, _)| id == employee_id)
    }

    fn all_events(&self) -> Vec<AttendanceEvent> {
        self.collect(|_| true)
    }

    fn record<F>(&self, employee_id: &str, date: NaiveDate, decide: F) -> EngineResult<AttendanceEvent>
    where
        F: FnOnce(&[AttendanceEvent]) -> EngineResult<AttendanceEvent>,
    {
        let mut days = self.days.write().unwrap_or_else(PoisonError::into_inner);
        let day = days.entry((employee_id.to_string(), date)).or_default();

        let event = decide(day)?;
        day.push(event.clone());
        debug!(
            employee_id,
            %date,
            kind = %event.kind,
            stored = day.len(),
            "Event stored"
        );
        Ok(event)
    }
}
