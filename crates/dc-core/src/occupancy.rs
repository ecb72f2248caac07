//! The occupancy index: which days are used, and by which event.

use std::collections::{BTreeMap, BTreeSet};

use crate::day::Day;
use crate::event::Event;

/// Materialized used-day set and day-to-event ownership for one category's
/// events.
///
/// Rebuilt wholesale whenever the event collection changes; single-day
/// toggles go through event mutation followed by a rebuild. When two events
/// overlap on a day, the later event in input order owns it; overlap is a
/// data-quality concern the UI should prevent, not a crash condition here.
#[derive(Debug, Default)]
pub struct OccupancyIndex {
    events: Vec<Event>,
    used_days: BTreeSet<Day>,
    owner_by_day: BTreeMap<Day, usize>,
}

impl OccupancyIndex {
    /// An empty index; equivalent to rebuilding from no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears and repopulates the index from an event snapshot.
    ///
    /// Deterministic given a fixed event list and iteration order.
    pub fn rebuild(&mut self, events: Vec<Event>) {
        self.used_days.clear();
        self.owner_by_day.clear();
        for (index, event) in events.iter().enumerate() {
            for d in Day::range_inclusive(event.start_day, event.stop_day) {
                self.used_days.insert(d);
                self.owner_by_day.insert(d, index);
            }
        }
        self.events = events;
    }

    /// Whether `day` is used by any event.
    #[must_use]
    pub fn contains(&self, day: Day) -> bool {
        self.used_days.contains(&day)
    }

    /// The event owning `day`, if any.
    #[must_use]
    pub fn owner_of(&self, day: Day) -> Option<&Event> {
        self.owner_by_day.get(&day).map(|&index| &self.events[index])
    }

    /// Ascending sequence of all used days.
    pub fn used_days_sorted(&self) -> impl Iterator<Item = Day> + '_ {
        self.used_days.iter().copied()
    }

    /// The used days falling inside `[start, stop]`, ascending.
    pub fn used_days_in(&self, start: Day, stop: Day) -> impl Iterator<Item = Day> + '_ {
        self.used_days.range(start..=stop).copied()
    }

    /// Total number of used days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.used_days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used_days.is_empty()
    }

    /// The event snapshot the index was built from.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
