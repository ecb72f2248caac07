//! The in-memory session snapshot for one category.
//!
//! All mutations flow through explicit state-transition methods on
//! [`Session`]: replace the event list, replace the limit list, or move the
//! as-of day. Each transition recomputes the occupancy index and the limit
//! counts synchronously before returning, so readers always observe a
//! consistent snapshot. There is no ambient state; persistence is the
//! caller's concern and happens outside this type.

use crate::category::Category;
use crate::counter::LimitCounter;
use crate::day::Day;
use crate::event::Event;
use crate::limit::Limit;
use crate::occupancy::OccupancyIndex;

/// One category's events, limits, and derived indexes, pinned to an as-of
/// day. Replaced wholesale on category switch.
#[derive(Debug)]
pub struct Session {
    category: Category,
    limits: Vec<Limit>,
    as_of: Day,
    occupancy: OccupancyIndex,
    counter: LimitCounter,
}

impl Session {
    /// Builds a fully-computed snapshot from freshly loaded collections.
    #[must_use]
    pub fn new(category: Category, events: Vec<Event>, limits: Vec<Limit>, as_of: Day) -> Self {
        let mut session = Self {
            category,
            limits,
            as_of,
            occupancy: OccupancyIndex::new(),
            counter: LimitCounter::new(),
        };
        session.occupancy.rebuild(events);
        session.recount();
        session
    }

    /// Replaces the event list (after any event add/edit/delete) and rebuilds
    /// occupancy and counts.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.occupancy.rebuild(events);
        self.recount();
    }

    /// Replaces the limit list (after any limit add/edit/delete) and
    /// recomputes counts.
    pub fn replace_limits(&mut self, limits: Vec<Limit>) {
        self.limits = limits;
        self.recount();
    }

    /// Moves the reference day and recomputes counts against the new windows.
    pub fn set_as_of(&mut self, as_of: Day) {
        if self.as_of != as_of {
            self.as_of = as_of;
            self.recount();
        }
    }

    fn recount(&mut self) {
        self.counter.recompute(&self.limits, &self.occupancy, self.as_of);
    }

    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn limits(&self) -> &[Limit] {
        &self.limits
    }

    #[must_use]
    pub const fn as_of(&self) -> Day {
        self.as_of
    }

    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    #[must_use]
    pub const fn counter(&self) -> &LimitCounter {
        &self.counter
    }
}
