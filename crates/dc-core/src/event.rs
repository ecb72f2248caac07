//! Date-range events: the unit of day usage.

use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::interval::Interval;
use crate::types::{CategoryId, EventId, ValidationError};

/// An inclusive date range `[start_day, stop_day]` owned by a category.
///
/// Events are immutable value snapshots: created, edited, and deleted through
/// the persistence store and refreshed wholesale on reload. The engine never
/// mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub category_id: CategoryId,
    pub start_day: Day,
    pub stop_day: Day,
    #[serde(default)]
    pub note: String,
}

impl Event {
    /// Builds an event, rejecting inverted ranges at the boundary.
    pub fn new(
        id: EventId,
        category_id: CategoryId,
        start_day: Day,
        stop_day: Day,
        note: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if start_day > stop_day {
            return Err(ValidationError::InvertedRange {
                start: start_day,
                stop: stop_day,
            });
        }
        Ok(Self {
            id,
            category_id,
            start_day,
            stop_day,
            note: note.into(),
        })
    }

    /// The inclusive day interval this event covers.
    #[must_use]
    pub const fn interval(&self) -> Interval<Day> {
        Interval::new(self.start_day, self.stop_day)
    }

    /// Number of days this event marks as used.
    #[must_use]
    pub const fn day_count(&self) -> i64 {
        self.stop_day.day_number() - self.start_day.day_number() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    fn event(start: Day, stop: Day) -> Result<Event, ValidationError> {
        Event::new(
            EventId::new("event-1").unwrap(),
            CategoryId::new("cat-1").unwrap(),
            start,
            stop,
            "",
        )
    }

    #[test]
    fn rejects_inverted_range() {
        let result = event(day(2024, 1, 10), day(2024, 1, 1));
        assert_eq!(
            result.unwrap_err(),
            ValidationError::InvertedRange {
                start: day(2024, 1, 10),
                stop: day(2024, 1, 1),
            }
        );
    }

    #[test]
    fn single_day_event_counts_one() {
        let e = event(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(e.day_count(), 1);
        assert!(e.interval().contains(day(2024, 1, 1)));
    }

    #[test]
    fn day_count_is_inclusive() {
        let e = event(day(2024, 1, 1), day(2024, 1, 10)).unwrap();
        assert_eq!(e.day_count(), 10);
    }

    #[test]
    fn serde_roundtrip_keeps_day_bounds() {
        let e = event(day(2024, 1, 1), day(2024, 1, 10)).unwrap();
        let json = serde_json::to_string(&e).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, e);
    }
}
