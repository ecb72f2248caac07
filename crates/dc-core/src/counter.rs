//! Per-limit used-day counts.

use std::collections::HashMap;

use crate::day::Day;
use crate::interval::Interval;
use crate::limit::Limit;
use crate::occupancy::OccupancyIndex;
use crate::types::LimitId;

/// The count state of one limit after a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitCount {
    /// Used days inside the limit's current window.
    Days(usize),
    /// The limit's window could not be resolved (configuration error).
    Unavailable,
}

#[derive(Debug, Clone)]
struct Entry {
    count: LimitCount,
    max_days: u32,
    window: Option<Interval<Day>>,
}

/// Live per-limit counts of used days inside each limit's current window.
///
/// Reset and fully recomputed whenever the occupancy index is rebuilt or the
/// as-of day changes. Total cost is O(limits x used days), which is fine at
/// the dataset sizes involved (both at most low hundreds). Resolved windows
/// are kept per recompute since the as-of pointer changes at most once per
/// day or on a manual rebase.
#[derive(Debug, Default)]
pub struct LimitCounter {
    entries: HashMap<LimitId, Entry>,
    as_of: Option<Day>,
}

impl LimitCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every limit's count from scratch.
    ///
    /// A limit whose window cannot be resolved is marked
    /// [`LimitCount::Unavailable`] and logged; it never aborts the other
    /// limits. Idempotent for unchanged inputs.
    pub fn recompute(&mut self, limits: &[Limit], occupancy: &OccupancyIndex, as_of: Day) {
        self.entries.clear();
        self.as_of = Some(as_of);
        for limit in limits {
            let entry = match limit.window(as_of) {
                Ok(window) => Entry {
                    count: LimitCount::Days(
                        occupancy.used_days_in(window.start, window.stop).count(),
                    ),
                    max_days: limit.max_days,
                    window: Some(window),
                },
                Err(error) => {
                    tracing::warn!(limit = %limit.id, %error, "limit window unavailable");
                    Entry {
                        count: LimitCount::Unavailable,
                        max_days: limit.max_days,
                        window: None,
                    }
                }
            };
            self.entries.insert(limit.id.clone(), entry);
        }
    }

    /// The count for a limit, or `None` for an unknown id.
    #[must_use]
    pub fn count_for(&self, id: &LimitId) -> Option<LimitCount> {
        self.entries.get(id).map(|entry| entry.count)
    }

    /// Whether a limit's count exceeds its cap. `None` for an unknown id or
    /// an unavailable count.
    #[must_use]
    pub fn is_over_limit(&self, id: &LimitId) -> Option<bool> {
        match self.entries.get(id)? {
            Entry {
                count: LimitCount::Days(days),
                max_days,
                ..
            } => Some(*days > *max_days as usize),
            _ => None,
        }
    }

    /// The window resolved for a limit during the last recompute.
    #[must_use]
    pub fn window_for(&self, id: &LimitId) -> Option<Interval<Day>> {
        self.entries.get(id).and_then(|entry| entry.window)
    }

    /// The as-of day of the last recompute.
    #[must_use]
    pub const fn as_of(&self) -> Option<Day> {
        self.as_of
    }

    /// Number of tracked limits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::limit::{FixedInterval, RunningUnit};
    use crate::types::{CategoryId, EventId};

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    fn category_id() -> CategoryId {
        CategoryId::new("cat-1").unwrap()
    }

    fn event(id: &str, start: Day, stop: Day) -> Event {
        Event::new(EventId::new(id).unwrap(), category_id(), start, stop, "").unwrap()
    }

    fn occupancy(events: Vec<Event>) -> OccupancyIndex {
        let mut index = OccupancyIndex::new();
        index.rebuild(events);
        index
    }

    #[test]
    fn yearly_limit_counts_event_days() {
        // One event of 10 days; yearly cap 61; mid-year as-of
        let index = occupancy(vec![event("a", day(2024, 1, 1), day(2024, 1, 10))]);
        let limit = Limit::fixed(
            LimitId::new("yearly").unwrap(),
            category_id(),
            "yearly",
            61,
            FixedInterval::Yearly,
        );

        let mut counter = LimitCounter::new();
        counter.recompute(&[limit.clone()], &index, day(2024, 6, 1));

        assert_eq!(counter.count_for(&limit.id), Some(LimitCount::Days(10)));
        assert_eq!(counter.is_over_limit(&limit.id), Some(false));
    }

    #[test]
    fn running_thirty_days_over_leap_day() {
        // Window [2024-01-30, 2024-02-29]; event covers Feb 1..29 = 29 days
        let index = occupancy(vec![event("a", day(2024, 2, 1), day(2024, 2, 29))]);
        let limit = Limit::running(
            LimitId::new("30d").unwrap(),
            category_id(),
            "30d",
            14,
            30,
            RunningUnit::Day,
        );

        let mut counter = LimitCounter::new();
        counter.recompute(&[limit.clone()], &index, day(2024, 2, 29));

        assert_eq!(
            counter.window_for(&limit.id),
            Some(Interval::new(day(2024, 1, 30), day(2024, 2, 29)))
        );
        assert_eq!(counter.count_for(&limit.id), Some(LimitCount::Days(29)));
        assert_eq!(counter.is_over_limit(&limit.id), Some(true));
    }

    #[test]
    fn count_matches_brute_force_filter() {
        let index = occupancy(vec![
            event("a", day(2023, 11, 20), day(2023, 12, 5)),
            event("b", day(2024, 1, 15), day(2024, 2, 10)),
            event("c", day(2024, 3, 1), day(2024, 3, 1)),
        ]);
        let limits = vec![
            Limit::fixed(
                LimitId::new("y").unwrap(),
                category_id(),
                "y",
                90,
                FixedInterval::Yearly,
            ),
            Limit::fixed(
                LimitId::new("m").unwrap(),
                category_id(),
                "m",
                10,
                FixedInterval::Monthly,
            ),
            Limit::running(
                LimitId::new("r").unwrap(),
                category_id(),
                "r",
                60,
                6,
                RunningUnit::Month,
            ),
        ];

        let as_of = day(2024, 3, 15);
        let mut counter = LimitCounter::new();
        counter.recompute(&limits, &index, as_of);

        for limit in &limits {
            let window = limit.window(as_of).unwrap();
            let expected = window.filter(index.used_days_sorted()).count();
            assert_eq!(
                counter.count_for(&limit.id),
                Some(LimitCount::Days(expected)),
                "limit {}",
                limit.id
            );
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let index = occupancy(vec![event("a", day(2024, 1, 1), day(2024, 1, 10))]);
        let limit = Limit::running(
            LimitId::new("r").unwrap(),
            category_id(),
            "r",
            30,
            90,
            RunningUnit::Day,
        );

        let mut counter = LimitCounter::new();
        counter.recompute(std::slice::from_ref(&limit), &index, day(2024, 2, 1));
        let first = counter.count_for(&limit.id);
        counter.recompute(std::slice::from_ref(&limit), &index, day(2024, 2, 1));
        assert_eq!(counter.count_for(&limit.id), first);
    }

    #[test]
    fn misconfigured_limit_is_unavailable_without_poisoning_others() {
        let index = occupancy(vec![event("a", day(2024, 1, 1), day(2024, 1, 10))]);
        let mut broken = Limit::running(
            LimitId::new("broken").unwrap(),
            category_id(),
            "broken",
            10,
            6,
            RunningUnit::Month,
        );
        broken.running_amount = None;
        let healthy = Limit::fixed(
            LimitId::new("healthy").unwrap(),
            category_id(),
            "healthy",
            61,
            FixedInterval::Yearly,
        );

        let mut counter = LimitCounter::new();
        counter.recompute(&[broken.clone(), healthy.clone()], &index, day(2024, 6, 1));

        assert_eq!(counter.count_for(&broken.id), Some(LimitCount::Unavailable));
        assert_eq!(counter.is_over_limit(&broken.id), None);
        assert_eq!(counter.count_for(&healthy.id), Some(LimitCount::Days(10)));
    }

    #[test]
    fn exact_cap_is_not_over_limit() {
        let index = occupancy(vec![event("a", day(2024, 1, 1), day(2024, 1, 10))]);
        let limit = Limit::fixed(
            LimitId::new("tight").unwrap(),
            category_id(),
            "tight",
            10,
            FixedInterval::Yearly,
        );

        let mut counter = LimitCounter::new();
        counter.recompute(std::slice::from_ref(&limit), &index, day(2024, 6, 1));

        assert_eq!(counter.count_for(&limit.id), Some(LimitCount::Days(10)));
        assert_eq!(counter.is_over_limit(&limit.id), Some(false));
    }

    #[test]
    fn unknown_limit_id_reads_none() {
        let counter = LimitCounter::new();
        let id = LimitId::new("missing").unwrap();
        assert_eq!(counter.count_for(&id), None);
        assert_eq!(counter.is_over_limit(&id), None);
    }
}
