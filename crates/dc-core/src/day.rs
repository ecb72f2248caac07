//! Whole-day UTC calendar arithmetic.
//!
//! A [`Day`] is a millisecond timestamp pinned to 00:00:00 UTC of a calendar
//! day. All comparisons and arithmetic in the engine operate at this
//! granularity; no time-of-day component ever survives construction.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds in one UTC day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// A calendar day as milliseconds since epoch, normalized to UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(i64);

/// UTC decomposition of a [`Day`]. `month` is 1..=12, `day` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A calendar offset applied with `Date.UTC`-style normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDelta {
    pub years: i32,
    pub months: i32,
    pub days: i64,
}

impl CalendarDelta {
    pub const fn years(n: i32) -> Self {
        Self { years: n, months: 0, days: 0 }
    }

    pub const fn months(n: i32) -> Self {
        Self { years: 0, months: n, days: 0 }
    }

    pub const fn days(n: i64) -> Self {
        Self { years: 0, months: 0, days: n }
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

impl Day {
    /// Floors an arbitrary millisecond timestamp to its UTC day.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms.div_euclid(MS_PER_DAY) * MS_PER_DAY)
    }

    /// Constructs from a strict calendar date. `None` for dates that do not
    /// exist (e.g. 2026-02-29).
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_naive)
    }

    /// Constructs from calendar fields with `Date.UTC`-style normalization:
    /// `month0` is 0-based and rolls the year on overflow, `day` is 1-based
    /// and rolls the month (day 0 is the last day of the previous month).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_calendar(year: i32, month0: i64, day: i64) -> Self {
        let year = i64::from(year) + month0.div_euclid(12);
        let month = month0.rem_euclid(12) as u32 + 1;
        // Out-of-range years are outside the representable calendar and panic,
        // matching the "propagate invalid numeric input as-is" contract.
        let first = NaiveDate::from_ymd_opt(year as i32, month, 1).unwrap();
        Self::from_naive(first + Duration::days(day - 1))
    }

    /// The current UTC day.
    #[must_use]
    pub fn today() -> Self {
        Self::from_naive(Utc::now().date_naive())
    }

    /// The underlying millisecond timestamp (always UTC midnight).
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Days since epoch.
    #[must_use]
    pub const fn day_number(self) -> i64 {
        self.0.div_euclid(MS_PER_DAY)
    }

    /// UTC year/month/day decomposition.
    #[must_use]
    pub fn parts(self) -> DayParts {
        let date = self.to_naive();
        DayParts {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// ISO day of week: 1 (Monday) .. 7 (Sunday).
    #[must_use]
    pub fn iso_weekday(self) -> u32 {
        self.to_naive().weekday().number_from_monday()
    }

    /// ISO-8601 week number, derived from the offset to Jan 1 of the same
    /// year. Jan 1 belongs to week 1 only when it falls on Monday..Thursday;
    /// leading days of later-starting years land in week 0 (the prior year's
    /// final week).
    #[must_use]
    pub fn week_number(self) -> i64 {
        let year = self.parts().year;
        let jan1 = Self::from_calendar(year, 0, 1);
        let offset = self.day_number() - jan1.day_number();
        let jan1_weekday = i64::from(jan1.iso_weekday());
        let adjusted = offset - (7 - jan1_weekday);
        ceil_div(adjusted, 7) + i64::from(jan1_weekday <= 4)
    }

    /// Applies a calendar offset. Month and year components use UTC calendar
    /// normalization rather than fixed day counts, so month-end inputs can
    /// roll forward (2024-01-31 + 1 month = 2024-03-02).
    #[must_use]
    pub fn add(self, delta: CalendarDelta) -> Self {
        let parts = self.parts();
        Self::from_calendar(
            parts.year + delta.years,
            i64::from(parts.month) - 1 + i64::from(delta.months),
            i64::from(parts.day) + delta.days,
        )
    }

    /// First day of the containing month.
    #[must_use]
    pub fn month_floor(self) -> Self {
        let parts = self.parts();
        Self::from_calendar(parts.year, i64::from(parts.month) - 1, 1)
    }

    /// Last day of the containing month.
    #[must_use]
    pub fn month_ceil(self) -> Self {
        let parts = self.parts();
        Self::from_calendar(parts.year, i64::from(parts.month), 0)
    }

    /// Ascending sequence of days from `start` to `stop`, stepping by
    /// `step_days`. Inclusive of `start`; includes `stop` only when the span
    /// is an exact multiple of the step. Each call produces a fresh iterator.
    #[must_use]
    pub const fn sequence(start: Self, stop: Self, step_days: i64) -> DaySequence {
        DaySequence {
            next: start,
            stop,
            step_days,
        }
    }

    /// One-day stepping sequence over the inclusive range `[start, stop]`.
    #[must_use]
    pub const fn range_inclusive(start: Self, stop: Self) -> DaySequence {
        Self::sequence(start, stop, 1)
    }

    fn from_naive(date: NaiveDate) -> Self {
        Self((date - epoch()).num_days() * MS_PER_DAY)
    }

    fn to_naive(self) -> NaiveDate {
        epoch() + Duration::days(self.day_number())
    }
}

const fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1).div_euclid(b)
}

/// Finite iterator over day timestamps. See [`Day::sequence`].
#[derive(Debug, Clone)]
pub struct DaySequence {
    next: Day,
    stop: Day,
    step_days: i64,
}

impl Iterator for DaySequence {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if self.step_days <= 0 || self.next > self.stop {
            return None;
        }
        let current = self.next;
        self.next = Day(current.0 + self.step_days * MS_PER_DAY);
        Some(current)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.parts();
        write!(f, "{:04}-{:02}-{:02}", parts.year, parts.month, parts.day)
    }
}

/// Error parsing a `YYYY-MM-DD` day string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid day: {input}")]
pub struct ParseDayError {
    pub input: String,
}

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDayError {
            input: s.to_string(),
        };
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| err())?;
        Ok(Self::from_naive(date))
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ms = i64::deserialize(deserializer)?;
        // Floor on deserialization to be lenient with external data
        Ok(Self::from_millis(ms))
    }
}
