//! Core domain logic for the day-usage tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Day arithmetic: whole-day UTC timestamps, ISO week math, calendar offsets
//! - Occupancy: the used-day set and day-to-event index derived from events
//! - Limits: window resolution and per-limit used-day counting

pub mod category;
pub mod counter;
pub mod day;
pub mod event;
pub mod interval;
pub mod limit;
pub mod occupancy;
pub mod session;
pub mod types;

pub use category::Category;
pub use counter::{LimitCount, LimitCounter};
pub use day::{CalendarDelta, Day, DayParts, DaySequence, ParseDayError};
pub use event::Event;
pub use interval::Interval;
pub use limit::{ConfigurationError, FixedInterval, IntervalType, Limit, RunningUnit};
pub use occupancy::OccupancyIndex;
pub use session::Session;
pub use types::{CategoryId, EventId, LimitId, ValidationError};
