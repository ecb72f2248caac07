//! Limit definitions and window resolution.
//!
//! A limit caps the number of used days inside a window derived from its
//! interval type: a fixed calendar window (current year or month), a rolling
//! lookback anchored to the as-of day, or an explicit custom range.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::{CalendarDelta, Day};
use crate::interval::Interval;
use crate::types::{CategoryId, LimitId, ValidationError};

/// A stored limit's fields are inconsistent with its declared interval type.
///
/// This indicates corrupt or invalid limit data. Resolution fails fast for
/// the affected limit and never silently defaults; other limits are
/// unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A field required by the interval type is absent.
    #[error("limit {limit}: missing {field} for interval type {interval_type}")]
    MissingField {
        limit: LimitId,
        interval_type: IntervalType,
        field: &'static str,
    },

    /// A stored enum string is not a known value.
    #[error("unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
}

/// How a limit's window is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    /// A fixed calendar window ([`FixedInterval`]).
    Fixed,
    /// A rolling lookback of `running_amount` [`RunningUnit`]s ending at the
    /// as-of day.
    Running,
    /// An explicit `[custom_start_day, custom_stop_day]` range.
    Custom,
}

impl IntervalType {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Running => "running",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IntervalType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "running" => Ok(Self::Running),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigurationError::UnknownValue {
                field: "interval type",
                value: s.to_string(),
            }),
        }
    }
}

/// The calendar unit of a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedInterval {
    Yearly,
    Monthly,
}

impl FixedInterval {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for FixedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FixedInterval {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(Self::Yearly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ConfigurationError::UnknownValue {
                field: "fixed interval",
                value: s.to_string(),
            }),
        }
    }
}

/// The calendar axis of a rolling lookback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunningUnit {
    Year,
    Month,
    Day,
}

impl RunningUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for RunningUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunningUnit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            _ => Err(ConfigurationError::UnknownValue {
                field: "running unit",
                value: s.to_string(),
            }),
        }
    }
}

/// A rule capping used days within a computed window.
///
/// Mirrors the stored shape: exactly the payload fields required by
/// `interval_type` should be populated. A limit that violates that invariant
/// still loads, but its window resolution fails with a per-limit
/// [`ConfigurationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub id: LimitId,
    pub category_id: CategoryId,
    pub name: String,
    pub max_days: u32,
    #[serde(default)]
    pub is_favorite: bool,
    pub interval_type: IntervalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_interval: Option<FixedInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_unit: Option<RunningUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start_day: Option<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_stop_day: Option<Day>,
}

impl Limit {
    /// A limit over a fixed calendar window.
    #[must_use]
    pub fn fixed(
        id: LimitId,
        category_id: CategoryId,
        name: impl Into<String>,
        max_days: u32,
        fixed_interval: FixedInterval,
    ) -> Self {
        Self {
            id,
            category_id,
            name: name.into(),
            max_days,
            is_favorite: false,
            interval_type: IntervalType::Fixed,
            fixed_interval: Some(fixed_interval),
            running_amount: None,
            running_unit: None,
            custom_start_day: None,
            custom_stop_day: None,
        }
    }

    /// A limit over a rolling lookback window.
    #[must_use]
    pub fn running(
        id: LimitId,
        category_id: CategoryId,
        name: impl Into<String>,
        max_days: u32,
        amount: u32,
        unit: RunningUnit,
    ) -> Self {
        Self {
            id,
            category_id,
            name: name.into(),
            max_days,
            is_favorite: false,
            interval_type: IntervalType::Running,
            fixed_interval: None,
            running_amount: Some(amount),
            running_unit: Some(unit),
            custom_start_day: None,
            custom_stop_day: None,
        }
    }

    /// A limit over an explicit day range. Rejects inverted bounds at the
    /// boundary.
    pub fn custom(
        id: LimitId,
        category_id: CategoryId,
        name: impl Into<String>,
        max_days: u32,
        start_day: Day,
        stop_day: Day,
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
            name: name.into(),
            max_days,
            is_favorite: false,
            interval_type: IntervalType::Custom,
            fixed_interval: None,
            running_amount: None,
            running_unit: None,
            custom_start_day: Some(start_day),
            custom_stop_day: Some(stop_day),
        })
    }

    /// Resolves the concrete `[start, stop]` day window this limit applies to
    /// as of `as_of`. Deterministic and pure in `(self, as_of)`.
    pub fn window(&self, as_of: Day) -> Result<Interval<Day>, ConfigurationError> {
        match self.interval_type {
            IntervalType::Fixed => match self.require(self.fixed_interval, "fixed interval")? {
                FixedInterval::Yearly => {
                    let year = as_of.parts().year;
                    // [Jan 1, Dec 31]: day 0 of month 0 of the next year
                    Ok(Interval::new(
                        Day::from_calendar(year, 0, 1),
                        Day::from_calendar(year + 1, 0, 0),
                    ))
                }
                FixedInterval::Monthly => {
                    Ok(Interval::new(as_of.month_floor(), as_of.month_ceil()))
                }
            },
            IntervalType::Running => {
                let amount = self.require(self.running_amount, "running amount")?;
                let unit = self.require(self.running_unit, "running unit")?;
                let amount = i64::from(amount);
                // Exactly one calendar axis is shifted back
                let delta = match unit {
                    #[allow(clippy::cast_possible_truncation)]
                    RunningUnit::Year => CalendarDelta::years(-amount as i32),
                    #[allow(clippy::cast_possible_truncation)]
                    RunningUnit::Month => CalendarDelta::months(-amount as i32),
                    RunningUnit::Day => CalendarDelta::days(-amount),
                };
                Ok(Interval::new(as_of.add(delta), as_of))
            }
            IntervalType::Custom => {
                let start = self.require(self.custom_start_day, "custom start day")?;
                let stop = self.require(self.custom_stop_day, "custom stop day")?;
                Ok(Interval::new(start, stop))
            }
        }
    }

    fn require<T>(&self, field: Option<T>, name: &'static str) -> Result<T, ConfigurationError> {
        field.ok_or_else(|| ConfigurationError::MissingField {
            limit: self.id.clone(),
            interval_type: self.interval_type,
            field: name,
        })
    }
}
