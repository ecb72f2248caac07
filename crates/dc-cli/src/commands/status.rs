//! Status command: per-limit used-day counts against their caps.
//!
//! This module implements `daycap status`, which builds the in-memory
//! session for the active category and renders each limit's resolved window,
//! count, cap, and over-limit flag.

use std::fmt::Write;

use anyhow::{Context, Result};
use dc_core::{Day, LimitCount, Session};
use dc_db::Database;
use serde::Serialize;

use super::util::{active_category, parse_day, short_id};

/// One limit's evaluated state.
#[derive(Debug, Clone, Serialize)]
pub struct LimitStatus {
    pub id: String,
    pub id_short: String,
    pub name: String,
    pub max_days: u32,
    /// `None` when the limit's window could not be resolved.
    pub used_days: Option<usize>,
    pub window_start: Option<String>,
    pub window_stop: Option<String>,
    pub over_limit: Option<bool>,
    pub favorite: bool,
}

/// Evaluated status for the whole active category.
#[derive(Debug, Serialize)]
pub struct StatusData {
    pub category: String,
    pub as_of: String,
    pub total_used_days: usize,
    pub limits: Vec<LimitStatus>,
}

/// Builds the session and evaluates every limit as of `as_of`.
pub fn get_status(db: &Database, as_of: Day) -> Result<StatusData> {
    let category = active_category(db)?;
    let events = db
        .load_events(&category.id)
        .context("failed to load events")?;
    let limits = db
        .load_limits(&category.id)
        .context("failed to load limits")?;

    let session = Session::new(category, events, limits, as_of);
    let counter = session.counter();

    let limits = session
        .limits()
        .iter()
        .map(|limit| {
            let used_days = match counter.count_for(&limit.id) {
                Some(LimitCount::Days(days)) => Some(days),
                _ => None,
            };
            let window = counter.window_for(&limit.id);
            LimitStatus {
                id: limit.id.to_string(),
                id_short: short_id(limit.id.as_str()),
                name: limit.name.clone(),
                max_days: limit.max_days,
                used_days,
                window_start: window.map(|w| w.start.to_string()),
                window_stop: window.map(|w| w.stop.to_string()),
                over_limit: counter.is_over_limit(&limit.id),
                favorite: limit.is_favorite,
            }
        })
        .collect();

    Ok(StatusData {
        category: session.category().name.clone(),
        as_of: as_of.to_string(),
        total_used_days: session.occupancy().len(),
        limits,
    })
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar of used days against the cap.
/// Usage below 5% of the cap still gets a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(used: usize, max: u32) -> String {
    if max == 0 {
        return "██████████".to_string();
    }

    let ratio = used as f64 / f64::from(max);
    let filled = if ratio < 0.05 && used > 0 {
        1
    } else {
        ((ratio * 10.0).round() as usize).min(10)
    };

    let mut bar = String::new();
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..10 {
        bar.push('░');
    }
    bar
}

// ========== Human-Readable Output ==========

/// Format status for human-readable output.
pub fn format_status(data: &StatusData) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "STATUS ({}) as of {}",
        data.category, data.as_of
    )
    .unwrap();
    writeln!(output).unwrap();

    if data.limits.is_empty() {
        writeln!(output, "No limits defined.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'daycap limit add <name> --max-days N --yearly' to create one."
        )
        .unwrap();
        return output;
    }

    for limit in &data.limits {
        let Some(used) = limit.used_days else {
            writeln!(output, "{:<20}  unavailable (check configuration)", limit.name).unwrap();
            continue;
        };
        let bar = progress_bar(used, limit.max_days);
        let window = match (&limit.window_start, &limit.window_stop) {
            (Some(start), Some(stop)) => format!("{start} .. {stop}"),
            _ => String::new(),
        };
        let flag = if limit.over_limit == Some(true) {
            "  OVER"
        } else {
            ""
        };
        writeln!(
            output,
            "{:<20}  {bar}  {used:>4} / {:<4}  {window}{flag}",
            limit.name, limit.max_days
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total used days on record: {}", data.total_used_days).unwrap();
    output
}

// ========== Public Interface ==========

/// Runs the status command.
pub fn run(db: &Database, as_of: Option<&str>, json: bool) -> Result<()> {
    let as_of = match as_of {
        Some(s) => parse_day(s)?,
        None => Day::today(),
    };
    let data = get_status(db, as_of)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", format_status(&data));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::{Category, CategoryId, Event, EventId, FixedInterval, Limit, LimitId};

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        let id = CategoryId::new("cat-1").unwrap();
        db.insert_category(&Category {
            id: id.clone(),
            name: "travel".to_string(),
            color: "#3377ff".to_string(),
        })
        .unwrap();
        db.set_active_category(&id).unwrap();
        db
    }

    fn insert_event(db: &Database, id: &str, start: Day, stop: Day) {
        db.insert_event(
            &Event::new(
                EventId::new(id).unwrap(),
                CategoryId::new("cat-1").unwrap(),
                start,
                stop,
                "",
            )
            .unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn status_counts_against_yearly_cap() {
        let db = setup();
        insert_event(&db, "event-1", day(2024, 1, 1), day(2024, 1, 10));
        db.insert_limit(&Limit::fixed(
            LimitId::new("limit-1").unwrap(),
            CategoryId::new("cat-1").unwrap(),
            "year cap",
            61,
            FixedInterval::Yearly,
        ))
        .unwrap();

        let data = get_status(&db, day(2024, 6, 1)).unwrap();
        assert_eq!(data.total_used_days, 10);
        assert_eq!(data.limits.len(), 1);
        assert_eq!(data.limits[0].used_days, Some(10));
        assert_eq!(data.limits[0].over_limit, Some(false));
        assert_eq!(data.limits[0].window_start.as_deref(), Some("2024-01-01"));
        assert_eq!(data.limits[0].window_stop.as_deref(), Some("2024-12-31"));
    }

    #[test]
    fn over_limit_is_flagged_in_output() {
        let db = setup();
        insert_event(&db, "event-1", day(2024, 1, 1), day(2024, 1, 10));
        db.insert_limit(&Limit::fixed(
            LimitId::new("limit-1").unwrap(),
            CategoryId::new("cat-1").unwrap(),
            "tight",
            5,
            FixedInterval::Yearly,
        ))
        .unwrap();

        let data = get_status(&db, day(2024, 6, 1)).unwrap();
        assert_eq!(data.limits[0].over_limit, Some(true));
        assert!(format_status(&data).contains("OVER"));
    }

    #[test]
    fn misconfigured_limit_shows_unavailable() {
        let db = setup();
        // Running interval type with its payload stripped
        let mut broken = Limit::running(
            LimitId::new("limit-1").unwrap(),
            CategoryId::new("cat-1").unwrap(),
            "broken",
            10,
            6,
            dc_core::RunningUnit::Month,
        );
        broken.running_amount = None;
        broken.running_unit = None;
        db.insert_limit(&broken).unwrap();

        let data = get_status(&db, day(2024, 6, 1)).unwrap();
        assert_eq!(data.limits[0].used_days, None);
        assert!(format_status(&data).contains("unavailable"));
    }

    #[test]
    fn progress_bar_extremes() {
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(10, 10), "██████████");
        assert_eq!(progress_bar(15, 10), "██████████");
        // Tiny but nonzero usage still shows one block
        assert_eq!(progress_bar(1, 400), "█░░░░░░░░░");
    }

    #[test]
    fn empty_limits_prints_hint() {
        let db = setup();
        let data = get_status(&db, day(2024, 6, 1)).unwrap();
        assert!(format_status(&data).contains("No limits defined."));
    }
}
