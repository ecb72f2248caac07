//! Limit commands: create, list, and delete limits.

use std::fmt::Write;

use anyhow::{Context, Result, bail};
use dc_core::{FixedInterval, IntervalType, Limit, LimitId, RunningUnit};
use dc_db::Database;
use serde::Serialize;
use uuid::Uuid;

use super::util::{active_category, parse_day, short_id};

/// Window-kind arguments for `limit add`, exactly one of which applies.
#[derive(Debug, Clone)]
pub struct KindArgs<'a> {
    pub yearly: bool,
    pub monthly: bool,
    pub running: Option<u32>,
    pub unit: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
}

/// A limit row for display.
#[derive(Debug, Clone, Serialize)]
pub struct LimitEntry {
    pub id: String,
    pub id_short: String,
    pub name: String,
    pub max_days: u32,
    pub window: String,
    pub favorite: bool,
}

/// Human-readable description of a limit's window rule.
fn describe_window(limit: &Limit) -> String {
    match limit.interval_type {
        IntervalType::Fixed => match limit.fixed_interval {
            Some(FixedInterval::Yearly) => "calendar year".to_string(),
            Some(FixedInterval::Monthly) => "calendar month".to_string(),
            None => "(misconfigured)".to_string(),
        },
        IntervalType::Running => match (limit.running_amount, limit.running_unit) {
            (Some(amount), Some(unit)) => format!("rolling {amount} {unit}s"),
            _ => "(misconfigured)".to_string(),
        },
        IntervalType::Custom => match (limit.custom_start_day, limit.custom_stop_day) {
            (Some(start), Some(stop)) => format!("{start} .. {stop}"),
            _ => "(misconfigured)".to_string(),
        },
    }
}

/// Loads the active category's limits, favorites first.
pub fn get_limits_for_display(
    db: &Database,
    category_id: &dc_core::CategoryId,
) -> Result<Vec<LimitEntry>> {
    let entries = db
        .load_limits(category_id)
        .context("failed to load limits")?
        .into_iter()
        .map(|limit| LimitEntry {
            id_short: short_id(limit.id.as_str()),
            window: describe_window(&limit),
            max_days: limit.max_days,
            favorite: limit.is_favorite,
            name: limit.name.clone(),
            id: limit.id.into(),
        })
        .collect();
    Ok(entries)
}

/// Format limits for human-readable output.
pub fn format_limits(entries: &[LimitEntry], category_name: &str) -> String {
    let mut output = String::new();

    writeln!(output, "LIMITS ({category_name})").unwrap();
    writeln!(output).unwrap();

    if entries.is_empty() {
        writeln!(output, "No limits defined.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'daycap limit add <name> --max-days N --yearly' to create one."
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<9}  {:<20}  {:>8}  {:<24}  Fav",
        "ID", "Name", "Max days", "Window"
    )
    .unwrap();
    writeln!(
        output,
        "─────────  ────────────────────  ────────  ────────────────────────  ───"
    )
    .unwrap();

    for entry in entries {
        let marker = if entry.favorite { "*" } else { "" };
        writeln!(
            output,
            "{:<9}  {:<20}  {:>8}  {:<24}  {}",
            entry.id_short, entry.name, entry.max_days, entry.window, marker
        )
        .unwrap();
    }

    output
}

/// Runs `limit list`.
pub fn list(db: &Database, json: bool) -> Result<()> {
    let category = active_category(db)?;
    let entries = get_limits_for_display(db, &category.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_limits(&entries, &category.name));
    }
    Ok(())
}

/// Runs `limit add`: creates a limit in the active category and prints its
/// ID.
pub fn add(
    db: &Database,
    name: String,
    max_days: u32,
    kind: &KindArgs<'_>,
    favorite: bool,
) -> Result<()> {
    let category = active_category(db)?;
    let id = LimitId::new(Uuid::new_v4().to_string())?;

    let mut limit = match kind {
        KindArgs { yearly: true, .. } => Limit::fixed(
            id,
            category.id,
            name,
            max_days,
            FixedInterval::Yearly,
        ),
        KindArgs { monthly: true, .. } => Limit::fixed(
            id,
            category.id,
            name,
            max_days,
            FixedInterval::Monthly,
        ),
        KindArgs {
            running: Some(amount),
            unit,
            ..
        } => {
            let unit = unit
                .context("--running requires --unit year|month|day")?
                .parse::<RunningUnit>()
                .context("invalid --unit")?;
            Limit::running(id, category.id, name, max_days, *amount, unit)
        }
        KindArgs {
            from: Some(from),
            to: Some(to),
            ..
        } => {
            let start = parse_day(from)?;
            let stop = parse_day(to)?;
            Limit::custom(id, category.id, name, max_days, start, stop)
                .context("invalid custom window")?
        }
        _ => bail!("choose a window: --yearly, --monthly, --running N --unit U, or --from/--to"),
    };
    limit.is_favorite = favorite;

    db.insert_limit(&limit).context("failed to create limit")?;
    println!("{}", limit.id);
    Ok(())
}

/// Runs `limit rm`.
pub fn remove(db: &Database, id: &str) -> Result<()> {
    let category = active_category(db)?;
    let limits = db
        .load_limits(&category.id)
        .context("failed to load limits")?;
    let matches: Vec<&Limit> = limits
        .iter()
        .filter(|l| l.id.as_str().starts_with(id))
        .collect();
    let limit = match matches.as_slice() {
        [limit] => *limit,
        [] => bail!("no limit matching '{id}'"),
        _ => bail!("'{id}' is ambiguous; use a longer prefix"),
    };
    db.delete_limit(&limit.id).context("failed to delete limit")?;
    Ok(())
}
