//! Report command: used days grouped by calendar month.

use std::fmt::Write;

use anyhow::{Context, Result};
use dc_core::OccupancyIndex;
use dc_db::Database;
use serde::Serialize;

use super::util::active_category;

/// Used days within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthUsage {
    /// `YYYY-MM`.
    pub month: String,
    pub used_days: usize,
}

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub category: String,
    pub months: Vec<MonthUsage>,
    pub total_used_days: usize,
}

/// Groups an occupancy index's used days by calendar month, ascending.
pub fn group_by_month(occupancy: &OccupancyIndex) -> Vec<MonthUsage> {
    let mut months: Vec<MonthUsage> = Vec::new();
    for day in occupancy.used_days_sorted() {
        let parts = day.parts();
        let key = format!("{:04}-{:02}", parts.year, parts.month);
        match months.last_mut() {
            Some(last) if last.month == key => last.used_days += 1,
            _ => months.push(MonthUsage {
                month: key,
                used_days: 1,
            }),
        }
    }
    months
}

/// Builds the report for the active category.
pub fn get_report(db: &Database) -> Result<ReportData> {
    let category = active_category(db)?;
    let events = db
        .load_events(&category.id)
        .context("failed to load events")?;

    let mut occupancy = OccupancyIndex::new();
    occupancy.rebuild(events);

    Ok(ReportData {
        category: category.name,
        months: group_by_month(&occupancy),
        total_used_days: occupancy.len(),
    })
}

/// Format the report for human-readable output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "REPORT ({})", data.category).unwrap();
    writeln!(output).unwrap();

    if data.months.is_empty() {
        writeln!(output, "No used days recorded.").unwrap();
        return output;
    }

    writeln!(output, "{:<8}  Used days", "Month").unwrap();
    writeln!(output, "────────  ─────────").unwrap();
    for month in &data.months {
        writeln!(output, "{:<8}  {:>9}", month.month, month.used_days).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total: {} days", data.total_used_days).unwrap();
    output
}

/// Runs the report command.
pub fn run(db: &Database, json: bool) -> Result<()> {
    let data = get_report(db)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", format_report(&data));
    }
    Ok(())
}
