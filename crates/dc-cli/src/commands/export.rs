//! Export command: dump the active category's raw events as JSON.

use anyhow::{Context, Result};
use dc_core::{Day, Event};
use dc_db::Database;
use serde::Serialize;

use super::util::active_category;

/// The exported shape of one event. Identifiers are omitted so exports can
/// be re-imported into any category.
#[derive(Debug, Serialize)]
pub struct ExportEvent {
    pub start_day: Day,
    pub stop_day: Day,
    pub note: String,
}

impl From<Event> for ExportEvent {
    fn from(event: Event) -> Self {
        Self {
            start_day: event.start_day,
            stop_day: event.stop_day,
            note: event.note,
        }
    }
}

/// Serializes the events as a pretty-printed JSON array.
pub fn format_export(events: Vec<Event>) -> Result<String> {
    let exported: Vec<ExportEvent> = events.into_iter().map(ExportEvent::from).collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}

/// Runs the export command.
pub fn run(db: &Database) -> Result<()> {
    let category = active_category(db)?;
    let events = db
        .load_events(&category.id)
        .context("failed to load events")?;
    println!("{}", format_export(events)?);
    Ok(())
}
