//! Event commands: record, list, and delete used date ranges.

use std::fmt::Write;

use anyhow::{Context, Result};
use dc_core::{CategoryId, Day, Event, EventId};
use dc_db::Database;
use serde::Serialize;
use uuid::Uuid;

use super::util::{active_category, parse_day, short_id};

/// An event row for display.
#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    pub id: String,
    pub id_short: String,
    pub from: String,
    pub to: String,
    pub days: i64,
    pub note: String,
}

/// Loads the active category's events, ordered by start day.
pub fn get_events_for_display(db: &Database, category_id: &CategoryId) -> Result<Vec<EventEntry>> {
    let entries = db
        .load_events(category_id)
        .context("failed to load events")?
        .into_iter()
        .map(|event| EventEntry {
            id_short: short_id(event.id.as_str()),
            from: event.start_day.to_string(),
            to: event.stop_day.to_string(),
            days: event.day_count(),
            id: event.id.into(),
            note: event.note,
        })
        .collect();
    Ok(entries)
}

/// Format events for human-readable output.
pub fn format_events(entries: &[EventEntry], category_name: &str) -> String {
    let mut output = String::new();

    writeln!(output, "EVENTS ({category_name})").unwrap();
    writeln!(output).unwrap();

    if entries.is_empty() {
        writeln!(output, "No events recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'daycap event add --from YYYY-MM-DD' to record used days."
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<9}  {:<10}  {:<10}  {:>5}  Note",
        "ID", "From", "To", "Days"
    )
    .unwrap();
    writeln!(
        output,
        "─────────  ──────────  ──────────  ─────  ──────────────────"
    )
    .unwrap();

    let mut total = 0;
    for entry in entries {
        writeln!(
            output,
            "{:<9}  {:<10}  {:<10}  {:>5}  {}",
            entry.id_short, entry.from, entry.to, entry.days, entry.note
        )
        .unwrap();
        total += entry.days;
    }

    writeln!(output).unwrap();
    writeln!(output, "{} events, {total} days total", entries.len()).unwrap();
    output
}

/// Runs `event list`.
pub fn list(db: &Database, json: bool) -> Result<()> {
    let category = active_category(db)?;
    let entries = get_events_for_display(db, &category.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_events(&entries, &category.name));
    }
    Ok(())
}

/// Runs `event add`: records a range in the active category and prints the
/// event ID. A missing `--to` records a single day.
pub fn add(db: &Database, from: &str, to: Option<&str>, note: String) -> Result<()> {
    let category = active_category(db)?;
    let start_day = parse_day(from)?;
    let stop_day = match to {
        Some(to) => parse_day(to)?,
        None => start_day,
    };

    let event = Event::new(
        EventId::new(Uuid::new_v4().to_string())?,
        category.id,
        start_day,
        stop_day,
        note,
    )
    .context("invalid event range")?;

    db.insert_event(&event).context("failed to record event")?;
    tracing::debug!(event = %event.id, days = event.day_count(), "event recorded");
    println!("{}", event.id);
    Ok(())
}

/// Runs `event rm`.
pub fn remove(db: &Database, id: &str) -> Result<()> {
    let category = active_category(db)?;
    let events = db
        .load_events(&category.id)
        .context("failed to load events")?;
    let matches: Vec<&Event> = events
        .iter()
        .filter(|e| e.id.as_str().starts_with(id))
        .collect();
    let event = match matches.as_slice() {
        [event] => *event,
        [] => anyhow::bail!("no event matching '{id}'"),
        _ => anyhow::bail!("'{id}' is ambiguous; use a longer prefix"),
    };
    let days = Day::range_inclusive(event.start_day, event.stop_day).count();
    db.delete_event(&event.id).context("failed to delete event")?;
    tracing::debug!(event = %event.id, days, "event deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::Category;

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

    fn insert_event(db: &Database, id: &str, from: (i32, u32, u32), to: (i32, u32, u32)) {
        db.insert_event(
            &Event::new(
                EventId::new(id).unwrap(),
                CategoryId::new("cat-1").unwrap(),
                Day::from_ymd(from.0, from.1, from.2).unwrap(),
                Day::from_ymd(to.0, to.1, to.2).unwrap(),
                "",
            )
            .unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn add_single_day_defaults_stop_to_start() {
        let db = setup();
        add(&db, "2024-05-01", None, String::new()).unwrap();

        let events = db
            .load_events(&CategoryId::new("cat-1").unwrap())
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_day, events[0].stop_day);
        assert_eq!(events[0].day_count(), 1);
    }

    #[test]
    fn add_rejects_inverted_range() {
        let db = setup();
        let result = add(&db, "2024-05-10", Some("2024-05-01"), String::new());
        assert!(result.is_err());
        assert!(
            db.load_events(&CategoryId::new("cat-1").unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn display_entries_include_day_counts() {
        let db = setup();
        insert_event(&db, "event-1", (2024, 1, 1), (2024, 1, 10));
        insert_event(&db, "event-2", (2024, 3, 5), (2024, 3, 5));

        let entries = get_events_for_display(&db, &CategoryId::new("cat-1").unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].days, 10);
        assert_eq!(entries[1].days, 1);

        let output = format_events(&entries, "travel");
        assert!(output.contains("2 events, 11 days total"));
    }

    #[test]
    fn remove_by_prefix() {
        let db = setup();
        insert_event(&db, "event-abc", (2024, 1, 1), (2024, 1, 2));
        insert_event(&db, "event-xyz", (2024, 2, 1), (2024, 2, 2));

        remove(&db, "event-a").unwrap();
        let events = db
            .load_events(&CategoryId::new("cat-1").unwrap())
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_str(), "event-xyz");
    }

    #[test]
    fn remove_ambiguous_prefix_fails() {
        let db = setup();
        insert_event(&db, "event-abc", (2024, 1, 1), (2024, 1, 2));
        insert_event(&db, "event-abd", (2024, 2, 1), (2024, 2, 2));

        assert!(remove(&db, "event-ab").is_err());
    }
}
