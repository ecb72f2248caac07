//! Category commands: create, list, delete, and switch the active category.

use std::fmt::Write;

use anyhow::{Context, Result};
use dc_core::{Category, CategoryId};
use dc_db::Database;
use serde::Serialize;
use uuid::Uuid;

use super::util::short_id;

/// A category row for display.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub id: String,
    pub id_short: String,
    pub name: String,
    pub color: String,
    pub active: bool,
}

/// Loads all categories with the active one flagged.
pub fn get_categories_for_display(db: &Database) -> Result<Vec<CategoryEntry>> {
    let active = db.active_category().context("failed to read settings")?;
    let entries = db
        .load_categories()
        .context("failed to load categories")?
        .into_iter()
        .map(|category| CategoryEntry {
            id_short: short_id(category.id.as_str()),
            active: active.as_ref() == Some(&category.id),
            id: category.id.into(),
            name: category.name,
            color: category.color,
        })
        .collect();
    Ok(entries)
}

/// Format categories for human-readable output.
pub fn format_categories(entries: &[CategoryEntry]) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        writeln!(output, "No categories.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'daycap category add <name>' to create one.").unwrap();
        return output;
    }

    writeln!(output, "{:<9}  {:<24}  {:<9}  Active", "ID", "Name", "Color").unwrap();
    writeln!(
        output,
        "─────────  ────────────────────────  ─────────  ──────"
    )
    .unwrap();

    for entry in entries {
        let marker = if entry.active { "*" } else { "" };
        writeln!(
            output,
            "{:<9}  {:<24}  {:<9}  {}",
            entry.id_short, entry.name, entry.color, marker
        )
        .unwrap();
    }

    output
}

/// Runs `category list`.
pub fn list(db: &Database, json: bool) -> Result<()> {
    let entries = get_categories_for_display(db)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_categories(&entries));
    }
    Ok(())
}

/// Runs `category add`: creates the category and prints its ID.
///
/// The first category created becomes active automatically.
pub fn add(db: &Database, name: String, color: String) -> Result<()> {
    let id = CategoryId::new(Uuid::new_v4().to_string())?;
    let category = Category {
        id: id.clone(),
        name,
        color,
    };
    db.insert_category(&category)
        .context("failed to create category")?;

    if db.active_category()?.is_none() {
        db.set_active_category(&id)
            .context("failed to set active category")?;
        tracing::debug!(category = %id, "first category made active");
    }

    println!("{id}");
    Ok(())
}

/// Runs `category rm`. Events and limits cascade; the active pointer is
/// cleared if it referenced the removed category.
pub fn remove(db: &Database, id: &str) -> Result<()> {
    let id = resolve_id(db, id)?;
    if db.active_category()? == Some(id.clone()) {
        db.clear_active_category()
            .context("failed to clear active category")?;
    }
    db.delete_category(&id).context("failed to delete category")?;
    Ok(())
}

/// Runs `category use`: switches the active category.
pub fn switch(db: &Database, id: &str) -> Result<()> {
    let id = resolve_id(db, id)?;
    db.set_active_category(&id)
        .context("failed to set active category")?;
    Ok(())
}

/// Accepts either a full ID or an unambiguous short prefix.
fn resolve_id(db: &Database, given: &str) -> Result<CategoryId> {
    let categories = db.load_categories().context("failed to load categories")?;
    let matches: Vec<&Category> = categories
        .iter()
        .filter(|c| c.id.as_str().starts_with(given))
        .collect();
    match matches.as_slice() {
        [category] => Ok(category.id.clone()),
        [] => anyhow::bail!("no category matching '{given}'"),
        _ => anyhow::bail!("'{given}' is ambiguous; use a longer prefix"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::CategoryId;

    fn insert(db: &Database, id: &str, name: &str) {
        db.insert_category(&Category {
            id: CategoryId::new(id).unwrap(),
            name: name.to_string(),
            color: "#3377ff".to_string(),
        })
        .unwrap();
    }

    #[test]
    fn list_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let entries = get_categories_for_display(&db).unwrap();
        assert!(entries.is_empty());
        assert!(format_categories(&entries).contains("No categories."));
    }

    #[test]
    fn active_category_is_flagged() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "cat-schengen", "schengen");
        insert(&db, "cat-uk", "uk");
        db.set_active_category(&CategoryId::new("cat-uk").unwrap())
            .unwrap();

        let entries = get_categories_for_display(&db).unwrap();
        let active: Vec<&str> = entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(active, vec!["cat-uk"]);
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "abc-123", "one");
        insert(&db, "xyz-456", "two");

        assert_eq!(resolve_id(&db, "abc").unwrap().as_str(), "abc-123");
        assert!(resolve_id(&db, "missing").is_err());
    }

    #[test]
    fn resolve_id_rejects_ambiguous_prefix() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "abc-123", "one");
        insert(&db, "abc-456", "two");

        assert!(resolve_id(&db, "abc").is_err());
        assert_eq!(resolve_id(&db, "abc-1").unwrap().as_str(), "abc-123");
    }

    #[test]
    fn removing_active_category_clears_pointer() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "cat-1", "one");
        db.set_active_category(&CategoryId::new("cat-1").unwrap())
            .unwrap();

        remove(&db, "cat-1").unwrap();
        assert!(db.active_category().unwrap().is_none());
        assert!(db.load_categories().unwrap().is_empty());
    }
}
