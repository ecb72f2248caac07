//! Shared utilities for CLI commands.

use anyhow::{Context, Result, bail};
use dc_core::{Category, Day};
use dc_db::Database;

/// Parse a `YYYY-MM-DD` argument into a [`Day`].
pub fn parse_day(s: &str) -> Result<Day> {
    s.parse()
        .with_context(|| format!("invalid date: {s} (expected YYYY-MM-DD)"))
}

/// Resolves the active category, set via `daycap category use`.
pub fn active_category(db: &Database) -> Result<Category> {
    let Some(id) = db.active_category().context("failed to read settings")? else {
        bail!(
            "no active category. Create one with 'daycap category add <name>' \
             and select it with 'daycap category use <id>'."
        );
    };
    let categories = db.load_categories().context("failed to load categories")?;
    categories
        .into_iter()
        .find(|c| c.id == id)
        .with_context(|| format!("active category {id} no longer exists"))
}

/// First characters of an ID for compact table display.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_iso_dates() {
        let d = parse_day("2024-02-29").unwrap();
        assert_eq!(d, Day::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(parse_day("yesterday").is_err());
        assert!(parse_day("2024-13-01").is_err());
    }

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(short_id("abcdef0123456789"), "abcdef01");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn active_category_requires_selection() {
        let db = Database::open_in_memory().unwrap();
        assert!(active_category(&db).is_err());
    }
}
