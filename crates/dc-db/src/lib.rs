//! Storage layer for the day-usage tracker.
//!
//! Provides persistence for categories, events, and limits using `rusqlite`,
//! plus a small key-value settings table (active category).
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` can be moved between threads but not shared
//! without external synchronization. The in-memory model is single-writer by
//! design, so the CLI never needs more than one connection.
//!
//! # Schema
//!
//! Day bounds (`start_day`, `stop_day`, `custom_start_day`, `custom_stop_day`)
//! are stored as INTEGER milliseconds since epoch at UTC midnight, matching
//! the core `Day` representation. Limit interval enums are stored as their
//! lowercase string forms (`fixed`/`running`/`custom` and so on); a row whose
//! enum strings no longer parse is skipped with a warning on load so one
//! corrupt row cannot poison the collection.

use std::path::Path;
use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use dc_core::{
    Category, CategoryId, Day, Event, EventId, FixedInterval, IntervalType, Limit, LimitId,
    RunningUnit,
};

const ACTIVE_CATEGORY_KEY: &str = "active_category";

/// Database errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety and schema notes.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL
            );

            -- Events: inclusive [start_day, stop_day] ranges of used days
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                category_id TEXT NOT NULL,
                start_day INTEGER NOT NULL,
                stop_day INTEGER NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_events_category ON events(category_id);
            CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_day);

            -- Limits: payload columns beyond interval_type are nullable;
            -- which ones are populated depends on the interval type
            CREATE TABLE IF NOT EXISTS limits (
                id TEXT PRIMARY KEY,
                category_id TEXT NOT NULL,
                name TEXT NOT NULL,
                max_days INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                interval_type TEXT NOT NULL,
                fixed_interval TEXT,
                running_amount INTEGER,
                running_unit TEXT,
                custom_start_day INTEGER,
                custom_stop_day INTEGER,
                FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_limits_category ON limits(category_id);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ========== Categories ==========

    /// Lists all categories ordered by name then ID.
    pub fn load_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM categories ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut categories = Vec::new();
        for row in rows {
            let (id, name, color) = row?;
            match CategoryId::new(id) {
                Ok(id) => categories.push(Category { id, name, color }),
                Err(error) => {
                    tracing::warn!(%error, "skipping corrupt category row");
                }
            }
        }
        Ok(categories)
    }

    pub fn insert_category(&self, category: &Category) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO categories (id, name, color) VALUES (?, ?, ?)",
            params![category.id.as_str(), category.name, category.color],
        )?;
        Ok(())
    }

    pub fn update_category(&self, category: &Category) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE categories SET name = ?, color = ? WHERE id = ?",
            params![category.name, category.color, category.id.as_str()],
        )?;
        Ok(())
    }

    /// Deletes a category; its events and limits cascade.
    pub fn delete_category(&self, id: &CategoryId) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM categories WHERE id = ?", [id.as_str()])?;
        Ok(())
    }

    // ========== Events ==========

    /// Lists a category's events ordered by start day then ID.
    pub fn load_events(&self, category_id: &CategoryId) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, category_id, start_day, stop_day, note
            FROM events
            WHERE category_id = ?
            ORDER BY start_day ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([category_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut events = Vec::new();
        for row in rows {
            let (id, category_id, start_day, stop_day, note) = row?;
            let built = EventId::new(id).and_then(|id| {
                CategoryId::new(category_id).and_then(|category_id| {
                    Event::new(
                        id,
                        category_id,
                        Day::from_millis(start_day),
                        Day::from_millis(stop_day),
                        note,
                    )
                })
            });
            match built {
                Ok(event) => events.push(event),
                Err(error) => {
                    tracing::warn!(%error, "skipping corrupt event row");
                }
            }
        }
        Ok(events)
    }

    pub fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        self.conn.execute(
            "
            INSERT INTO events (id, category_id, start_day, stop_day, note)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                event.id.as_str(),
                event.category_id.as_str(),
                event.start_day.millis(),
                event.stop_day.millis(),
                event.note,
            ],
        )?;
        Ok(())
    }

    pub fn update_event(&self, event: &Event) -> Result<(), StoreError> {
        self.conn.execute(
            "
            UPDATE events
            SET category_id = ?, start_day = ?, stop_day = ?, note = ?
            WHERE id = ?
            ",
            params![
                event.category_id.as_str(),
                event.start_day.millis(),
                event.stop_day.millis(),
                event.note,
                event.id.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_event(&self, id: &EventId) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM events WHERE id = ?", [id.as_str()])?;
        Ok(())
    }

    // ========== Limits ==========

    /// Lists a category's limits, favorites first, then by name and ID.
    ///
    /// Rows whose stored enum strings fail to parse are skipped with a
    /// warning; a limit whose payload is merely incomplete still loads and
    /// surfaces as unavailable at window-resolution time.
    pub fn load_limits(&self, category_id: &CategoryId) -> Result<Vec<Limit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, category_id, name, max_days, is_favorite, interval_type,
                   fixed_interval, running_amount, running_unit,
                   custom_start_day, custom_stop_day
            FROM limits
            WHERE category_id = ?
            ORDER BY is_favorite DESC, name ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([category_id.as_str()], |row| {
            Ok(LimitRow {
                id: row.get(0)?,
                category_id: row.get(1)?,
                name: row.get(2)?,
                max_days: row.get(3)?,
                is_favorite: row.get(4)?,
                interval_type: row.get(5)?,
                fixed_interval: row.get(6)?,
                running_amount: row.get(7)?,
                running_unit: row.get(8)?,
                custom_start_day: row.get(9)?,
                custom_stop_day: row.get(10)?,
            })
        })?;
        let mut limits = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match row.into_limit() {
                Ok(limit) => limits.push(limit),
                Err(error) => {
                    tracing::warn!(limit = %id, %error, "skipping corrupt limit row");
                }
            }
        }
        Ok(limits)
    }

    pub fn insert_limit(&self, limit: &Limit) -> Result<(), StoreError> {
        self.conn.execute(
            "
            INSERT INTO limits
            (id, category_id, name, max_days, is_favorite, interval_type,
             fixed_interval, running_amount, running_unit, custom_start_day, custom_stop_day)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                limit.id.as_str(),
                limit.category_id.as_str(),
                limit.name,
                limit.max_days,
                limit.is_favorite,
                limit.interval_type.as_str(),
                limit.fixed_interval.map(FixedInterval::as_str),
                limit.running_amount,
                limit.running_unit.map(RunningUnit::as_str),
                limit.custom_start_day.map(Day::millis),
                limit.custom_stop_day.map(Day::millis),
            ],
        )?;
        Ok(())
    }

    pub fn update_limit(&self, limit: &Limit) -> Result<(), StoreError> {
        self.conn.execute(
            "
            UPDATE limits
            SET category_id = ?, name = ?, max_days = ?, is_favorite = ?, interval_type = ?,
                fixed_interval = ?, running_amount = ?, running_unit = ?,
                custom_start_day = ?, custom_stop_day = ?
            WHERE id = ?
            ",
            params![
                limit.category_id.as_str(),
                limit.name,
                limit.max_days,
                limit.is_favorite,
                limit.interval_type.as_str(),
                limit.fixed_interval.map(FixedInterval::as_str),
                limit.running_amount,
                limit.running_unit.map(RunningUnit::as_str),
                limit.custom_start_day.map(Day::millis),
                limit.custom_stop_day.map(Day::millis),
                limit.id.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_limit(&self, id: &LimitId) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM limits WHERE id = ?", [id.as_str()])?;
        Ok(())
    }

    // ========== Settings ==========

    /// The last-viewed category, restored on startup.
    pub fn active_category(&self) -> Result<Option<CategoryId>, StoreError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                [ACTIVE_CATEGORY_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| match CategoryId::new(v) {
            Ok(id) => Some(id),
            Err(error) => {
                tracing::warn!(%error, "ignoring corrupt active category setting");
                None
            }
        }))
    }

    pub fn set_active_category(&self, id: &CategoryId) -> Result<(), StoreError> {
        self.conn.execute(
            "
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            params![ACTIVE_CATEGORY_KEY, id.as_str()],
        )?;
        Ok(())
    }

    pub fn clear_active_category(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM settings WHERE key = ?",
            [ACTIVE_CATEGORY_KEY],
        )?;
        Ok(())
    }
}

#[derive(Debug)]
struct LimitRow {
    id: String,
    category_id: String,
    name: String,
    max_days: u32,
    is_favorite: bool,
    interval_type: String,
    fixed_interval: Option<String>,
    running_amount: Option<u32>,
    running_unit: Option<String>,
    custom_start_day: Option<i64>,
    custom_stop_day: Option<i64>,
}

impl LimitRow {
    fn into_limit(self) -> Result<Limit, Box<dyn std::error::Error + Send + Sync>> {
        let interval_type = IntervalType::from_str(&self.interval_type)?;
        Ok(Limit {
            id: LimitId::new(self.id)?,
            category_id: CategoryId::new(self.category_id)?,
            name: self.name,
            max_days: self.max_days,
            is_favorite: self.is_favorite,
            interval_type,
            fixed_interval: self
                .fixed_interval
                .as_deref()
                .map(FixedInterval::from_str)
                .transpose()?,
            running_amount: self.running_amount,
            running_unit: self
                .running_unit
                .as_deref()
                .map(RunningUnit::from_str)
                .transpose()?,
            custom_start_day: self.custom_start_day.map(Day::from_millis),
            custom_stop_day: self.custom_stop_day.map(Day::from_millis),
        })
    }
}
