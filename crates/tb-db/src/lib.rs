//! Storage layer and timesheet engine for timebook.
//!
//! Persists tracked intervals in SQLite using `rusqlite` and enforces the
//! rules that keep each sheet's history consistent (see [`engine`]).
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Timebook runs one command per process, so a single connection is all it needs.
//!
//! # Schema
//!
//! ## `entry`
//!
//! One row per tracked interval. `start_time` and `end_time` are Unix
//! timestamps in whole seconds; a NULL `end_time` marks the running interval.
//! A partial unique index allows at most one running interval per sheet.
//! `extra` is opaque to timebook and reserved for command hooks.
//!
//! ## `meta`
//!
//! Key/value pairs. The only key is `current_sheet`, seeded with
//! [`DEFAULT_SHEET`] when the database is created.
//!
//! # Transactions
//!
//! Engine operations run on whatever transaction is open on the connection.
//! Callers wrap a whole command in [`Database::begin`] so that multi-statement
//! operations commit or roll back as a unit.

pub mod engine;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};
use tb_core::{DEFAULT_SHEET, DateRange, Entry};
use thiserror::Error;

pub use engine::{ClockIn, KillOutcome, SheetStatus};

/// Database and timesheet state errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Clock-in on a sheet that already has a running interval.
    #[error("timesheet \"{sheet}\" is already active")]
    SheetAlreadyActive { sheet: String },

    /// Clock-out or alter on a sheet without a running interval.
    #[error("timesheet \"{sheet}\" is not active")]
    SheetNotActive { sheet: String },

    /// Clock-in earlier than the sheet's last clock-out.
    #[error("time periods could end up overlapping")]
    TimeOrderingViolation { at: i64, previous_end: i64 },

    /// Clock-out earlier than the running interval's start.
    #[error("negative active time")]
    NegativeDuration { start: i64, end: i64 },

    /// Status query against a sheet with no entries at all.
    #[error("timesheet \"{sheet}\" is empty")]
    EmptySheet { sheet: String },

    /// `--resume` and an explicit description were both given.
    #[error("\"--resume\" already sets a description")]
    ConflictingDescription,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// An open transaction.
///
/// Rolls back when dropped without [`Transaction::commit`].
pub struct Transaction<'a> {
    inner: rusqlite::Transaction<'a>,
}

impl Transaction<'_> {
    /// Commits every statement run since [`Database::begin`].
    pub fn commit(self) -> Result<(), DbError> {
        self.inner.commit()?;
        Ok(())
    }

    /// Discards every statement run since [`Database::begin`].
    pub fn rollback(self) -> Result<(), DbError> {
        self.inner.rollback()?;
        Ok(())
    }
}

/// Per-sheet totals for the sheet listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    pub is_current: bool,
    /// Seconds the running interval has been open, `None` if not running.
    pub active: Option<i64>,
    /// Seconds recorded by intervals started since local midnight.
    pub today: i64,
    /// Seconds recorded by all intervals.
    pub total: i64,
}

/// A sheet with a running interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSheet {
    pub sheet: String,
    pub description: Option<String>,
}

const ENTRY_COLUMNS: &str = "id, sheet, start_time, end_time, description, extra";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entry (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sheet TEXT NOT NULL,
                start_time INTEGER NOT NULL,
                end_time INTEGER,
                description TEXT,
                extra TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_entry_sheet ON entry(sheet);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_entry_active
                ON entry(sheet) WHERE end_time IS NULL;

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('current_sheet', ?)",
            [DEFAULT_SHEET],
        )?;
        Ok(())
    }

    /// Path of the database file, if it has one.
    pub fn path(&self) -> Option<&str> {
        self.conn.path().filter(|p| !p.is_empty())
    }

    /// Begins a deferred transaction covering every following statement.
    pub fn begin(&self) -> Result<Transaction<'_>, DbError> {
        Ok(Transaction {
            inner: self.conn.unchecked_transaction()?,
        })
    }

    /// Returns the sheet commands operate on when none is named.
    pub fn current_sheet(&self) -> Result<String, DbError> {
        let sheet = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'current_sheet'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(sheet.unwrap_or_else(|| DEFAULT_SHEET.to_string()))
    }

    /// Points the current sheet at `sheet`.
    pub fn set_current_sheet(&self, sheet: &str) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO meta (key, value) VALUES ('current_sheet', ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            [sheet],
        )?;
        Ok(())
    }

    /// Counts the entries of a sheet, running or not.
    pub fn entry_count(&self, sheet: &str) -> Result<i64, DbError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM entry WHERE sheet = ?",
            [sheet],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Lists the distinct names of sheets that have entries, ascending.
    pub fn sheet_names(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT sheet FROM entry ORDER BY sheet ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Returns the running entry of a sheet, if any.
    pub fn active_entry(&self, sheet: &str) -> Result<Option<Entry>, DbError> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM entry WHERE sheet = ? AND end_time IS NULL"
                ),
                [sheet],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Returns the closed entry of a sheet with the latest end time, if any.
    pub fn last_closed_entry(&self, sheet: &str) -> Result<Option<Entry>, DbError> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "
                    SELECT {ENTRY_COLUMNS} FROM entry
                    WHERE sheet = ? AND end_time IS NOT NULL
                    ORDER BY end_time DESC, id DESC
                    LIMIT 1
                    "
                ),
                [sheet],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Inserts a running entry and returns its ID.
    pub fn insert_entry(
        &self,
        sheet: &str,
        start_time: i64,
        description: Option<&str>,
        extra: Option<&str>,
    ) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO entry (sheet, start_time, description, extra) VALUES (?, ?, ?, ?)",
            params![sheet, start_time, description, extra],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Sets the end time of an entry.
    pub fn set_end_time(&self, id: i64, end_time: i64) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE entry SET end_time = ? WHERE id = ?",
            params![end_time, id],
        )?;
        Ok(())
    }

    /// Overwrites the description of an entry.
    pub fn set_description(&self, id: i64, description: &str) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE entry SET description = ? WHERE id = ?",
            params![description, id],
        )?;
        Ok(())
    }

    /// Deletes every entry of a sheet, returning how many were removed.
    pub fn delete_sheet(&self, sheet: &str) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM entry WHERE sheet = ?", [sheet])?;
        Ok(deleted)
    }

    /// Lists a sheet's entries within `range`, oldest first.
    ///
    /// An upper bound only admits closed entries.
    pub fn list_entries(&self, sheet: &str, range: DateRange) -> Result<Vec<Entry>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {ENTRY_COLUMNS} FROM entry
            WHERE sheet = ?1
              AND (?2 IS NULL OR start_time >= ?2)
              AND (?3 IS NULL OR end_time <= ?3)
            ORDER BY start_time ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map(params![sheet, range.start, range.end], entry_from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Summarises every sheet with entries, ascending by name.
    ///
    /// Running intervals count through `now`; "today" covers intervals
    /// started at or after `day_start`.
    pub fn sheet_summaries(&self, now: i64, day_start: i64) -> Result<Vec<SheetSummary>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT
                e1.sheet,
                e1.sheet = (SELECT value FROM meta WHERE key = 'current_sheet'),
                (SELECT ?1 - e2.start_time
                 FROM entry e2
                 WHERE e2.sheet = e1.sheet AND e2.end_time IS NULL),
                (SELECT IFNULL(SUM(IFNULL(e3.end_time, ?1) - e3.start_time), 0)
                 FROM entry e3
                 WHERE e3.sheet = e1.sheet AND e3.start_time >= ?2),
                IFNULL(SUM(IFNULL(e1.end_time, ?1) - e1.start_time), 0)
            FROM entry e1
            GROUP BY e1.sheet
            ORDER BY e1.sheet ASC
            ",
        )?;
        let rows = stmt.query_map(params![now, day_start], |row| {
            Ok(SheetSummary {
                name: row.get(0)?,
                is_current: row.get(1)?,
                active: row.get(2)?,
                today: row.get(3)?,
                total: row.get(4)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Lists every sheet with a running interval, ascending by name.
    pub fn running_sheets(&self) -> Result<Vec<RunningSheet>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT sheet, description
            FROM entry
            WHERE end_time IS NULL
            ORDER BY sheet ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RunningSheet {
                sheet: row.get(0)?,
                description: row.get(1)?,
            })
        })?;
        let mut running = Vec::new();
        for row in rows {
            running.push(row?);
        }
        Ok(running)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        sheet: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        description: row.get(4)?,
        extra: row.get(5)?,
    })
}
