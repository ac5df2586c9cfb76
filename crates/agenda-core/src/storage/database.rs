//! SQLite-backed local storage.
//!
//! One database file holds:
//! - The `todos` table (see [`super::tasks`])
//! - The `events` table (see [`super::events`])
//! - A `prefs` key-value table for install-local preferences

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError};

const DATABASE_FILE: &str = "agenda.db";

/// Local SQLite database for tasks, events and preferences.
pub struct Database {
    pub(super) conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/agenda.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join(DATABASE_FILE);
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    /// Get a preference value.
    pub fn pref_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM prefs WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a preference value, replacing any previous one.
    pub fn pref_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a preference. Returns whether it existed.
    pub fn pref_delete(&self, key: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM prefs WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}
