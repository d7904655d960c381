//! `SQLite`-backed store.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use super::{KeyValueStore, Result};

/// A store persisted in a `SQLite` file, scoped to one origin.
pub struct SqliteStore {
    conn: Connection,
    origin: String,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` for `origin`.
    ///
    /// Parent directories are created if they don't exist.
    pub fn open(path: impl AsRef<Path>, origin: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                origin TEXT NOT NULL,
                key    TEXT NOT NULL,
                value  TEXT NOT NULL,
                PRIMARY KEY (origin, key)
            );",
        )?;
        Ok(Self {
            conn,
            origin: origin.into(),
        })
    }

    /// Returns the default database path: `~/.tourguide/store.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tourguide").join("store.sqlite"))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl KeyValueStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM items WHERE origin = ?1 AND key = ?2",
                rusqlite::params![&self.origin, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO items (origin, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (origin, key) DO UPDATE SET value = excluded.value",
            rusqlite::params![&self.origin, key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM items WHERE origin = ?1 AND key = ?2",
            rusqlite::params![&self.origin, key],
        )?;
        Ok(())
    }
}
