//! Durable key-value storage for tour state.
//!
//! The tour keeps a couple of small string values per origin. Backends
//! implement [`KeyValueStore`]:
//!
//! - [`MemoryStore`]: in-process map, for tests and ephemeral sessions.
//! - [`SqliteStore`]: one `SQLite` file shared by all origins, one row per
//!   `(origin, key)`.

mod memory;
mod sqlite;

use std::io;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt entry: {0}")]
    Corrupt(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A string-to-string store scoped to one origin.
pub trait KeyValueStore {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Reads `key`. A missing key is `Ok(None)`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Writes `key`, replacing any existing value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Idempotent.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
