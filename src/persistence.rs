//! Tour progress persisted across sessions.
//!
//! Two keys in the origin's [`KeyValueStore`]:
//!
//! ```text
//! tutorial_completed   "true" | "false"
//! tutorial_progress    JSON ProgressSnapshot of the last active step
//! ```
//!
//! Nothing here fails outward. A read failure reads as "not completed"
//! and a failed write is dropped with a warning, so the tour degrades to
//! running every session rather than breaking the host.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{PageKey, TourMode};
use crate::storage::{self, KeyValueStore, StorageError};

pub const COMPLETED_KEY: &str = "tutorial_completed";
pub const PROGRESS_KEY: &str = "tutorial_progress";

/// Where the user last was in a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub path: String,
    pub page: PageKey,
    pub mode: TourMode,
    pub step_index: usize,
    pub saved_at: Timestamp,
}

/// Everything read back at mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedProgress {
    pub completed: bool,
    pub progress: Option<ProgressSnapshot>,
}

/// Reads and writes tour state through a store.
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads both keys, treating any failure as absent.
    pub fn load(&self) -> PersistedProgress {
        let completed = match self.try_load_completed() {
            Ok(completed) => completed,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "reading completion flag failed");
                false
            }
        };
        let progress = match self.try_load_progress() {
            Ok(progress) => progress,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "reading progress failed");
                None
            }
        };
        PersistedProgress {
            completed,
            progress,
        }
    }

    /// Writes the completion flag.
    pub fn save(&mut self, completed: bool) {
        let value = if completed { "true" } else { "false" };
        if let Err(e) = self.store.set_item(COMPLETED_KEY, value) {
            warn!(store = self.store.name(), error = %e, "writing completion flag failed");
        }
    }

    pub fn save_progress(&mut self, snapshot: &ProgressSnapshot) {
        let result = serde_json::to_string(snapshot)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set_item(PROGRESS_KEY, &json));
        if let Err(e) = result {
            warn!(store = self.store.name(), error = %e, "writing progress failed");
        }
    }

    pub fn clear_progress(&mut self) {
        if let Err(e) = self.store.remove_item(PROGRESS_KEY) {
            warn!(store = self.store.name(), error = %e, "clearing progress failed");
        }
    }

    /// Clears both keys.
    pub fn reset(&mut self) {
        if let Err(e) = self.try_reset() {
            warn!(store = self.store.name(), error = %e, "resetting tour state failed");
        }
    }

    /// Clears both keys, reporting the first failure.
    pub fn try_reset(&mut self) -> storage::Result<()> {
        self.store.remove_item(COMPLETED_KEY)?;
        self.store.remove_item(PROGRESS_KEY)?;
        Ok(())
    }

    /// Reads the completion flag, reporting failures.
    ///
    /// Anything other than `"true"` reads as not completed.
    pub fn try_load_completed(&self) -> storage::Result<bool> {
        Ok(self.store.get_item(COMPLETED_KEY)?.as_deref() == Some("true"))
    }

    /// Reads the progress snapshot, reporting failures.
    pub fn try_load_progress(&self) -> storage::Result<Option<ProgressSnapshot>> {
        let Some(json) = self.store.get_item(PROGRESS_KEY)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&json)
            .map_err(|e| StorageError::Corrupt(format!("invalid {PROGRESS_KEY}: {e}")))?;
        Ok(Some(snapshot))
    }
}
