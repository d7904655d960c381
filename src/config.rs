//! Tourguide configuration.
//!
//! Loaded from `~/.tourguide/config.toml`. A missing file means defaults.
//! `TOURGUIDE_DEBUG=1` in the environment turns on the debug reset
//! regardless of the file.

use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::model::{DeviceClass, Viewport};
use crate::storage::SqliteStore;

/// Env var that force-enables the debug reset.
pub const DEBUG_ENV: &str = "TOURGUIDE_DEBUG";

/// Tour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Master switch for the tour feature.
    pub enabled: bool,

    /// Delay after navigation before the page is checked for tour anchors.
    pub settle_delay_ms: u64,

    /// Cadence of the sub-mode panel check.
    pub poll_interval_ms: u64,

    /// Delay before the page tour resumes after a sub-mode ends.
    pub resume_delay_ms: u64,

    /// Viewports at most this wide are compact.
    pub compact_max_width: u32,

    /// Touch viewports at most this wide are compact.
    pub touch_compact_max_width: u32,

    /// Allow the debug reset without the query flag.
    pub debug: bool,

    /// Query parameter that enables the debug reset for a session.
    pub debug_query_param: String,

    /// `SQLite` store location. Defaults to `~/.tourguide/store.sqlite`.
    pub store: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            settle_delay_ms: 900,
            poll_interval_ms: 500,
            resume_delay_ms: 500,
            compact_max_width: 768,
            touch_compact_max_width: 1024,
            debug: false,
            debug_query_param: "tour_debug".to_string(),
            store: None,
        }
    }
}

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load config from `~/.tourguide/config.toml`, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::path() {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        config.apply_debug_override(env::var(DEBUG_ENV).ok().as_deref());
        Ok(config)
    }

    /// Load config from `path`. A missing file yields defaults.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config: Self = match toml::from_str(&contents) {
            Ok(config) => config,
            Err(source) => return Err(ConfigError::Parse { path, source }),
        };
        config.validate()?;
        Ok(config)
    }

    /// The config file path: `~/.tourguide/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tourguide").join("config.toml"))
    }

    /// The `SQLite` store path: configured, or the default under home.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.clone().or_else(SqliteStore::default_path)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn device_class(&self, viewport: Viewport) -> DeviceClass {
        DeviceClass::classify(
            viewport,
            self.compact_max_width,
            self.touch_compact_max_width,
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll-interval-ms must be positive".into()));
        }
        if self.debug_query_param.is_empty() {
            return Err(ConfigError::Invalid("debug-query-param is empty".into()));
        }
        Ok(())
    }

    fn apply_debug_override(&mut self, value: Option<&str>) {
        if matches!(value, Some("1" | "true")) {
            self.debug = true;
        }
    }
}
