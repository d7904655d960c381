//! Scripted replay of a tour session.
//!
//! A script is a starting path, a viewport, and a list of host events. The
//! runner feeds each event to a [`TourController`] and writes one JSON line
//! per event describing what the tour is showing afterwards.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tourguide::controller::{Effect, TourController};
use tourguide::environment::StaticEnvironment;
use tourguide::model::Viewport;
use tourguide::storage::KeyValueStore;
use tourguide::{Config, TourView};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

/// A recorded host session.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub viewport: Viewport,

    #[serde(default = "default_start")]
    pub start: String,

    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

fn default_start() -> String {
    "/".to_string()
}

/// One thing the host does.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ScriptEvent {
    /// The user navigated.
    Navigate { to: String },

    /// Time passes.
    Wait { ms: u64 },

    /// The page's content changed. Replaces the whole environment.
    Environment(StaticEnvironment),

    /// The viewport changed.
    Resize { viewport: Viewport },

    Next,
    Back,
    Skip,
    Reset,
    Unmount,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One output line.
#[derive(Serialize)]
struct Frame<'a> {
    event: usize,
    path: &'a str,
    view: TourView<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<bool>,
}

/// Plays `script` against a fresh controller over `store`.
///
/// Navigation requested by the tour is followed immediately, the way a
/// router would. Returns the controller so callers can inspect the end state.
pub fn replay<S: KeyValueStore, W: Write>(
    config: &Config,
    store: S,
    script: &Script,
    out: &mut W,
) -> Result<TourController<S>, ScriptError> {
    let mut env = StaticEnvironment::new();
    let mut tour = TourController::mount(config.clone(), store, &script.start, script.viewport);

    for (i, event) in script.events.iter().enumerate() {
        let mut accepted = None;
        let effects = match event {
            ScriptEvent::Navigate { to } => {
                tour.navigate(to);
                Vec::new()
            }
            ScriptEvent::Wait { ms } => {
                tour.advance_time(Duration::from_millis(*ms), &env);
                Vec::new()
            }
            ScriptEvent::Environment(next) => {
                env = next.clone();
                tour.environment_mutated(&env);
                Vec::new()
            }
            ScriptEvent::Resize { viewport } => {
                tour.resize(*viewport);
                Vec::new()
            }
            ScriptEvent::Next => tour.next(&env),
            ScriptEvent::Back => {
                tour.back();
                Vec::new()
            }
            ScriptEvent::Skip => tour.skip(),
            ScriptEvent::Reset => {
                accepted = Some(tour.reset());
                Vec::new()
            }
            ScriptEvent::Unmount => tour.unmount(),
        };

        for effect in &effects {
            if let Effect::Navigate(path) = effect {
                tour.navigate(path);
            }
        }

        let frame = Frame {
            event: i,
            path: tour.path(),
            view: tour.view(),
            effects,
            accepted,
        };
        serde_json::to_writer(&mut *out, &frame)?;
        writeln!(out)?;
    }

    Ok(tour)
}
