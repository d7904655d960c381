//! The rendered environment the tour inspects.
//!
//! Steps point at stable tour anchor ids that the presentation layer
//! attaches to its elements. The host answers lookups through the
//! [`Environment`] trait; [`StaticEnvironment`] is a plain in-memory
//! implementation used by tests and script replay.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Longest accepted anchor id.
const MAX_ANCHOR_LEN: usize = 64;

/// Errors an environment may report while inspecting elements.
///
/// The tour never propagates these; a failed lookup counts as "not found".
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("inspection failed for `{anchor}`: {reason}")]
    Inspection { anchor: String, reason: String },

    #[error("environment unavailable: {0}")]
    Unavailable(String),
}

/// A validated tour anchor id: ASCII alphanumerics, `-` and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId<'a>(&'a str);

impl<'a> AnchorId<'a> {
    /// Returns `None` for anything that isn't a well-formed id.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ANCHOR_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then_some(Self(raw))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

/// Lookups the tour needs from the rendered page.
pub trait Environment {
    /// Whether a live element currently carries `anchor`.
    fn contains(&self, anchor: AnchorId<'_>) -> Result<bool, EnvironmentError>;

    /// Path of the first item rendered in a listing, if any.
    fn first_item_path(&self) -> Option<String>;
}

/// An environment held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEnvironment {
    /// Anchor ids currently present.
    #[serde(default)]
    pub present: BTreeSet<String>,

    /// Item detail paths in listing order.
    #[serde(default)]
    pub items: Vec<String>,

    /// Anchor ids whose lookup fails.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub failing: BTreeSet<String>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an environment with the given anchors present.
    pub fn with_anchors<'a>(anchors: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            present: anchors.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, anchor: &str) {
        self.present.insert(anchor.to_string());
    }

    pub fn remove(&mut self, anchor: &str) {
        self.present.remove(anchor);
    }

    pub fn push_item(&mut self, path: impl Into<String>) {
        self.items.push(path.into());
    }

    /// Makes every lookup of `anchor` fail.
    pub fn fail_on(&mut self, anchor: &str) {
        self.failing.insert(anchor.to_string());
    }
}

impl Environment for StaticEnvironment {
    fn contains(&self, anchor: AnchorId<'_>) -> Result<bool, EnvironmentError> {
        if self.failing.contains(anchor.as_str()) {
            return Err(EnvironmentError::Inspection {
                anchor: anchor.as_str().to_string(),
                reason: "lookup failed".into(),
            });
        }
        Ok(self.present.contains(anchor.as_str()))
    }

    fn first_item_path(&self) -> Option<String> {
        self.items.first().cloned()
    }
}
