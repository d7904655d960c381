//! Step descriptors: the static content of a tour.

use serde::Serialize;

/// Where the overlay sits relative to its anchor.
///
/// Only the presentation shell reads this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// What a step points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// No element; the overlay is shown centered. Always resolvable.
    Centered,

    /// Comma-separated tour anchor ids. The step resolves when any of
    /// them is present.
    Candidates(&'static str),
}

impl Anchor {
    /// The individual candidate ids, trimmed. Empty for [`Anchor::Centered`].
    pub fn candidates(&self) -> impl Iterator<Item = &'static str> {
        let spec = match self {
            Self::Centered => "",
            Self::Candidates(spec) => *spec,
        };
        spec.split(',').map(str::trim).filter(|c| !c.is_empty())
    }
}

/// One instructional overlay. Immutable once built by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub anchor: Anchor,
    pub title: &'static str,
    pub body: &'static str,
    pub placement: Placement,
    pub allow_anchor_interaction: bool,
}
