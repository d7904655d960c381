//! Viewport and device class.

use serde::{Deserialize, Serialize};

/// The host's viewport as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    #[serde(default)]
    pub touch: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            touch: false,
        }
    }
}

/// Selects alternate anchors and placements in the step registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    #[default]
    Standard,
    Compact,
}

impl DeviceClass {
    /// Narrow viewports are compact. Touch viewports are compact up to the
    /// wider `touch_compact_max_width`.
    pub fn classify(viewport: Viewport, compact_max_width: u32, touch_compact_max_width: u32) -> Self {
        let limit = if viewport.touch {
            compact_max_width.max(touch_compact_max_width)
        } else {
            compact_max_width
        };
        if viewport.width <= limit {
            Self::Compact
        } else {
            Self::Standard
        }
    }
}
