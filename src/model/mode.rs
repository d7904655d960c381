//! Tour modes and in-page sub-modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which step list the tour is drawing from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TourMode {
    /// The page's own step list.
    #[default]
    Normal,

    /// The seller's add-product panel is open.
    AddItem,

    /// The seller's orders tab is selected.
    OrdersManagement,

    /// Generic steps, used when none of the page's anchors resolve.
    Fallback,
}

impl TourMode {
    /// The sub-mode this mode represents, if any.
    pub fn sub_mode(self) -> Option<SubMode> {
        match self {
            Self::AddItem => Some(SubMode::AddItem),
            Self::OrdersManagement => Some(SubMode::OrdersManagement),
            Self::Normal | Self::Fallback => None,
        }
    }

    pub fn is_sub_mode(self) -> bool {
        self.sub_mode().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AddItem => "add-item",
            Self::OrdersManagement => "orders-management",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contextual variant triggered by an in-page panel rather than navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubMode {
    AddItem,
    OrdersManagement,
}

impl From<SubMode> for TourMode {
    fn from(sub: SubMode) -> Self {
        match sub {
            SubMode::AddItem => Self::AddItem,
            SubMode::OrdersManagement => Self::OrdersManagement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_modes_round_trip_through_tour_mode() {
        for sub in [SubMode::AddItem, SubMode::OrdersManagement] {
            assert_eq!(TourMode::from(sub).sub_mode(), Some(sub));
        }
        assert!(!TourMode::Normal.is_sub_mode());
        assert!(!TourMode::Fallback.is_sub_mode());
    }
}
