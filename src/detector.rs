//! Mode detection from in-page panels.
//!
//! One snapshot routine reads the panel markers; one classification
//! routine turns a snapshot into a sub-mode. The controller runs both on
//! its poll timer and on every mutation notification.

use tracing::warn;

use crate::environment::{AnchorId, Environment, EnvironmentError};
use crate::model::SubMode;

/// Markers of an open add-product panel: its name field or its heading.
const ADD_ITEM_MARKERS: &[&str] = &["add-product-name", "add-product-heading"];

/// Marker of the selected orders tab.
const ORDERS_MARKERS: &[&str] = &["orders-tab-active"];

/// Which panels are showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSnapshot {
    pub add_item_open: bool,
    pub orders_selected: bool,
}

/// Outcome of one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// A panel is open.
    Panel(SubMode),

    /// No panel is open.
    Clear,

    /// Inspection failed; nothing should change.
    Unknown,
}

/// Reads the panel markers from `env`.
pub fn snapshot(env: &dyn Environment) -> Result<PanelSnapshot, EnvironmentError> {
    Ok(PanelSnapshot {
        add_item_open: any_present(ADD_ITEM_MARKERS, env)?,
        orders_selected: any_present(ORDERS_MARKERS, env)?,
    })
}

/// Add-item wins over orders when both are showing.
pub fn classify(snapshot: PanelSnapshot) -> Option<SubMode> {
    if snapshot.add_item_open {
        Some(SubMode::AddItem)
    } else if snapshot.orders_selected {
        Some(SubMode::OrdersManagement)
    } else {
        None
    }
}

/// Snapshot and classify in one pass. Errors become [`Detection::Unknown`].
pub fn detect(env: &dyn Environment) -> Detection {
    match snapshot(env) {
        Ok(snapshot) => classify(snapshot).map_or(Detection::Clear, Detection::Panel),
        Err(e) => {
            warn!(error = %e, "mode detection skipped");
            Detection::Unknown
        }
    }
}

fn any_present(markers: &[&str], env: &dyn Environment) -> Result<bool, EnvironmentError> {
    for marker in markers {
        let Some(id) = AnchorId::parse(marker) else {
            continue;
        };
        if env.contains(id)? {
            return Ok(true);
        }
    }
    Ok(false)
}
