//! Core data model for the tour.
//!
//! Pages and locations, step descriptors, tour modes, and device classes.

mod device;
mod mode;
mod page;
mod step;

pub use device::{DeviceClass, Viewport};
pub use mode::{SubMode, TourMode};
pub use page::{CART_PATH, HOME_PATH, Location, MARKETPLACE_PATH, PageKey, SELLER_PATH};
pub use step::{Anchor, Placement, StepDescriptor};
