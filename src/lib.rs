//! Guided-tour engine for the campus marketplace storefront.
//!
//! Decides, per page and per user action, which onboarding steps to show,
//! switches to panel-specific steps when the seller opens the add-product
//! form or the orders tab, chains the tour across the main pages, and
//! remembers when the user has finished it.
//!
//! The engine never touches a real page, clock, or browser store. The host
//! supplies an [`Environment`](environment::Environment) for element
//! lookups, a [`KeyValueStore`](storage::KeyValueStore) for persistence,
//! and elapsed time; it gets back a [`TourView`](view::TourView) to render
//! and [`Effect`](controller::Effect)s to carry out.

pub mod config;
pub mod controller;
pub mod detector;
pub mod environment;
pub mod model;
pub mod persistence;
pub mod registry;
pub mod resolver;
pub mod schedule;
pub mod storage;
pub mod view;

pub use config::Config;
pub use controller::{Effect, Phase, TourController};
pub use environment::{Environment, StaticEnvironment};
pub use view::TourView;
