//! agrimap - map state for an agricultural statistics dashboard
//!
//! Every visualization on a dashboard page is a map/chart pair backed by an
//! observable [`MapState`]: region filter, legend and display settings plus
//! the visualization's own selection (crop, year, disaster category, ...).
//! Renderers subscribe to a map and re-render when its snapshot changes, and
//! a map's shareable state round-trips through a compressed URL token.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod render;
pub mod session;
pub mod share;
pub mod state;
pub mod visualizations;

mod color_utils;

pub use config::{ConfigError, DashboardConfig, LogLevel};
pub use dashboard::{Dashboard, DashboardError};
pub use share::ShareError;
pub use state::{MapInstance, MapList, MapState};
pub use visualizations::{Visualization, VisualizationRegistry};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
