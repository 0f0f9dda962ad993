//! Render glue between map stores and the external map/chart renderers.
//!
//! Nothing here draws pixels. Render delegates turn a map's state plus the
//! fetched statistics into [`LayerSpec`] / [`ChartSpec`] descriptors that the
//! mapping toolkit and charting library consume.

mod binding;
pub mod data;
mod legend;
mod spec;

pub use binding::{RenderBinding, RenderOutput};
pub use legend::{Legend, LegendClass};
pub use spec::{format_value, ChartSpec, ChartType, FeatureStyle, LayerSpec, Series};
