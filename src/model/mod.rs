//! Data models shared by every map.

mod map_type;
mod options;
mod region;
mod visualization;

pub use map_type::MapType;
pub use options::{MapId, MapOptions, Position};
pub use region::{RegionFilterSetting, RegionLevel};
pub use visualization::{
    clamp_transparency, ColorScheme, LabelSetting, LegendSetting, VisualType,
    VisualizationSetting,
};
