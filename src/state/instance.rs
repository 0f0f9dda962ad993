//! The capability interface every map exposes.

use agrimap_store::{Listener, Subscription};
use serde_json::Value;

use crate::model::{
    clamp_transparency, LabelSetting, LegendSetting, MapId, MapOptions, MapType,
    RegionFilterSetting, RegionLevel, VisualType, VisualizationSetting,
};
use crate::render::{ChartSpec, LayerSpec};

/// One visualization's observable configuration.
///
/// Generic machinery (map lists, the share-link codec, render bindings) only
/// talks to maps through this trait, so any visualization can stand in for
/// any other. The trait is object safe; heterogeneous collections hold
/// `Rc<dyn MapInstance>`.
///
/// Every setter mutates, bumps the revision and notifies listeners
/// synchronously, even when the new value equals the old one.
pub trait MapInstance {
    /// Identifier assigned at construction.
    fn id(&self) -> &MapId;

    /// Registry id of the visualization (e.g. `"crop-distribution"`).
    fn kind(&self) -> &'static str;

    /// Options fixed at construction.
    fn options(&self) -> &MapOptions;

    /// Monotonic mutation counter.
    fn revision(&self) -> u64;

    /// Opaque value that changes whenever observable state changes.
    fn snapshot(&self) -> String;

    /// Register a change listener.
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// Drop every listener. Safe to call more than once.
    fn destroy(&self);

    fn region_filter_setting(&self) -> RegionFilterSetting;

    fn set_region_filter_setting(&self, setting: RegionFilterSetting);

    fn visualization_setting(&self) -> VisualizationSetting;

    /// Replace the visualization settings; ranged fields are clamped.
    fn set_visualization_setting(&self, setting: VisualizationSetting);

    fn map_type(&self) -> MapType;

    fn set_map_type(&self, map_type: MapType);

    /// Whether urban neighbourhoods (동) are hidden.
    fn exclude_dong(&self) -> bool;

    fn set_exclude_dong(&self, exclude: bool);

    /// JSON-serializable subset of the state reproduced by share links.
    fn shareable_state(&self) -> Value;

    /// Apply the keys present in `state`, leave the rest untouched and
    /// notify exactly once.
    fn apply_shared_state(&self, state: &Value);

    /// Describe the map layer for the mapping toolkit.
    fn render_map(&self, data: Option<&Value>) -> LayerSpec;

    /// Describe the companion chart.
    fn render_chart(&self, data: Option<&Value>) -> ChartSpec;

    fn selected_region_level(&self) -> RegionLevel {
        self.region_filter_setting().level
    }

    /// Change the region level only. Dependent fields are not revalidated.
    fn set_selected_region_level(&self, level: RegionLevel) {
        let mut setting = self.region_filter_setting();
        setting.level = level;
        self.set_region_filter_setting(setting);
    }

    fn set_legend(&self, legend: LegendSetting) {
        let mut setting = self.visualization_setting();
        setting.legend = legend;
        self.set_visualization_setting(setting);
    }

    fn set_visual_type(&self, visual_type: VisualType) {
        let mut setting = self.visualization_setting();
        setting.visual_type = visual_type;
        self.set_visualization_setting(setting);
    }

    fn set_labels(&self, labels: LabelSetting) {
        let mut setting = self.visualization_setting();
        setting.labels = labels;
        self.set_visualization_setting(setting);
    }

    fn set_transparency(&self, transparency: f64) {
        let mut setting = self.visualization_setting();
        setting.transparency = clamp_transparency(transparency);
        self.set_visualization_setting(setting);
    }
}
