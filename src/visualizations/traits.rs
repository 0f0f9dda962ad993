//! Trait definitions for visualization variants.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::model::MapOptions;
use crate::render::{ChartSpec, LayerSpec};
use crate::state::MapView;

/// Variant-specific selection fields of a map (selected crop, year, ...).
///
/// The serialized form is flattened into the map's shareable state, so
/// field names must not collide with `mapType`, `regionFilterSetting` or
/// `visualizationSetting`. Every field must always serialize (no
/// `skip_serializing_if`): keys missing from the serialized form cannot be
/// restored from a shared link.
pub trait Selection:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + 'static
{
    /// Text folded into the map snapshot.
    fn snapshot_fragment(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A concrete visualization (crop distribution, disaster info, ...).
///
/// Implementors are marker types. `MapState<V>` supplies the shared state
/// and observable-store behaviour; the variant supplies its selection
/// payload and the two render delegates. Adding a visualization means
/// implementing this trait and registering it in the
/// [`VisualizationRegistry`](super::VisualizationRegistry).
pub trait Visualization: 'static {
    /// Extra selection fields of this visualization.
    type Selection: Selection;

    /// Unique identifier (e.g. "crop-distribution").
    const KIND: &'static str;

    /// Human-readable name for UI display.
    const DISPLAY_NAME: &'static str;

    /// Options used when a page does not supply its own.
    fn default_options() -> MapOptions;

    /// Build the map layer description from fetched data.
    ///
    /// `data` is whatever the statistics API returned; `None` means the
    /// fetch has not completed (or failed) and must render an empty layer.
    fn render_map(view: &MapView<'_, Self::Selection>, data: Option<&Value>) -> LayerSpec;

    /// Build the companion chart description from fetched data.
    fn render_chart(view: &MapView<'_, Self::Selection>, data: Option<&Value>) -> ChartSpec;
}
