//! Mandarin cultivation by variety and cultivation type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CultivationType {
    #[serde(rename = "노지")]
    OpenField,
    #[serde(rename = "시설")]
    Greenhouse,
}

impl CultivationType {
    pub fn name(&self) -> &'static str {
        match self {
            CultivationType::OpenField => "노지",
            CultivationType::Greenhouse => "시설",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MandarinSelection {
    pub selected_variety: Option<String>,
    pub cultivation_type: Option<CultivationType>,
    pub selected_year: Option<i32>,
}

impl Selection for MandarinSelection {}

/// Mandarin cultivation area per region.
///
/// Expects records with `variety`, `cultivation`, `year` and `area` (ha).
pub struct MandarinCultivation;

impl MandarinCultivation {
    fn select<'a>(
        view: &MapView<'_, MandarinSelection>,
        data: Option<&'a Value>,
        by_variety: bool,
    ) -> Vec<&'a data::Record> {
        let selection = view.selection();
        let variety = if by_variety {
            selection.selected_variety.as_deref()
        } else {
            None
        };
        let cultivation = selection.cultivation_type.map(|c| c.name());

        data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "variety", variety))
            .filter(|r| matches(r, "cultivation", cultivation))
            .filter(|r| matches_year(r, selection.selected_year))
            .collect()
    }
}

impl Visualization for MandarinCultivation {
    type Selection = MandarinSelection;
    const KIND: &'static str = "mandarin-cultivation";
    const DISPLAY_NAME: &'static str = "감귤 재배 현황";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("품종 및 재배 형태별 감귤 재배 면적")
            .unit("ha")
            .endpoint("/api/mandarin/cultivation")
    }

    fn render_map(view: &MapView<'_, MandarinSelection>, data: Option<&Value>) -> LayerSpec {
        let records = Self::select(view, data, true);
        let level = view.fields.region_filter.level;
        LayerSpec::from_values(view, data::sum_by_region(&records, level, "area"))
    }

    /// Variety mix of the current scope; the variety selection is ignored.
    fn render_chart(view: &MapView<'_, MandarinSelection>, data: Option<&Value>) -> ChartSpec {
        let records = Self::select(view, data, false);
        ChartSpec::from_pairs(
            view,
            ChartType::Pie,
            "품종별 면적",
            data::sum_by(&records, "variety", "area"),
        )
    }
}

impl MapState<MandarinCultivation> {
    pub fn selected_variety(&self) -> Option<String> {
        self.selection().selected_variety
    }

    pub fn set_selected_variety(&self, variety: Option<String>) {
        self.update_selection(|s| s.selected_variety = variety);
    }

    pub fn cultivation_type(&self) -> Option<CultivationType> {
        self.selection().cultivation_type
    }

    pub fn set_cultivation_type(&self, cultivation: Option<CultivationType>) {
        self.update_selection(|s| s.cultivation_type = cultivation);
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selection().selected_year
    }

    pub fn set_selected_year(&self, year: Option<i32>) {
        self.update_selection(|s| s.selected_year = year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MapInstance;
    use serde_json::json;

    fn fixture() -> Value {
        json!([
            { "township": "남원읍", "variety": "온주", "cultivation": "노지", "year": 2023, "area": 900 },
            { "township": "남원읍", "variety": "한라봉", "cultivation": "시설", "year": 2023, "area": 120 },
            { "township": "효돈동", "variety": "온주", "cultivation": "노지", "year": 2023, "area": 300 },
            { "township": "효돈동", "variety": "천혜향", "cultivation": "시설", "year": 2023, "area": 60 },
            { "township": "남원읍", "variety": "온주", "cultivation": "노지", "year": 2022, "area": 950 }
        ])
    }

    #[test]
    fn test_map_by_variety_and_type() {
        let map = MapState::<MandarinCultivation>::with_defaults();
        map.set_selected_variety(Some("온주".to_string()));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].value, 900.0);

        map.set_cultivation_type(Some(CultivationType::Greenhouse));
        assert!(map.render_map(Some(&data)).is_empty());
    }

    #[test]
    fn test_chart_is_variety_mix() {
        let map = MapState::<MandarinCultivation>::with_defaults();
        map.set_selected_variety(Some("온주".to_string()));
        map.set_cultivation_type(Some(CultivationType::Greenhouse));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(chart.chart_type, ChartType::Pie);
        assert_eq!(chart.categories, vec!["천혜향".to_string(), "한라봉".to_string()]);
        assert_eq!(chart.series[0].values, vec![60.0, 120.0]);
    }

    #[test]
    fn test_exclude_dong() {
        let map = MapState::<MandarinCultivation>::with_defaults();
        map.set_selected_year(Some(2023));
        map.set_exclude_dong(true);

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 1);
        assert_eq!(layer.features[0].region, "남원읍");
    }

    #[test]
    fn test_partial_link() {
        let map = MapState::<MandarinCultivation>::with_defaults();
        map.set_selected_variety(Some("한라봉".to_string()));
        map.apply_shared_state(&json!({ "cultivationType": "시설" }));

        assert_eq!(map.cultivation_type(), Some(CultivationType::Greenhouse));
        assert_eq!(map.selected_variety().as_deref(), Some("한라봉"));
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<MandarinCultivation>::with_defaults();
        let before = map.snapshot();
        map.set_selected_variety(Some("한라봉".to_string()));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_cultivation_type(Some(CultivationType::Greenhouse));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
        assert_eq!(map.selected_year(), Some(2022));
    }
}
