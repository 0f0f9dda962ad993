//! Agricultural disaster damage by region.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

/// Disaster category as reported by the damage survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisasterCategory {
    #[serde(rename = "태풍")]
    Typhoon,
    #[serde(rename = "호우")]
    HeavyRain,
    #[serde(rename = "가뭄")]
    Drought,
    #[serde(rename = "한파")]
    ColdWave,
    #[serde(rename = "대설")]
    HeavySnow,
    #[serde(rename = "우박")]
    Hail,
}

impl DisasterCategory {
    /// Name used in records and in the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            DisasterCategory::Typhoon => "태풍",
            DisasterCategory::HeavyRain => "호우",
            DisasterCategory::Drought => "가뭄",
            DisasterCategory::ColdWave => "한파",
            DisasterCategory::HeavySnow => "대설",
            DisasterCategory::Hail => "우박",
        }
    }

    pub fn all() -> &'static [DisasterCategory] {
        &[
            DisasterCategory::Typhoon,
            DisasterCategory::HeavyRain,
            DisasterCategory::Drought,
            DisasterCategory::ColdWave,
            DisasterCategory::HeavySnow,
            DisasterCategory::Hail,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisasterSelection {
    pub disaster_category: Option<DisasterCategory>,
    pub selected_year: Option<i32>,
}

impl Selection for DisasterSelection {}

/// Damaged area per region for a disaster category.
///
/// Expects records with `disaster`, `year` and `damage` (ha).
pub struct DisasterInfo;

impl Visualization for DisasterInfo {
    type Selection = DisasterSelection;
    const KIND: &'static str = "disaster-info";
    const DISPLAY_NAME: &'static str = "농업 재해 현황";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("재해 유형별 피해 면적")
            .unit("ha")
            .endpoint("/api/disasters")
    }

    fn render_map(view: &MapView<'_, DisasterSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let category = selection.disaster_category.map(|c| c.name());
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "disaster", category))
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        let level = view.fields.region_filter.level;
        LayerSpec::from_values(view, data::sum_by_region(&records, level, "damage"))
    }

    /// Yearly damage trend of the selected category.
    fn render_chart(view: &MapView<'_, DisasterSelection>, data: Option<&Value>) -> ChartSpec {
        let category = view.selection().disaster_category.map(|c| c.name());
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "disaster", category))
            .collect();

        ChartSpec::from_pairs(
            view,
            ChartType::Line,
            category.unwrap_or("전체 재해"),
            data::sum_by(&records, "year", "damage"),
        )
    }
}

impl MapState<DisasterInfo> {
    pub fn disaster_category(&self) -> Option<DisasterCategory> {
        self.selection().disaster_category
    }

    pub fn set_disaster_category(&self, category: Option<DisasterCategory>) {
        self.update_selection(|s| s.disaster_category = category);
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
        json!({
            "data": [
                { "township": "한경면", "disaster": "태풍", "year": 2022, "damage": 40.5 },
                { "township": "한경면", "disaster": "태풍", "year": 2023, "damage": 10 },
                { "township": "표선면", "disaster": "가뭄", "year": 2023, "damage": 80 },
                { "township": "표선면", "disaster": "태풍", "year": 2023, "damage": 2 }
            ]
        })
    }

    #[test]
    fn test_category_serializes_to_korean() {
        assert_eq!(serde_json::to_value(DisasterCategory::ColdWave).unwrap(), json!("한파"));
        assert!(DisasterCategory::all()
            .iter()
            .all(|c| serde_json::to_value(c).unwrap() == json!(c.name())));
    }

    #[test]
    fn test_map_by_category_and_year() {
        let map = MapState::<DisasterInfo>::with_defaults();
        map.set_disaster_category(Some(DisasterCategory::Typhoon));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].region, "표선면");
        assert_eq!(layer.features[0].value, 2.0);
        assert_eq!(layer.features[1].value, 10.0);
    }

    #[test]
    fn test_chart_is_yearly_trend() {
        let map = MapState::<DisasterInfo>::with_defaults();
        map.set_disaster_category(Some(DisasterCategory::Typhoon));

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(chart.chart_type, ChartType::Line);
        assert_eq!(chart.categories, vec!["2022".to_string(), "2023".to_string()]);
        assert_eq!(chart.series[0].name, "태풍");
        assert_eq!(chart.series[0].values, vec![40.5, 12.0]);
    }

    #[test]
    fn test_unknown_category_in_link_is_ignored() {
        let map = MapState::<DisasterInfo>::with_defaults();
        map.set_disaster_category(Some(DisasterCategory::Hail));
        map.apply_shared_state(&json!({ "disasterCategory": "지진", "selectedYear": 2020 }));

        assert_eq!(map.disaster_category(), Some(DisasterCategory::Hail));
        assert_eq!(map.selected_year(), Some(2020));
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<DisasterInfo>::with_defaults();
        let before = map.snapshot();
        map.set_disaster_category(Some(DisasterCategory::ColdWave));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
        assert_eq!(map.selected_year(), Some(2022));
    }
}
