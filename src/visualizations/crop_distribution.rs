//! Crop cultivation area by region.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

/// Selected crop and survey year; `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropSelection {
    pub selected_crop: Option<String>,
    pub selected_year: Option<i32>,
}

impl Selection for CropSelection {
    fn snapshot_fragment(&self) -> String {
        format!(
            "{}/{}",
            self.selected_crop.as_deref().unwrap_or("*"),
            self.selected_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "*".to_string())
        )
    }
}

/// Cultivation area of a crop per region.
///
/// Expects records with `crop`, `year` and `area` (ha).
pub struct CropDistribution;

impl Visualization for CropDistribution {
    type Selection = CropSelection;
    const KIND: &'static str = "crop-distribution";
    const DISPLAY_NAME: &'static str = "작물 재배 분포";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("지역별 작물 재배 면적")
            .unit("ha")
            .endpoint("/api/crops/distribution")
    }

    fn render_map(view: &MapView<'_, CropSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "crop", selection.selected_crop.as_deref()))
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        let level = view.fields.region_filter.level;
        LayerSpec::from_values(view, data::sum_by_region(&records, level, "area"))
    }

    fn render_chart(view: &MapView<'_, CropSelection>, data: Option<&Value>) -> ChartSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        ChartSpec::from_pairs(
            view,
            ChartType::Bar,
            "재배 면적",
            data::sum_by(&records, "crop", "area"),
        )
    }
}

impl MapState<CropDistribution> {
    pub fn selected_crop(&self) -> Option<String> {
        self.selection().selected_crop
    }

    pub fn set_selected_crop(&self, crop: Option<String>) {
        self.update_selection(|s| s.selected_crop = crop);
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
    use crate::model::{RegionFilterSetting, RegionLevel};
    use crate::state::MapInstance;
    use serde_json::json;

    fn fixture() -> Value {
        json!([
            { "city": "제주시", "township": "구좌읍", "crop": "당근", "year": 2023, "area": 1200 },
            { "city": "제주시", "township": "구좌읍", "crop": "감자", "year": 2023, "area": 300 },
            { "city": "제주시", "township": "애월읍", "crop": "당근", "year": 2023, "area": 150 },
            { "city": "제주시", "township": "일도1동", "crop": "당근", "year": 2023, "area": 5 },
            { "city": "서귀포시", "township": "성산읍", "crop": "당근", "year": 2022, "area": 400 }
        ])
    }

    #[test]
    fn test_map_filters_by_crop_and_year() {
        let map = MapState::<CropDistribution>::with_defaults();
        map.set_selected_crop(Some("당근".to_string()));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        let regions: Vec<_> = layer.features.iter().map(|f| f.region.as_str()).collect();
        assert_eq!(regions, vec!["구좌읍", "애월읍", "일도1동"]);
        assert_eq!(layer.features[0].value, 1200.0);
        assert_eq!(layer.unit.as_deref(), Some("ha"));
    }

    #[test]
    fn test_exclude_dong_and_region_filter() {
        let map = MapState::<CropDistribution>::with_defaults();
        map.set_selected_crop(Some("당근".to_string()));
        map.set_exclude_dong(true);

        let mut filter = RegionFilterSetting::new(RegionLevel::Township);
        filter.city = Some("제주시".to_string());
        map.set_region_filter_setting(filter);

        let data = fixture();
        let layer = map.render_map(Some(&data));
        let regions: Vec<_> = layer.features.iter().map(|f| f.region.as_str()).collect();
        assert_eq!(regions, vec!["구좌읍", "애월읍"]);
    }

    #[test]
    fn test_city_level_aggregates() {
        let map = MapState::<CropDistribution>::with_defaults();
        map.set_selected_region_level(RegionLevel::City);
        map.set_selected_crop(Some("당근".to_string()));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].region, "서귀포시");
        assert_eq!(layer.features[1].value, 1355.0);
    }

    #[test]
    fn test_chart_groups_by_crop() {
        let map = MapState::<CropDistribution>::with_defaults();
        map.set_selected_year(Some(2023));

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(chart.categories, vec!["감자".to_string(), "당근".to_string()]);
        assert_eq!(chart.series[0].values, vec![300.0, 1355.0]);
    }

    #[test]
    fn test_selection_is_shared() {
        let map = MapState::<CropDistribution>::with_defaults();
        map.set_selected_crop(Some("감자".to_string()));

        let state = map.shareable_state();
        assert_eq!(state["selectedCrop"], json!("감자"));
        assert_eq!(state["selectedYear"], Value::Null);

        let other = MapState::<CropDistribution>::with_defaults();
        other.apply_shared_state(&state);
        assert_eq!(other.selected_crop().as_deref(), Some("감자"));
        assert_eq!(other.shareable_state(), state);
    }

    #[test]
    fn test_snapshot_fragment() {
        let map = MapState::<CropDistribution>::with_defaults();
        assert!(map.snapshot().ends_with(":*/*"));
        map.set_selected_year(Some(2021));
        assert!(map.snapshot().ends_with(":*/2021"));
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<CropDistribution>::with_defaults();
        let before = map.snapshot();
        map.set_selected_crop(Some("당근".to_string()));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
    }
}
