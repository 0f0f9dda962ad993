//! Groundwater quality by region.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

/// Measured water quality item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QualityItem {
    #[default]
    #[serde(rename = "질산성질소")]
    Nitrate,
    #[serde(rename = "염소이온")]
    Chloride,
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "전기전도도")]
    Conductivity,
}

impl QualityItem {
    pub fn name(&self) -> &'static str {
        match self {
            QualityItem::Nitrate => "질산성질소",
            QualityItem::Chloride => "염소이온",
            QualityItem::Ph => "pH",
            QualityItem::Conductivity => "전기전도도",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            QualityItem::Nitrate | QualityItem::Chloride => Some("mg/L"),
            QualityItem::Ph => None,
            QualityItem::Conductivity => Some("µS/cm"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundwaterSelection {
    pub quality_item: QualityItem,
    pub selected_year: Option<i32>,
}

impl Selection for GroundwaterSelection {
    fn snapshot_fragment(&self) -> String {
        match self.selected_year {
            Some(year) => format!("{}/{}", self.quality_item.name(), year),
            None => self.quality_item.name().to_string(),
        }
    }
}

/// Mean measurement of one quality item per region.
///
/// Expects one record per well sample with `item`, `year` and `value`.
pub struct Groundwater;

impl Visualization for Groundwater {
    type Selection = GroundwaterSelection;
    const KIND: &'static str = "groundwater";
    const DISPLAY_NAME: &'static str = "지하수 수질";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("관측정 측정값의 지역 평균")
            .endpoint("/api/groundwater/quality")
    }

    fn render_map(view: &MapView<'_, GroundwaterSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "item", Some(selection.quality_item.name())))
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        let level = view.fields.region_filter.level;
        let mut layer =
            LayerSpec::from_values(view, data::mean_by_region(&records, level, "value"));
        layer.unit = selection.quality_item.unit().map(str::to_string);
        layer
    }

    fn render_chart(view: &MapView<'_, GroundwaterSelection>, data: Option<&Value>) -> ChartSpec {
        let item = view.selection().quality_item;
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "item", Some(item.name())))
            .collect();

        let mut chart = ChartSpec::from_pairs(
            view,
            ChartType::Line,
            item.name(),
            data::mean_by(&records, "year", "value"),
        );
        chart.unit = item.unit().map(str::to_string);
        chart
    }
}

impl MapState<Groundwater> {
    pub fn quality_item(&self) -> QualityItem {
        self.selection().quality_item
    }

    pub fn set_quality_item(&self, item: QualityItem) {
        self.update_selection(|s| s.quality_item = item);
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
            { "township": "대정읍", "item": "질산성질소", "year": 2022, "value": 6.0 },
            { "township": "대정읍", "item": "질산성질소", "year": 2022, "value": 8.0 },
            { "township": "대정읍", "item": "질산성질소", "year": 2023, "value": 9.0 },
            { "township": "남원읍", "item": "질산성질소", "year": 2023, "value": 3.0 },
            { "township": "남원읍", "item": "pH", "year": 2023, "value": 7.4 }
        ])
    }

    #[test]
    fn test_map_uses_regional_mean() {
        let map = MapState::<Groundwater>::with_defaults();
        map.set_selected_year(Some(2022));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 1);
        assert_eq!(layer.features[0].region, "대정읍");
        assert_eq!(layer.features[0].value, 7.0);
        assert_eq!(layer.unit.as_deref(), Some("mg/L"));
    }

    #[test]
    fn test_item_switch() {
        let map = MapState::<Groundwater>::with_defaults();
        map.set_quality_item(QualityItem::Ph);

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 1);
        assert_eq!(layer.features[0].value, 7.4);
        assert!(layer.unit.is_none());
    }

    #[test]
    fn test_chart_is_yearly_mean() {
        let map = MapState::<Groundwater>::with_defaults();

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(chart.categories, vec!["2022".to_string(), "2023".to_string()]);
        assert_eq!(chart.series[0].values, vec![7.0, 6.0]);
    }

    #[test]
    fn test_snapshot_changes_with_item() {
        let map = MapState::<Groundwater>::with_defaults();
        assert!(map.snapshot().ends_with(":질산성질소"));
        map.set_quality_item(QualityItem::Chloride);
        assert!(map.snapshot().ends_with(":염소이온"));
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<Groundwater>::with_defaults();
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
        assert_eq!(map.selected_year(), Some(2022));
    }
}
