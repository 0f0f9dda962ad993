//! Overwintering (hibernation) vegetable cultivation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HibernationSelection {
    pub selected_crop: Option<String>,
    pub selected_year: Option<i32>,
    /// Chart the yearly trend of the selected crop instead of the crop mix.
    pub show_trend: bool,
}

impl Selection for HibernationSelection {}

/// Cultivation area of winter vegetables (cabbage, radish, broccoli, ...).
///
/// Expects records with `crop`, `year` and `area` (ha).
pub struct HibernationVegetable;

impl Visualization for HibernationVegetable {
    type Selection = HibernationSelection;
    const KIND: &'static str = "hibernation-vegetable";
    const DISPLAY_NAME: &'static str = "월동채소 재배 현황";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("월동채소 품목별 재배 면적")
            .unit("ha")
            .endpoint("/api/vegetables/hibernation")
    }

    fn render_map(view: &MapView<'_, HibernationSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "crop", selection.selected_crop.as_deref()))
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        let level = view.fields.region_filter.level;
        LayerSpec::from_values(view, data::sum_by_region(&records, level, "area"))
    }

    fn render_chart(view: &MapView<'_, HibernationSelection>, data: Option<&Value>) -> ChartSpec {
        let selection = view.selection();
        let in_scope = data::in_scope(view, data::records(data));

        if selection.show_trend {
            let crop = selection.selected_crop.as_deref();
            let records: Vec<_> = in_scope
                .into_iter()
                .filter(|r| matches(r, "crop", crop))
                .collect();
            return ChartSpec::from_pairs(
                view,
                ChartType::Line,
                crop.unwrap_or("월동채소 전체"),
                data::sum_by(&records, "year", "area"),
            );
        }

        let records: Vec<_> = in_scope
            .into_iter()
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();
        ChartSpec::from_pairs(
            view,
            ChartType::Bar,
            "품목별 면적",
            data::sum_by(&records, "crop", "area"),
        )
    }
}

impl MapState<HibernationVegetable> {
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

    pub fn show_trend(&self) -> bool {
        self.selection().show_trend
    }

    pub fn set_show_trend(&self, show: bool) {
        self.update_selection(|s| s.show_trend = show);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MapInstance;
    use serde_json::json;

    fn fixture() -> Value {
        json!([
            { "township": "대정읍", "crop": "양배추", "year": 2023, "area": 300 },
            { "township": "대정읍", "crop": "월동무", "year": 2023, "area": 100 },
            { "township": "성산읍", "crop": "월동무", "year": 2023, "area": 800 },
            { "township": "성산읍", "crop": "월동무", "year": 2022, "area": 750 }
        ])
    }

    #[test]
    fn test_map_by_crop() {
        let map = MapState::<HibernationVegetable>::with_defaults();
        map.set_selected_crop(Some("월동무".to_string()));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[1].region, "성산읍");
        assert_eq!(layer.features[1].value, 800.0);
    }

    #[test]
    fn test_chart_switches_with_trend_flag() {
        let map = MapState::<HibernationVegetable>::with_defaults();
        map.set_selected_crop(Some("월동무".to_string()));
        map.set_selected_year(Some(2023));

        let data = fixture();
        let mix = map.render_chart(Some(&data));
        assert_eq!(mix.chart_type, ChartType::Bar);
        assert_eq!(mix.categories, vec!["양배추".to_string(), "월동무".to_string()]);

        let before = map.snapshot();
        map.set_show_trend(true);
        assert_ne!(map.snapshot(), before);

        let trend = map.render_chart(Some(&data));
        assert_eq!(trend.chart_type, ChartType::Line);
        assert_eq!(trend.categories, vec!["2022".to_string(), "2023".to_string()]);
        assert_eq!(trend.series[0].values, vec![750.0, 900.0]);
    }

    #[test]
    fn test_show_trend_is_shared() {
        let map = MapState::<HibernationVegetable>::with_defaults();
        map.set_show_trend(true);
        assert_eq!(map.shareable_state()["showTrend"], json!(true));

        let other = MapState::<HibernationVegetable>::with_defaults();
        other.apply_shared_state(&json!({ "showTrend": "yes" }));
        assert!(!other.show_trend());
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<HibernationVegetable>::with_defaults();
        let before = map.snapshot();
        map.set_selected_crop(Some("양배추".to_string()));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_show_trend(true);
        assert_ne!(map.snapshot(), before);
        assert_eq!(map.selected_year(), Some(2022));
    }
}
