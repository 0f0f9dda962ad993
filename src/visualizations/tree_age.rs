//! Fruit tree age distribution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeAgeSelection {
    pub selected_variety: Option<String>,
    /// Age band label as it appears in records, e.g. "10-19년".
    pub age_band: Option<String>,
}

impl Selection for TreeAgeSelection {}

/// Number of trees per region, optionally restricted to one age band.
///
/// Expects records with `variety`, `age_band` and `trees`.
pub struct TreeAge;

impl Visualization for TreeAge {
    type Selection = TreeAgeSelection;
    const KIND: &'static str = "tree-age";
    const DISPLAY_NAME: &'static str = "수령별 과수 현황";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("수령 구간별 과수 그루 수")
            .unit("그루")
            .endpoint("/api/trees/age")
    }

    fn render_map(view: &MapView<'_, TreeAgeSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "variety", selection.selected_variety.as_deref()))
            .filter(|r| matches(r, "age_band", selection.age_band.as_deref()))
            .collect();

        let level = view.fields.region_filter.level;
        LayerSpec::from_values(view, data::sum_by_region(&records, level, "trees"))
    }

    /// Trees per age band, youngest first.
    fn render_chart(view: &MapView<'_, TreeAgeSelection>, data: Option<&Value>) -> ChartSpec {
        let variety = view.selection().selected_variety.as_deref();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches(r, "variety", variety))
            .collect();

        let mut bands = data::sum_by(&records, "age_band", "trees");
        bands.sort_by_key(|(band, _)| band_start(band));
        ChartSpec::from_pairs(view, ChartType::Bar, variety.unwrap_or("전체 품종"), bands)
    }
}

/// Leading number of a band label; labels without one sort last.
fn band_start(band: &str) -> u32 {
    let digits: String = band
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(u32::MAX)
}

impl MapState<TreeAge> {
    pub fn selected_variety(&self) -> Option<String> {
        self.selection().selected_variety
    }

    pub fn set_selected_variety(&self, variety: Option<String>) {
        self.update_selection(|s| s.selected_variety = variety);
    }

    pub fn age_band(&self) -> Option<String> {
        self.selection().age_band
    }

    pub fn set_age_band(&self, band: Option<String>) {
        self.update_selection(|s| s.age_band = band);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MapInstance;
    use serde_json::json;

    fn fixture() -> Value {
        json!([
            { "township": "위미리", "variety": "온주", "age_band": "5-9년", "trees": 500 },
            { "township": "위미리", "variety": "온주", "age_band": "10-19년", "trees": 1500 },
            { "township": "위미리", "variety": "온주", "age_band": "30년 이상", "trees": 200 },
            { "township": "신례리", "variety": "온주", "age_band": "10-19년", "trees": 700 },
            { "township": "신례리", "variety": "한라봉", "age_band": "5-9년", "trees": 90 }
        ])
    }

    #[test]
    fn test_band_start() {
        assert_eq!(band_start("5-9년"), 5);
        assert_eq!(band_start("30년 이상"), 30);
        assert_eq!(band_start("미상"), u32::MAX);
    }

    #[test]
    fn test_map_by_band() {
        let map = MapState::<TreeAge>::with_defaults();
        map.set_selected_variety(Some("온주".to_string()));
        map.set_age_band(Some("10-19년".to_string()));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].region, "신례리");
        assert_eq!(layer.features[0].value, 700.0);
        assert_eq!(layer.features[1].value, 1500.0);
    }

    #[test]
    fn test_chart_sorted_by_age() {
        let map = MapState::<TreeAge>::with_defaults();
        map.set_selected_variety(Some("온주".to_string()));

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(
            chart.categories,
            vec!["5-9년".to_string(), "10-19년".to_string(), "30년 이상".to_string()]
        );
        assert_eq!(chart.series[0].values, vec![500.0, 2200.0, 200.0]);
    }

    #[test]
    fn test_band_roundtrips_through_shareable_state() {
        let map = MapState::<TreeAge>::with_defaults();
        map.set_age_band(Some("5-9년".to_string()));

        let other = MapState::<TreeAge>::with_defaults();
        other.apply_shared_state(&map.shareable_state());
        assert_eq!(other.age_band().as_deref(), Some("5-9년"));
        assert_eq!(other.selected_variety(), None);
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<TreeAge>::with_defaults();
        let before = map.snapshot();
        map.set_selected_variety(Some("온주".to_string()));
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_age_band(Some("10-19년".to_string()));
        assert_ne!(map.snapshot(), before);
    }
}
