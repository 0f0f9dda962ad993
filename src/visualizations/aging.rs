//! Share of elderly farmers by region.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{Selection, Visualization};
use crate::model::MapOptions;
use crate::render::data::{self, matches_year};
use crate::render::{ChartSpec, ChartType, LayerSpec};
use crate::state::{MapState, MapView};

/// Age threshold the ratio is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeBasis {
    #[default]
    #[serde(rename = "65")]
    Over65,
    #[serde(rename = "70")]
    Over70,
    #[serde(rename = "75")]
    Over75,
}

impl AgeBasis {
    pub fn name(&self) -> &'static str {
        match self {
            AgeBasis::Over65 => "65세 이상",
            AgeBasis::Over70 => "70세 이상",
            AgeBasis::Over75 => "75세 이상",
        }
    }

    /// Record key holding the head count at or above the threshold.
    pub fn record_key(&self) -> &'static str {
        match self {
            AgeBasis::Over65 => "over65",
            AgeBasis::Over70 => "over70",
            AgeBasis::Over75 => "over75",
        }
    }

    pub fn all() -> &'static [AgeBasis] {
        &[AgeBasis::Over65, AgeBasis::Over70, AgeBasis::Over75]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgingSelection {
    pub age_basis: AgeBasis,
    pub selected_year: Option<i32>,
}

impl Selection for AgingSelection {}

/// Percentage of farmers at or above an age threshold.
///
/// Expects records with `year`, `farmers` and `over65`/`over70`/`over75`.
pub struct AgingStatus;

const DENOMINATOR: &str = "farmers";

impl Visualization for AgingStatus {
    type Selection = AgingSelection;
    const KIND: &'static str = "aging-status";
    const DISPLAY_NAME: &'static str = "농업인 고령화 현황";

    fn default_options() -> MapOptions {
        MapOptions::new(Self::DISPLAY_NAME)
            .tooltip("전체 농업인 대비 고령 농업인 비율")
            .unit("%")
            .endpoint("/api/farmers/aging")
    }

    fn render_map(view: &MapView<'_, AgingSelection>, data: Option<&Value>) -> LayerSpec {
        let selection = view.selection();
        let records: Vec<_> = data::in_scope(view, data::records(data))
            .into_iter()
            .filter(|r| matches_year(r, selection.selected_year))
            .collect();

        let level = view.fields.region_filter.level;
        let ratios = data::ratio_by_region(
            &records,
            level,
            selection.age_basis.record_key(),
            DENOMINATOR,
        );
        LayerSpec::from_values(view, ratios)
    }

    fn render_chart(view: &MapView<'_, AgingSelection>, data: Option<&Value>) -> ChartSpec {
        let basis = view.selection().age_basis;
        let records = data::in_scope(view, data::records(data));

        ChartSpec::from_pairs(
            view,
            ChartType::Line,
            basis.name(),
            data::ratio_by(&records, "year", basis.record_key(), DENOMINATOR),
        )
    }
}

impl MapState<AgingStatus> {
    pub fn age_basis(&self) -> AgeBasis {
        self.selection().age_basis
    }

    pub fn set_age_basis(&self, basis: AgeBasis) {
        self.update_selection(|s| s.age_basis = basis);
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
            { "township": "추자면", "year": 2023, "farmers": 200, "over65": 120, "over70": 90, "over75": 50 },
            { "township": "우도면", "year": 2023, "farmers": 100, "over65": 40, "over70": 30, "over75": 10 },
            { "township": "우도면", "year": 2022, "farmers": 100, "over65": 35, "over70": 20, "over75": 5 },
            { "township": "가파리", "year": 2023, "farmers": 0, "over65": 0, "over70": 0, "over75": 0 }
        ])
    }

    #[test]
    fn test_ratio_per_region() {
        let map = MapState::<AgingStatus>::with_defaults();
        map.set_selected_year(Some(2023));

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].region, "우도면");
        assert_eq!(layer.features[0].value, 40.0);
        assert_eq!(layer.features[1].value, 60.0);
    }

    #[test]
    fn test_basis_switch() {
        let map = MapState::<AgingStatus>::with_defaults();
        map.set_selected_year(Some(2023));
        map.set_age_basis(AgeBasis::Over75);

        let data = fixture();
        let layer = map.render_map(Some(&data));
        assert_eq!(layer.features[0].value, 10.0);
        assert_eq!(layer.features[1].value, 25.0);
    }

    #[test]
    fn test_chart_is_yearly_ratio() {
        let map = MapState::<AgingStatus>::with_defaults();

        let data = fixture();
        let chart = map.render_chart(Some(&data));
        assert_eq!(chart.categories, vec!["2022".to_string(), "2023".to_string()]);
        assert_eq!(chart.series[0].values, vec![35.0, 160.0 / 300.0 * 100.0]);
    }

    #[test]
    fn test_basis_shared_as_string() {
        let map = MapState::<AgingStatus>::with_defaults();
        map.set_age_basis(AgeBasis::Over70);
        assert_eq!(map.shareable_state()["ageBasis"], json!("70"));

        let other = MapState::<AgingStatus>::with_defaults();
        other.apply_shared_state(&json!({ "ageBasis": "75" }));
        assert_eq!(other.age_basis(), AgeBasis::Over75);
    }

    #[test]
    fn test_every_setter_changes_snapshot() {
        let map = MapState::<AgingStatus>::with_defaults();
        let before = map.snapshot();
        map.set_age_basis(AgeBasis::Over75);
        assert_ne!(map.snapshot(), before);
        let before = map.snapshot();
        map.set_selected_year(Some(2022));
        assert_ne!(map.snapshot(), before);
        assert_eq!(map.selected_year(), Some(2022));
    }
}
