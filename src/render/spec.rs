//! Layer and chart descriptors handed to the external renderers.

use serde::Serialize;

use super::legend::Legend;
use crate::model::{MapId, MapType, VisualType};
use crate::state::MapView;

/// Style of one region on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub region: String,
    pub value: f64,
    pub class_index: Option<usize>,
    pub color: Option<String>,
    pub label: Option<String>,
}

/// Everything the mapping toolkit needs to build a statistics layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    pub map_id: MapId,
    pub kind: &'static str,
    pub title: String,
    pub base_map: MapType,
    pub visual_type: VisualType,
    pub opacity: f64,
    pub unit: Option<String>,
    pub legend: Legend,
    pub features: Vec<FeatureStyle>,
}

impl LayerSpec {
    /// A layer with no features, drawn while data is missing.
    pub fn empty<S>(view: &MapView<'_, S>) -> Self {
        let visualization = &view.fields.visualization;
        Self {
            map_id: view.id.clone(),
            kind: view.kind,
            title: view.options.title.clone(),
            base_map: view.fields.map_type,
            visual_type: visualization.visual_type,
            opacity: visualization.opacity(),
            unit: view.options.unit.clone(),
            legend: Legend::default(),
            features: Vec::new(),
        }
    }

    /// Classify per-region values with the map's legend and label settings.
    pub fn from_values<S>(view: &MapView<'_, S>, values: Vec<(String, f64)>) -> Self {
        let mut layer = Self::empty(view);
        let visualization = &view.fields.visualization;
        let numbers: Vec<f64> = values.iter().map(|(_, value)| *value).collect();
        layer.legend = Legend::build(&visualization.legend, &numbers);

        let labels = visualization.labels;
        let unit = view.options.unit.as_deref();
        layer.features = values
            .into_iter()
            .map(|(region, value)| {
                let class_index = layer.legend.classify(value);
                let color = layer.legend.color_for(value).map(str::to_string);
                let label = match (labels.show_region, labels.show_value) {
                    (true, true) => Some(format!("{}\n{}", region, format_value(value, unit))),
                    (true, false) => Some(region.clone()),
                    (false, true) => Some(format_value(value, unit)),
                    (false, false) => None,
                };
                FeatureStyle {
                    region,
                    value,
                    class_index,
                    color,
                    label,
                }
            })
            .collect();
        layer
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Chart flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

/// One data series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Everything the charting library needs to draw the companion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub map_id: MapId,
    pub title: String,
    pub chart_type: ChartType,
    pub unit: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// A chart with no data.
    pub fn empty<S>(view: &MapView<'_, S>) -> Self {
        Self {
            map_id: view.id.clone(),
            title: view.options.title.clone(),
            chart_type: ChartType::Bar,
            unit: view.options.unit.clone(),
            categories: Vec::new(),
            series: Vec::new(),
        }
    }

    /// Single-series chart from `(category, value)` pairs.
    pub fn from_pairs<S>(
        view: &MapView<'_, S>,
        chart_type: ChartType,
        series_name: impl Into<String>,
        pairs: Vec<(String, f64)>,
    ) -> Self {
        let mut chart = Self::empty(view);
        chart.chart_type = chart_type;
        if pairs.is_empty() {
            return chart;
        }
        let (categories, values) = pairs.into_iter().unzip();
        chart.categories = categories;
        chart.series = vec![Series {
            name: series_name.into(),
            values,
        }];
        chart
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|series| series.values.is_empty())
    }
}

/// Format a value for a map label.
pub fn format_value(value: f64, unit: Option<&str>) -> String {
    let number = if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    };
    match unit {
        Some(unit) => format!("{} {}", number, unit),
        None => number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.0, None), "12");
        assert_eq!(format_value(12.34, Some("ha")), "12.3 ha");
        assert_eq!(format_value(-0.5, Some("%")), "-0.5 %");
    }
}
