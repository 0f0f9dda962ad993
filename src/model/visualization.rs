//! Visualization settings shared by every map.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LEVEL_COUNT, DEFAULT_TRANSPARENCY, MAX_LEVEL_COUNT, MIN_LEVEL_COUNT,
};

/// Color ramp used by the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Red,
    Orange,
    Yellow,
    #[default]
    Green,
    Blue,
    Purple,
}

impl ColorScheme {
    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Red => "red",
            ColorScheme::Orange => "orange",
            ColorScheme::Yellow => "yellow",
            ColorScheme::Green => "green",
            ColorScheme::Blue => "blue",
            ColorScheme::Purple => "purple",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[
            ColorScheme::Red,
            ColorScheme::Orange,
            ColorScheme::Yellow,
            ColorScheme::Green,
            ColorScheme::Blue,
            ColorScheme::Purple,
        ]
    }

    /// Hue of the ramp in degrees.
    pub fn hue(&self) -> f32 {
        match self {
            ColorScheme::Red => 0.0,
            ColorScheme::Orange => 28.0,
            ColorScheme::Yellow => 52.0,
            ColorScheme::Green => 120.0,
            ColorScheme::Blue => 215.0,
            ColorScheme::Purple => 275.0,
        }
    }
}

/// How values are drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    /// Choropleth fill
    #[default]
    Color,
    Dot,
    Bubble,
    Heat,
}

/// Legend configuration.
///
/// An empty `pivot_points` list selects automatic binning into `level_count`
/// classes. A non-empty list holds user breakpoints and should contain
/// `level_count - 1` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendSetting {
    pub level_count: u8,
    pub color: ColorScheme,
    pub pivot_points: Vec<f64>,
}

impl LegendSetting {
    /// Whether the user supplied their own breakpoints.
    pub fn is_manual(&self) -> bool {
        !self.pivot_points.is_empty()
    }

    /// Whether manual breakpoints line up with the class count.
    pub fn pivots_aligned(&self) -> bool {
        !self.is_manual() || self.pivot_points.len() + 1 == self.level_count as usize
    }

    /// Clamp `level_count` into range and drop non-finite pivots.
    pub fn sanitized(mut self) -> Self {
        self.level_count = self.level_count.clamp(MIN_LEVEL_COUNT, MAX_LEVEL_COUNT);
        self.pivot_points.retain(|p| p.is_finite());
        self
    }
}

impl Default for LegendSetting {
    fn default() -> Self {
        Self {
            level_count: DEFAULT_LEVEL_COUNT,
            color: ColorScheme::default(),
            pivot_points: Vec::new(),
        }
    }
}

/// Label toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSetting {
    pub show_value: bool,
    pub show_region: bool,
}

impl Default for LabelSetting {
    fn default() -> Self {
        Self {
            show_value: false,
            show_region: true,
        }
    }
}

/// Visualization settings of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizationSetting {
    pub legend: LegendSetting,
    pub visual_type: VisualType,
    pub labels: LabelSetting,
    /// 0.0 is fully opaque, 1.0 fully transparent.
    pub transparency: f64,
}

impl VisualizationSetting {
    /// Opacity handed to the layer, the complement of `transparency`.
    pub fn opacity(&self) -> f64 {
        1.0 - self.transparency
    }

    /// Clamp every ranged field into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.legend = self.legend.sanitized();
        self.transparency = clamp_transparency(self.transparency);
        self
    }
}

impl Default for VisualizationSetting {
    fn default() -> Self {
        Self {
            legend: LegendSetting::default(),
            visual_type: VisualType::default(),
            labels: LabelSetting::default(),
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}

/// Clamp a transparency value into `[0, 1]`; NaN becomes opaque.
pub fn clamp_transparency(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
