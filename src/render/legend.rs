//! Legend binning.

use serde::Serialize;

use crate::color_utils::color_ramp;
use crate::model::LegendSetting;

/// One legend class. Values in `[min, max)` fall into it; the last class
/// also takes `max` and everything above.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendClass {
    pub min: f64,
    pub max: f64,
    pub color: String,
}

/// Computed legend of a layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Legend {
    /// Whether the classes come from user pivot points.
    pub manual: bool,
    pub classes: Vec<LegendClass>,
}

impl Legend {
    /// Bin `values` according to `setting`.
    ///
    /// Without pivot points the value range is split into `level_count`
    /// equal intervals. With pivot points each pivot starts a new class,
    /// giving up to `pivots + 1` classes whatever `level_count` says. The
    /// classes below the first and above the last pivot are left out when
    /// no value falls there.
    pub fn build(setting: &LegendSetting, values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let data_min = finite.iter().copied().reduce(f64::min);
        let data_max = finite.iter().copied().reduce(f64::max);

        let bounds = if setting.is_manual() {
            if !setting.pivots_aligned() {
                log::warn!(
                    "Legend has {} pivot point(s) for {} classes; using the pivots",
                    setting.pivot_points.len(),
                    setting.level_count
                );
            }
            manual_bounds(&setting.pivot_points, data_min, data_max)
        } else {
            match (data_min, data_max) {
                (Some(min), Some(max)) => equal_interval_bounds(min, max, setting.level_count as usize),
                _ => Vec::new(),
            }
        };

        if bounds.len() < 2 {
            return Self {
                manual: setting.is_manual(),
                classes: Vec::new(),
            };
        }

        let colors = color_ramp(setting.color, bounds.len() - 1);
        let classes = bounds
            .windows(2)
            .zip(colors)
            .map(|(pair, color)| LegendClass {
                min: pair[0],
                max: pair[1],
                color,
            })
            .collect();

        Self {
            manual: setting.is_manual(),
            classes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of the class `value` belongs to.
    pub fn classify(&self, value: f64) -> Option<usize> {
        if self.classes.is_empty() || !value.is_finite() {
            return None;
        }
        let last = self.classes.len() - 1;
        let index = self.classes[..last]
            .iter()
            .position(|class| value < class.max)
            .unwrap_or(last);
        Some(index)
    }

    /// Color of the class `value` belongs to.
    pub fn color_for(&self, value: f64) -> Option<&str> {
        self.classify(value)
            .map(|index| self.classes[index].color.as_str())
    }
}

fn equal_interval_bounds(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if max <= min {
        return vec![min, max];
    }
    let step = (max - min) / count as f64;
    (0..=count)
        .map(|i| if i == count { max } else { min + step * i as f64 })
        .collect()
}

fn manual_bounds(pivots: &[f64], data_min: Option<f64>, data_max: Option<f64>) -> Vec<f64> {
    let mut pivots: Vec<f64> = pivots.iter().copied().filter(|p| p.is_finite()).collect();
    pivots.sort_by(f64::total_cmp);
    pivots.dedup();

    let (Some(first), Some(last)) = (pivots.first().copied(), pivots.last().copied()) else {
        return Vec::new();
    };

    // Edge classes exist only when data reaches past the outer pivots.
    let mut bounds = Vec::with_capacity(pivots.len() + 2);
    if let Some(min) = data_min.filter(|min| *min < first) {
        bounds.push(min);
    }
    bounds.extend(pivots);
    if let Some(max) = data_max.filter(|max| *max > last) {
        bounds.push(max);
    }
    bounds
}
