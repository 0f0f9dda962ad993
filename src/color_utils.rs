//! Color utility functions shared across the application.
//!
//! This module provides color conversion and the sequential color ramps
//! used by map legends.

use crate::model::ColorScheme;

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Convert an RGB triple in 0.0-1.0 to a `#rrggbb` string.
pub fn rgb_to_hex((r, g, b): (f32, f32, f32)) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// Sequential ramp of `count` colors, light to dark.
///
/// Saturation rises and brightness falls along the ramp so that higher
/// legend classes read as more intense.
pub fn color_ramp(scheme: ColorScheme, count: usize) -> Vec<String> {
    const SATURATION: (f32, f32) = (0.12, 0.95);
    const VALUE: (f32, f32) = (0.98, 0.50);

    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                1.0
            };
            let s = SATURATION.0 + (SATURATION.1 - SATURATION.0) * t;
            let v = VALUE.0 + (VALUE.1 - VALUE.0) * t;
            rgb_to_hex(hsv_to_rgb(scheme.hue(), s, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_to_rgb_red() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((r - 1.0).abs() < 0.01);
        assert!(g.abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_green() {
        let (r, g, b) = hsv_to_rgb(120.0, 1.0, 1.0);
        assert!(r.abs() < 0.01);
        assert!((g - 1.0).abs() < 0.01);
        assert!(b.abs() < 0.01);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex((1.0, 0.0, 0.0)), "#ff0000");
        assert_eq!(rgb_to_hex((0.0, 0.0, 1.0)), "#0000ff");
        assert_eq!(rgb_to_hex((2.0, -1.0, 0.5)), "#ff0080");
    }

    #[test]
    fn test_ramp_gets_darker() {
        let ramp = color_ramp(ColorScheme::Blue, 7);
        assert_eq!(ramp.len(), 7);
        assert_ne!(ramp.first(), ramp.last());
        assert!(ramp.iter().all(|c| c.len() == 7 && c.starts_with('#')));
    }

    #[test]
    fn test_single_color_ramp() {
        assert_eq!(color_ramp(ColorScheme::Red, 1).len(), 1);
        assert!(color_ramp(ColorScheme::Red, 0).is_empty());
    }
}
