//! Zoom bounds, presets and scroll compensation.

use cutline_core::config::TimelineConfig;
use serde::{Deserialize, Serialize};

/// Zoom steps offered by the preset buttons.
pub const ZOOM_PRESETS: [f64; 6] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

/// Increment used by the +/- zoom buttons.
pub const ZOOM_STEP: f64 = 0.2;

const PRESET_EPSILON: f64 = 1e-6;

/// Allowed zoom interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Bounds used by the timeline toolbar.
    pub const DEFAULT: ZoomRange = ZoomRange { min: 0.2, max: 4.0 };
    /// Bounds that admit every preset.
    pub const EXTENDED: ZoomRange = ZoomRange { min: 0.2, max: 8.0 };

    /// Build a range, swapping inverted bounds.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_config(config: &TimelineConfig) -> Self {
        Self::new(config.zoom_min, config.zoom_max)
    }

    /// Clamp a zoom level into the range. Non-finite input resets to 1.
    pub fn clamp(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        zoom.min(self.max).max(self.min)
    }

    pub fn contains(&self, zoom: f64) -> bool {
        zoom >= self.min && zoom <= self.max
    }

    pub fn is_at_min(&self, zoom: f64) -> bool {
        zoom <= self.min + PRESET_EPSILON
    }

    pub fn is_at_max(&self, zoom: f64) -> bool {
        zoom >= self.max - PRESET_EPSILON
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Preset closest to `zoom`. Ties resolve to the smaller preset.
pub fn nearest_preset(zoom: f64, presets: &[f64]) -> Option<f64> {
    presets.iter().copied().fold(None, |best, preset| match best {
        Some(b) if (b - zoom).abs() <= (preset - zoom).abs() => Some(b),
        _ => Some(preset),
    })
}

/// Smallest preset above `zoom` inside `range`, or the range maximum.
pub fn next_preset_in(zoom: f64, presets: &[f64], range: ZoomRange) -> f64 {
    presets
        .iter()
        .copied()
        .filter(|&p| p > zoom + PRESET_EPSILON && range.contains(p))
        .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.min(p))))
        .unwrap_or_else(|| range.clamp(zoom.max(range.max)))
}

/// Largest preset below `zoom` inside `range`, or the range minimum.
pub fn next_preset_out(zoom: f64, presets: &[f64], range: ZoomRange) -> f64 {
    presets
        .iter()
        .copied()
        .filter(|&p| p < zoom - PRESET_EPSILON && range.contains(p))
        .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.max(p))))
        .unwrap_or_else(|| range.clamp(zoom.min(range.min)))
}

/// Scroll offset that keeps the content under `focus_x` (viewport pixels)
/// fixed while zoom changes from `old_zoom` to `new_zoom`.
pub fn focal_zoom_scroll(current_scroll: f64, focus_x: f64, old_zoom: f64, new_zoom: f64) -> f64 {
    if old_zoom <= 0.0 || !old_zoom.is_finite() {
        return current_scroll;
    }
    let focus_content = (current_scroll + focus_x) / old_zoom;
    (focus_content * new_zoom - focus_x).round().max(0.0)
}

/// Scroll offset that keeps the viewport centre fixed across a zoom change.
pub fn zoom_scroll(current_scroll: f64, viewport_width: f64, old_zoom: f64, new_zoom: f64) -> f64 {
    focal_zoom_scroll(current_scroll, viewport_width / 2.0, old_zoom, new_zoom)
}
