//! Editor configuration.
//!
//! Every field has a default, so a partial JSON file only overrides what it
//! names. A missing or malformed file falls back to defaults.

use crate::error::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub timeline: TimelineConfig,
    pub thumbnails: ThumbnailConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Timeline interaction and layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Shortest clip any edit may produce, in seconds.
    pub min_clip_duration: f64,
    /// Snap distance in screen pixels.
    pub snap_threshold_px: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Increment used by the zoom in/out buttons.
    pub zoom_step: f64,
    pub zoom_presets: Vec<f64>,
    /// How long scroll events are ignored after a programmatic scroll.
    pub scroll_settle_ms: u64,
    /// Content width before zoom, in pixels.
    pub base_width: f64,
    pub track_heights: TrackHeights,
}

/// Default track heights per kind, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackHeights {
    pub video: f64,
    pub audio: f64,
    pub effect: f64,
}

/// Thumbnail strip extraction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub count: usize,
    pub width: u32,
    pub height: u32,
}

/// Preview surface parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "cutline_timeline=debug,warn").
    pub level: String,
    /// Include the event target in each line.
    pub with_target: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_clip_duration: crate::MIN_CLIP_DURATION,
            snap_threshold_px: 8.0,
            zoom_min: 0.2,
            zoom_max: 4.0,
            zoom_step: 0.2,
            zoom_presets: vec![0.25, 0.5, 1.0, 2.0, 4.0, 8.0],
            scroll_settle_ms: 150,
            base_width: 1600.0,
            track_heights: TrackHeights::default(),
        }
    }
}

impl Default for TrackHeights {
    fn default() -> Self {
        Self {
            video: 80.0,
            audio: 60.0,
            effect: 40.0,
        }
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            count: 20,
            width: 160,
            height: 90,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}

impl EditorConfig {
    /// Load config from `path`, falling back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load config from `path`, reporting read and parse failures.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the timeline and render loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.timeline;
        if !(t.min_clip_duration.is_finite() && t.min_clip_duration > 0.0) {
            return Err(CutlineError::Config(format!(
                "min_clip_duration must be positive, got {}",
                t.min_clip_duration
            )));
        }
        if !(t.zoom_min > 0.0 && t.zoom_min <= t.zoom_max && t.zoom_max.is_finite()) {
            return Err(CutlineError::Config(format!(
                "invalid zoom range {}..{}",
                t.zoom_min, t.zoom_max
            )));
        }
        if self.thumbnails.count == 0 {
            return Err(CutlineError::Config("thumbnail count must be non-zero".into()));
        }
        if !(self.render.fps.is_finite() && self.render.fps > 0.0) {
            return Err(CutlineError::Config(format!(
                "render fps must be positive, got {}",
                self.render.fps
            )));
        }
        Ok(())
    }

    /// Save config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
