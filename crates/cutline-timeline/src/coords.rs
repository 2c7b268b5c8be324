//! Unified timeline coordinate system.
//!
//! Every time↔pixel conversion on the timeline goes through this module.
//! The only stored width is `base_width` (content width before zoom); all
//! pixel positions are derived from it at read time so that thumbnails,
//! clips and the playhead cannot drift apart.

use cutline_core::pixel;
use serde::{Deserialize, Serialize};

/// Horizontal offset applied uniformly to index-positioned elements.
pub const TIMELINE_LEFT_OFFSET: f64 = 0.0;

/// Pixels per second for the given duration, base width and zoom.
///
/// Rounded to an integer so adjacent elements share pixel boundaries.
/// Returns 0 when nothing is loaded yet (zero duration or width).
#[inline]
pub fn pixels_per_second(duration: f64, base_width: f64, zoom: f64) -> f64 {
    if duration <= 0.0 || base_width <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    let pps = (base_width / duration * zoom).round();
    if pps.is_finite() && pps > 0.0 {
        pps
    } else {
        0.0
    }
}

/// Clamp a time to `[0, duration]`. NaN maps to 0.
#[inline]
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.min(duration).max(0.0)
}

/// Pixel position of a discrete item (thumbnail) by index.
#[inline]
pub fn index_to_px(index: usize, item_width: f64) -> f64 {
    pixel::round_px(index as f64 * item_width + TIMELINE_LEFT_OFFSET)
}

/// Index of the discrete item under a pixel position.
pub fn px_to_index(px: f64, item_width: f64) -> Option<usize> {
    if item_width <= 0.0 || !item_width.is_finite() {
        return None;
    }
    let index = pixel::floor_px((px - TIMELINE_LEFT_OFFSET) / item_width);
    if index.is_finite() && index >= 0.0 {
        Some(index as usize)
    } else {
        None
    }
}

/// A time interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Half-open containment: `start <= t < end`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }
}

/// Parameters for the coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateParams {
    /// Timeline duration in seconds.
    pub duration: f64,
    /// Content width before zoom, in pixels.
    pub base_width: f64,
    pub zoom: f64,
    /// Horizontal scroll offset in pixels.
    pub scroll_left: f64,
}

impl CoordinateParams {
    pub fn new(duration: f64, base_width: f64) -> Self {
        Self {
            duration,
            base_width,
            zoom: 1.0,
            scroll_left: 0.0,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_scroll(mut self, scroll_left: f64) -> Self {
        self.scroll_left = scroll_left;
        self
    }

    #[inline]
    pub fn pixels_per_second(&self) -> f64 {
        pixels_per_second(self.duration, self.base_width, self.zoom)
    }

    /// Content pixel position of a time. Always an integer.
    #[inline]
    pub fn time_to_px(&self, time: f64) -> f64 {
        let pps = self.pixels_per_second();
        if pps == 0.0 {
            return 0.0;
        }
        pixel::round_px(time * pps)
    }

    /// Time under a viewport pixel position (scroll offset applied).
    #[inline]
    pub fn px_to_time(&self, px: f64) -> f64 {
        self.content_px_to_time(px + self.scroll_left)
    }

    /// Time at a content pixel position (no scroll offset).
    #[inline]
    pub fn content_px_to_time(&self, px: f64) -> f64 {
        pixel::safe_div(px, self.pixels_per_second())
    }

    /// Time span covered by a pointer movement of `dx` pixels.
    #[inline]
    pub fn delta_px_to_time(&self, dx: f64) -> f64 {
        self.content_px_to_time(dx)
    }

    /// Total zoomed content width in pixels.
    pub fn content_width(&self) -> f64 {
        self.time_to_px(self.duration)
    }

    /// Time range visible in a viewport of the given width.
    pub fn visible_range(&self, viewport_width: f64) -> TimeRange {
        TimeRange {
            start: self.content_px_to_time(self.scroll_left),
            end: self.content_px_to_time(self.scroll_left + viewport_width),
        }
    }

    /// Width of one thumbnail when `count` thumbnails span the content.
    ///
    /// Derived from [`Self::content_width`] so thumbnail `i` starts at the
    /// same pixel as the time `i * duration / count`.
    pub fn thumbnail_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.content_width() / count as f64
    }
}
