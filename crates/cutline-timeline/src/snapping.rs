//! Snapping engine for timeline interactions.

use cutline_core::config::TimelineConfig;

use crate::clip::ClipId;
use crate::coords::CoordinateParams;
use crate::track::Track;

/// A point on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Timeline start or end.
    Bound,
    Playhead,
    ClipEdge,
    /// Whole-second ruler tick.
    Tick,
}

/// Engine for computing snap targets.
#[derive(Debug, Clone)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Snap distance in screen pixels, converted to time per zoom level.
    pub snap_distance_px: f64,
    /// Ruler tick interval in seconds (0 = no tick snapping).
    pub tick_interval: f64,
}

impl SnappingEngine {
    pub fn new() -> Self {
        Self {
            enabled: true,
            snap_distance_px: 8.0,
            tick_interval: 1.0,
        }
    }

    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            snap_distance_px: config.snap_threshold_px,
            ..Self::new()
        }
    }

    /// Collect snap points in priority order: timeline bounds, playhead,
    /// other clips' edges. Edges of `exclude` are skipped. Ruler ticks are
    /// not listed; [`find_snap`](Self::find_snap) checks the nearest one.
    pub fn collect_snap_points(
        &self,
        tracks: &[Track],
        duration: f64,
        playhead: f64,
        exclude: Option<ClipId>,
    ) -> Vec<SnapPoint> {
        let mut points = vec![
            SnapPoint {
                time: 0.0,
                kind: SnapKind::Bound,
            },
            SnapPoint {
                time: duration,
                kind: SnapKind::Bound,
            },
            SnapPoint {
                time: playhead,
                kind: SnapKind::Playhead,
            },
        ];

        for clip in tracks
            .iter()
            .flat_map(|track| track.clips())
            .filter(|clip| Some(clip.id) != exclude)
        {
            points.push(SnapPoint {
                time: clip.start,
                kind: SnapKind::ClipEdge,
            });
            points.push(SnapPoint {
                time: clip.end,
                kind: SnapKind::ClipEdge,
            });
        }

        points
    }

    /// Snap threshold in seconds at the current zoom, or `None` when
    /// snapping is off or the timeline has no scale yet.
    pub fn threshold(&self, params: &CoordinateParams) -> Option<f64> {
        let pps = params.pixels_per_second();
        (self.enabled && pps > 0.0).then(|| self.snap_distance_px / pps)
    }

    /// Find the closest snap point strictly within the threshold.
    /// Ties keep the earlier point in `points`; the nearest ruler tick
    /// ranks after all of them.
    pub fn find_snap(
        &self,
        time: f64,
        points: &[SnapPoint],
        params: &CoordinateParams,
    ) -> Option<SnapPoint> {
        let threshold = self.threshold(params)?;

        let mut best: Option<(SnapPoint, f64)> = None;
        for sp in points {
            let dist = (sp.time - time).abs();
            if dist < threshold && best.map_or(true, |(_, d)| dist < d) {
                best = Some((*sp, dist));
            }
        }

        if let Some(tick) = self.nearest_tick(time, params.duration) {
            let dist = (tick.time - time).abs();
            if dist < threshold && best.map_or(true, |(_, d)| dist < d) {
                best = Some((tick, dist));
            }
        }

        best.map(|(sp, _)| sp)
    }

    /// Closest ruler tick to `time` inside `[0, duration]`.
    fn nearest_tick(&self, time: f64, duration: f64) -> Option<SnapPoint> {
        if !(self.tick_interval > 0.0 && duration > 0.0 && time.is_finite()) {
            return None;
        }
        let last = (duration / self.tick_interval).floor() * self.tick_interval;
        let tick = ((time / self.tick_interval).round() * self.tick_interval).clamp(0.0, last);
        Some(SnapPoint {
            time: tick,
            kind: SnapKind::Tick,
        })
    }

    /// Snapped time, or `time` unchanged when nothing is in range.
    pub fn snap(&self, time: f64, points: &[SnapPoint], params: &CoordinateParams) -> f64 {
        self.find_snap(time, points, params)
            .map_or(time, |sp| sp.time)
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new()
    }
}
