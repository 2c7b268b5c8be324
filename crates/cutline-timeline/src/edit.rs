//! Drag and trim planning.
//!
//! The planners are pure: given a clip, a proposed time and the free gap the
//! clip lives in, they compute the bounds an edit should commit. Validation
//! and the actual commit happen in [`crate::state::Timeline`].

use cutline_core::pixel;

use crate::clip::{Clip, ClipId};
use crate::track::TrackId;

// ── Gesture state ───────────────────────────────────────────────

/// Which edge of a clip a trim gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    /// Moves `start`; `offset` follows.
    Left,
    /// Moves `end`.
    Right,
}

/// Bookkeeping for an in-progress clip drag, captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub track_id: TrackId,
    pub clip_id: ClipId,
    /// Clip start when the drag began.
    pub anchor_start: f64,
    /// Pointer x (viewport pixels) when the drag began.
    pub origin_x: f64,
}

/// Bookkeeping for an in-progress trim, captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimState {
    pub track_id: TrackId,
    pub clip_id: ClipId,
    pub edge: TrimEdge,
    /// Time of the trimmed edge when the gesture began.
    pub anchor_time: f64,
    pub origin_x: f64,
}

/// Result bounds of an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBounds {
    pub start: f64,
    pub end: f64,
    pub offset: f64,
}

impl ClipBounds {
    pub fn of(clip: &Clip) -> Self {
        Self {
            start: clip.start,
            end: clip.end,
            offset: clip.offset,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn apply_to(&self, clip: &Clip) -> Clip {
        let mut next = clip.clone();
        next.start = self.start;
        next.end = self.end;
        next.offset = self.offset;
        next
    }
}

/// Free window a clip may occupy: `(previous clip end or 0, next clip start
/// or timeline end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub lo: f64,
    pub hi: f64,
}

impl Gap {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

impl From<(f64, f64)> for Gap {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::new(lo, hi)
    }
}

// ── Move ────────────────────────────────────────────────────────

/// Plan a duration-preserving move of a clip whose start is proposed at
/// `proposed_start`.
///
/// `snap` returns the snapped time for a candidate edge, or `None` when
/// nothing is in range. The start edge wins; the end edge only snaps when
/// the start did not. The result is clamped into `gap` so the clip stops at
/// its neighbours; edges touching a gap bound are set to the bound exactly.
pub fn plan_move(
    proposed_start: f64,
    clip_duration: f64,
    gap: Gap,
    snap: impl Fn(f64) -> Option<f64>,
) -> (f64, f64) {
    let dur = clip_duration;
    let snapped_start = snap(proposed_start);
    let mut start = snapped_start.unwrap_or(proposed_start).max(0.0);

    if start + dur > gap.hi {
        start = gap.hi - dur;
    }
    if snapped_start.is_none() {
        if let Some(end) = snap(start + dur) {
            start = end - dur;
        }
    }

    if gap.width() < dur {
        // Does not fit; let validation reject it.
        return (start, start + dur);
    }
    if start <= gap.lo {
        (gap.lo, gap.lo + dur)
    } else if start + dur >= gap.hi {
        (gap.hi - dur, gap.hi)
    } else {
        (start, start + dur)
    }
}

// ── Trim ────────────────────────────────────────────────────────

/// Plan a single-edge trim of `clip` towards `proposed`.
///
/// Left trims never push `offset` below zero and never pass `gap.lo`; right
/// trims never pass `gap.hi` (already capped at the timeline end). Both keep
/// the clip at least `min_duration` long.
pub fn plan_trim(
    clip: &Clip,
    edge: TrimEdge,
    proposed: f64,
    gap: Gap,
    min_duration: f64,
    snap: impl Fn(f64) -> Option<f64>,
) -> ClipBounds {
    let target = snap(proposed).unwrap_or(proposed);
    match edge {
        TrimEdge::Left => {
            let lower = 0.0f64.max(gap.lo).max(clip.start - clip.offset);
            let upper = clip.end - min_duration;
            let start = pixel::clamp(target, lower, upper);
            ClipBounds {
                start,
                end: clip.end,
                offset: (clip.offset + (start - clip.start)).max(0.0),
            }
        }
        TrimEdge::Right => {
            let end = pixel::clamp(target, clip.start + min_duration, gap.hi);
            ClipBounds {
                start: clip.start,
                end,
                offset: clip.offset,
            }
        }
    }
}
