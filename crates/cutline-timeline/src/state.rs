//! Authoritative timeline model and its action set.
//!
//! Fields are private; every write goes through an action. Actions on numeric
//! input clamp rather than fail. Clip placement violations return an error
//! and leave the model untouched. The track list lives behind an `Arc`, so
//! an edit builds the new track off to the side and swaps it in with one
//! assignment; snapshots taken earlier keep seeing the old list.

use std::sync::Arc;
use std::time::Instant;

use cutline_core::{pixel, MediaRef, TimelineConfig};
use tracing::{debug, info, warn};

use crate::clip::{Clip, ClipId, ClipPatch, TIME_EPSILON};
use crate::coords::{clamp_time, CoordinateParams, TimeRange};
use crate::edit::{plan_move, plan_trim, ClipBounds, DragState, Gap, TrimEdge, TrimState};
use crate::error::{Result, TimelineError};
use crate::snapping::SnappingEngine;
use crate::track::{Track, TrackId, TrackKind};
use crate::viewport::ScrollGuard;
use crate::zoom::{self, ZoomRange};

#[derive(Debug, Clone)]
pub struct Timeline {
    config: TimelineConfig,
    zoom_range: ZoomRange,
    snapping: SnappingEngine,
    scroll_guard: ScrollGuard,

    duration: f64,
    current_time: f64,
    is_playing: bool,

    zoom: f64,
    scroll_left: f64,
    base_width: f64,
    viewport_width: f64,

    tracks: Arc<Vec<Track>>,

    selected_clip_id: Option<ClipId>,
    active_track_id: Option<TrackId>,
    selected_frame_index: Option<usize>,
    hovered_frame_index: Option<usize>,
    trim_start: f64,
    trim_end: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        let zoom_range = ZoomRange::from_config(&config);
        Self {
            zoom_range,
            snapping: SnappingEngine::from_config(&config),
            scroll_guard: ScrollGuard::from_millis(config.scroll_settle_ms),
            duration: 0.0,
            current_time: 0.0,
            is_playing: false,
            zoom: zoom_range.clamp(1.0),
            scroll_left: 0.0,
            base_width: config.base_width.max(0.0),
            viewport_width: 0.0,
            tracks: Arc::new(Vec::new()),
            selected_clip_id: None,
            active_track_id: None,
            selected_frame_index: None,
            hovered_frame_index: None,
            trim_start: 0.0,
            trim_end: 0.0,
            config,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Shared handle to the current track list.
    pub fn tracks_arc(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.tracks)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn base_width(&self) -> f64 {
        self.base_width
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn selected_clip_id(&self) -> Option<ClipId> {
        self.selected_clip_id
    }

    pub fn active_track_id(&self) -> Option<TrackId> {
        self.active_track_id
    }

    pub fn selected_frame_index(&self) -> Option<usize> {
        self.selected_frame_index
    }

    pub fn hovered_frame_index(&self) -> Option<usize> {
        self.hovered_frame_index
    }

    pub fn trim_range(&self) -> TimeRange {
        TimeRange::new(self.trim_start, self.trim_end)
    }

    pub fn snapping(&self) -> &SnappingEngine {
        &self.snapping
    }

    pub fn coordinate_params(&self) -> CoordinateParams {
        CoordinateParams {
            duration: self.duration,
            base_width: self.base_width,
            zoom: self.zoom,
            scroll_left: self.scroll_left,
        }
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_index(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Find a clip anywhere on the timeline. Returns (track id, &Clip).
    pub fn find_clip(&self, id: ClipId) -> Option<(TrackId, &Clip)> {
        self.tracks
            .iter()
            .find_map(|track| track.clip(id).map(|clip| (track.id, clip)))
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_clip_id
            .and_then(|id| self.find_clip(id))
            .map(|(_, clip)| clip)
    }

    /// Whether every model invariant currently holds.
    pub fn is_consistent(&self) -> bool {
        let min = self.config.min_clip_duration;
        let bounds_ok = |clip: &Clip| {
            clip.start >= 0.0
                && clip.end <= self.duration + TIME_EPSILON
                && clip.offset >= 0.0
                && clip.meets_min_duration(min)
        };
        self.current_time >= 0.0
            && self.current_time <= self.duration
            && self.scroll_left >= 0.0
            && self.zoom_range.contains(self.zoom)
            && self.trim_start <= self.trim_end
            && self
                .tracks
                .iter()
                .all(|track| track.is_overlap_free() && track.clips().iter().all(bounds_ok))
    }

    // ── Playback ────────────────────────────────────────────────

    /// Set the timeline duration.
    ///
    /// Resets the trim range end to the new duration. Clips that extend past
    /// a shorter duration are truncated; clips left shorter than the minimum
    /// are dropped.
    pub fn set_duration(&mut self, duration: f64) {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        self.duration = duration;
        self.current_time = clamp_time(self.current_time, duration);
        self.trim_end = duration;
        self.trim_start = self.trim_start.min(duration);

        let overflows = self
            .tracks
            .iter()
            .any(|t| t.clips().iter().any(|c| c.end > duration));
        if overflows {
            let min = self.config.min_clip_duration;
            let mut dropped = Vec::new();
            let mut tracks = (*self.tracks).clone();
            for track in &mut tracks {
                track.retain_clips(|clip| {
                    if clip.end > duration {
                        clip.end = duration;
                        clip.start = clip.start.min(duration);
                    }
                    let keep = clip.meets_min_duration(min);
                    if !keep {
                        dropped.push(clip.id);
                    }
                    keep
                });
            }
            if self.selected_clip_id.is_some_and(|id| dropped.contains(&id)) {
                self.selected_clip_id = None;
            }
            debug!("Duration {duration:.3}s truncated clips, dropped {}", dropped.len());
            self.tracks = Arc::new(tracks);
        }
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = clamp_time(time, self.duration);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_trim_start(&mut self, time: f64) {
        self.trim_start = pixel::clamp(clamp_time(time, self.duration), 0.0, self.trim_end);
    }

    pub fn set_trim_end(&mut self, time: f64) {
        let time = clamp_time(time, self.duration);
        self.trim_end = pixel::clamp(time, self.trim_start, self.duration);
    }

    pub fn set_selected_frame_index(&mut self, index: Option<usize>) {
        self.selected_frame_index = index;
    }

    pub fn set_hovered_frame_index(&mut self, index: Option<usize>) {
        self.hovered_frame_index = index;
    }

    // ── Zoom and scroll ─────────────────────────────────────────

    /// Set zoom without touching scroll.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.zoom_range.clamp(zoom);
    }

    /// Zoom keeping the viewport centre stationary.
    pub fn zoom_to(&mut self, zoom: f64, viewport_width: f64) {
        self.set_viewport_width(viewport_width);
        self.zoom_about(zoom, self.viewport_width / 2.0);
    }

    /// Zoom keeping the content under viewport x-position `focus_x` stationary.
    pub fn zoom_about(&mut self, zoom: f64, focus_x: f64) {
        let old = self.zoom;
        let new = self.zoom_range.clamp(zoom);
        self.scroll_left = zoom::focal_zoom_scroll(self.scroll_left, focus_x, old, new);
        self.zoom = new;
    }

    /// Zoom in by the configured step.
    pub fn step_zoom_in(&mut self) {
        self.zoom_to(self.zoom + self.config.zoom_step, self.viewport_width);
    }

    /// Zoom out by the configured step.
    pub fn step_zoom_out(&mut self) {
        self.zoom_to(self.zoom - self.config.zoom_step, self.viewport_width);
    }

    /// Jump to the next larger preset.
    pub fn zoom_preset_in(&mut self) {
        let next = zoom::next_preset_in(self.zoom, &self.config.zoom_presets, self.zoom_range);
        self.zoom_to(next, self.viewport_width);
    }

    /// Jump to the next smaller preset.
    pub fn zoom_preset_out(&mut self) {
        let next = zoom::next_preset_out(self.zoom, &self.config.zoom_presets, self.zoom_range);
        self.zoom_to(next, self.viewport_width);
    }

    /// Back to 1x, scrolled to the start.
    pub fn reset_zoom(&mut self) {
        self.zoom = self.zoom_range.clamp(1.0);
        self.scroll_left = 0.0;
    }

    pub fn set_scroll_left(&mut self, scroll_left: f64) {
        self.scroll_left = if scroll_left.is_finite() {
            scroll_left.max(0.0)
        } else {
            0.0
        };
    }

    pub fn set_base_width(&mut self, base_width: f64) {
        self.base_width = if base_width.is_finite() {
            base_width.max(0.0)
        } else {
            0.0
        };
    }

    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        if viewport_width.is_finite() {
            self.viewport_width = viewport_width.max(0.0);
        }
    }

    /// Re-derive scroll after the container resized.
    ///
    /// Keeps the time at the left edge of the viewport fixed while the base
    /// width changes. Scroll events are ignored for the duration of the
    /// adjustment plus the settle window.
    pub fn restore_scroll_on_resize(&mut self, base_width: f64, viewport_width: f64, now: Instant) {
        self.scroll_guard.begin_programmatic();

        let left_time = self.coordinate_params().content_px_to_time(self.scroll_left);
        self.set_base_width(base_width);
        self.set_viewport_width(viewport_width);
        let scroll = self.coordinate_params().time_to_px(left_time);
        self.set_scroll_left(scroll);

        self.scroll_guard.end(now);
        debug!(
            "Resize: base width {:.0}px, scroll restored to {:.0}px",
            self.base_width, self.scroll_left
        );
    }

    /// Apply a scroll event from the host. Returns whether it was applied.
    pub fn handle_scroll_event(&mut self, scroll_left: f64, now: Instant) -> bool {
        if !self.scroll_guard.should_handle_scroll(now) {
            return false;
        }
        self.set_scroll_left(scroll_left);
        true
    }

    pub fn set_snapping_enabled(&mut self, enabled: bool) {
        self.snapping.enabled = enabled;
    }

    // ── Tracks ──────────────────────────────────────────────────

    /// Append a track of `kind` with the configured default height.
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let ordinal = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        let track = Track::new(kind, format!("{}{ordinal}", kind.label_prefix()))
            .with_height(kind.default_height(&self.config.track_heights));
        let id = track.id;
        Arc::make_mut(&mut self.tracks).push(track);
        debug!("Added {:?} track {}", kind, id);
        id
    }

    /// Remove a track and its clips.
    pub fn remove_track(&mut self, id: TrackId) -> Result<Track> {
        let idx = self.track_index(id).ok_or(TimelineError::TrackNotFound(id))?;
        let removed = Arc::make_mut(&mut self.tracks).remove(idx);
        if self.active_track_id == Some(id) {
            self.active_track_id = None;
        }
        if self
            .selected_clip_id
            .is_some_and(|clip_id| removed.contains_clip(clip_id))
        {
            self.selected_clip_id = None;
        }
        Ok(removed)
    }

    /// Move the track at `from` to `to`. Out-of-range `to` moves it last.
    pub fn reorder_tracks(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from >= len {
            return false;
        }
        let to = to.min(len - 1);
        if from != to {
            let tracks = Arc::make_mut(&mut self.tracks);
            let track = tracks.remove(from);
            tracks.insert(to, track);
        }
        true
    }

    pub fn set_track_locked(&mut self, id: TrackId, locked: bool) -> Result<()> {
        self.modify_track(id, |track| track.locked = locked)
    }

    pub fn set_track_visible(&mut self, id: TrackId, visible: bool) -> Result<()> {
        self.modify_track(id, |track| track.visible = visible)
    }

    /// Set a track's row height. Heights below one pixel are raised to one.
    pub fn set_track_height(&mut self, id: TrackId, height: f64) -> Result<()> {
        let height = if height.is_finite() { height.max(1.0) } else { 1.0 };
        self.modify_track(id, |track| track.height = height)
    }

    pub fn rename_track(&mut self, id: TrackId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.modify_track(id, |track| track.name = name)
    }

    pub fn set_active_track(&mut self, id: Option<TrackId>) {
        match id {
            Some(id) if self.track_index(id).is_none() => {
                warn!("Ignoring activation of unknown track {}", id);
            }
            _ => self.active_track_id = id,
        }
    }

    // ── Clips ───────────────────────────────────────────────────

    /// Add a clip to a track.
    ///
    /// Bounds are clamped into `[0, duration]` and a negative offset is
    /// raised to zero before validation.
    pub fn add_clip(&mut self, track_id: TrackId, clip: Clip) -> Result<ClipId> {
        let idx = self.editable_track(track_id)?;
        if self.find_clip(clip.id).is_some() {
            return Err(TimelineError::DuplicateClip(clip.id));
        }
        let clip = self.normalized(clip);
        self.validate_clip(&self.tracks[idx], &clip)?;

        let id = clip.id;
        let mut track = self.tracks[idx].clone();
        track.insert_sorted(clip);
        self.commit_track(idx, track);
        Ok(id)
    }

    /// Apply a partial update to a clip. The patch is applied literally;
    /// use [`Self::trim_clip_to`] for edge edits that keep `offset` in step.
    pub fn update_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        patch: &ClipPatch,
    ) -> Result<()> {
        let (idx, current) = self.editable_clip(track_id, clip_id)?;
        let next = self.normalized(patch.apply_to(&current));
        self.commit_clip(idx, next).map(|_| ())
    }

    pub fn remove_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Result<Clip> {
        let idx = self.editable_track(track_id)?;
        let mut track = self.tracks[idx].clone();
        let removed = track
            .remove_clip(clip_id)
            .ok_or(TimelineError::ClipNotFound(clip_id))?;
        self.commit_track(idx, track);
        if self.selected_clip_id == Some(clip_id) {
            self.selected_clip_id = None;
        }
        Ok(removed)
    }

    /// Move a clip to `new_start`, preserving its duration.
    ///
    /// The start is clamped so the clip stays inside the timeline; a move
    /// onto another clip is rejected.
    pub fn move_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        new_start: f64,
    ) -> Result<ClipBounds> {
        let (idx, clip) = self.editable_clip(track_id, clip_id)?;
        let dur = clip.duration();
        let latest = (self.duration - dur).max(0.0);
        let new_start = if new_start.is_nan() { 0.0 } else { new_start };
        let (start, end) = if new_start >= latest {
            (latest, self.duration.max(dur))
        } else {
            let start = new_start.max(0.0);
            (start, start + dur)
        };
        let next = ClipBounds {
            start,
            end,
            offset: clip.offset,
        }
        .apply_to(&clip);
        self.commit_clip(idx, next)
    }

    /// Begin a drag gesture on a clip; selects the clip and its track.
    pub fn begin_drag(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        pointer_x: f64,
    ) -> Result<DragState> {
        let (_, clip) = self.editable_clip(track_id, clip_id)?;
        self.selected_clip_id = Some(clip_id);
        self.active_track_id = Some(track_id);
        Ok(DragState {
            track_id,
            clip_id,
            anchor_start: clip.start,
            origin_x: pointer_x,
        })
    }

    /// Continue a drag gesture with the pointer at `pointer_x`.
    pub fn drag_clip(&mut self, drag: &DragState, pointer_x: f64) -> Result<ClipBounds> {
        let delta = self.coordinate_params().delta_px_to_time(pointer_x - drag.origin_x);
        self.drag_clip_to(drag.track_id, drag.clip_id, drag.anchor_start + delta)
    }

    /// Drag a clip so it starts near `proposed_start`, with snapping and
    /// neighbour clamping applied.
    pub fn drag_clip_to(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        proposed_start: f64,
    ) -> Result<ClipBounds> {
        let (idx, clip) = self.editable_clip(track_id, clip_id)?;
        let gap = Gap::from(self.tracks[idx].gap_around(&clip, self.duration));
        let (start, end) = {
            let snap = self.snapper(clip_id);
            plan_move(proposed_start, clip.duration(), gap, snap)
        };
        let next = ClipBounds {
            start,
            end,
            offset: clip.offset,
        }
        .apply_to(&clip);
        self.commit_clip(idx, next)
    }

    /// Begin a trim gesture on one edge of a clip.
    pub fn begin_trim(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        edge: TrimEdge,
        pointer_x: f64,
    ) -> Result<TrimState> {
        let (_, clip) = self.editable_clip(track_id, clip_id)?;
        self.selected_clip_id = Some(clip_id);
        let anchor_time = match edge {
            TrimEdge::Left => clip.start,
            TrimEdge::Right => clip.end,
        };
        Ok(TrimState {
            track_id,
            clip_id,
            edge,
            anchor_time,
            origin_x: pointer_x,
        })
    }

    /// Continue a trim gesture with the pointer at `pointer_x`.
    pub fn trim_clip(&mut self, trim: &TrimState, pointer_x: f64) -> Result<ClipBounds> {
        let delta = self.coordinate_params().delta_px_to_time(pointer_x - trim.origin_x);
        self.trim_clip_to(trim.track_id, trim.clip_id, trim.edge, trim.anchor_time + delta)
    }

    /// Move one edge of a clip towards `time`. A left-edge trim advances
    /// `offset` by the same amount `start` moves.
    pub fn trim_clip_to(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        edge: TrimEdge,
        time: f64,
    ) -> Result<ClipBounds> {
        let (idx, clip) = self.editable_clip(track_id, clip_id)?;
        let gap = Gap::from(self.tracks[idx].gap_around(&clip, self.duration));
        let bounds = {
            let snap = self.snapper(clip_id);
            plan_trim(&clip, edge, time, gap, self.config.min_clip_duration, snap)
        };
        self.commit_clip(idx, bounds.apply_to(&clip))
    }

    /// Split a clip at timeline time `at`. Returns the id of the right half.
    pub fn split_clip(&mut self, track_id: TrackId, clip_id: ClipId, at: f64) -> Result<ClipId> {
        let (idx, clip) = self.editable_clip(track_id, clip_id)?;
        let (left, right) = clip
            .split_at(at, self.config.min_clip_duration)
            .ok_or(TimelineError::InvalidSplit { at })?;
        let right_id = right.id;

        let mut track = self.tracks[idx].clone();
        track.replace_clip(left);
        track.insert_sorted(right);
        self.commit_track(idx, track);
        debug!("Split clip {} at {:.3}s", clip_id, at);
        Ok(right_id)
    }

    /// Copy a clip into the space directly after it. Returns the new id.
    pub fn duplicate_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Result<ClipId> {
        let (idx, clip) = self.editable_clip(track_id, clip_id)?;
        let (_, hi) = self.tracks[idx].gap_around(&clip, self.duration);
        let dur = clip.duration();
        if clip.end + dur > hi + TIME_EPSILON {
            return Err(TimelineError::NoRoom(track_id));
        }

        let mut copy = clip.duplicate();
        copy.start = clip.end;
        copy.end = (clip.end + dur).min(hi);
        let id = copy.id;
        let mut track = self.tracks[idx].clone();
        track.insert_sorted(copy);
        self.commit_track(idx, track);
        Ok(id)
    }

    /// Place newly imported media on the timeline.
    ///
    /// An empty timeline takes the media's duration. The clip spans the
    /// whole media (capped at the timeline end) and goes on the active track
    /// when that track has the right kind and room; otherwise a new track is
    /// created. The receiving track becomes active.
    pub fn import_media(
        &mut self,
        src: impl Into<MediaRef>,
        media_duration: f64,
        kind: TrackKind,
    ) -> Result<(TrackId, ClipId)> {
        let src = src.into();
        let media_duration = if media_duration.is_finite() {
            media_duration.max(0.0)
        } else {
            0.0
        };
        let adopt_duration = self.duration <= 0.0;
        let timeline_end = if adopt_duration {
            media_duration
        } else {
            self.duration
        };

        let clip = Clip::new(src.clone(), 0.0, media_duration.min(timeline_end));
        if !clip.meets_min_duration(self.config.min_clip_duration) {
            return Err(TimelineError::BelowMinDuration {
                duration: clip.duration(),
                min: self.config.min_clip_duration,
            });
        }
        if adopt_duration {
            self.set_duration(media_duration);
        }

        let target = self
            .active_track_id
            .and_then(|id| self.track(id))
            .filter(|t| t.kind == kind && !t.locked && t.can_place(&clip))
            .map(|t| t.id);
        let track_id = match target {
            Some(id) => id,
            None => self.add_track(kind),
        };
        let clip_id = self.add_clip(track_id, clip)?;
        self.active_track_id = Some(track_id);
        info!("Imported {} onto track {}", src, track_id);
        Ok((track_id, clip_id))
    }

    pub fn set_selected_clip(&mut self, id: Option<ClipId>) {
        match id {
            Some(id) if self.find_clip(id).is_none() => {
                warn!("Ignoring selection of unknown clip {}", id);
            }
            _ => self.selected_clip_id = id,
        }
    }

    /// Return to the empty state, keeping configuration.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    // ── Internals ───────────────────────────────────────────────

    fn editable_track(&self, id: TrackId) -> Result<usize> {
        let idx = self.track_index(id).ok_or(TimelineError::TrackNotFound(id))?;
        if self.tracks[idx].locked {
            return Err(TimelineError::TrackLocked(id));
        }
        Ok(idx)
    }

    fn editable_clip(&self, track_id: TrackId, clip_id: ClipId) -> Result<(usize, Clip)> {
        let idx = self.editable_track(track_id)?;
        let clip = self.tracks[idx]
            .clip(clip_id)
            .cloned()
            .ok_or(TimelineError::ClipNotFound(clip_id))?;
        Ok((idx, clip))
    }

    fn normalized(&self, mut clip: Clip) -> Clip {
        clip.start = clamp_time(clip.start, self.duration);
        clip.end = clamp_time(clip.end, self.duration);
        clip.offset = if clip.offset.is_finite() {
            clip.offset.max(0.0)
        } else {
            0.0
        };
        clip
    }

    fn validate_clip(&self, track: &Track, clip: &Clip) -> Result<()> {
        let min = self.config.min_clip_duration;
        if !clip.meets_min_duration(min) {
            return Err(TimelineError::BelowMinDuration {
                duration: clip.duration(),
                min,
            });
        }
        if let Some(other) = track.first_conflict(clip) {
            return Err(TimelineError::Overlap {
                clip: clip.id,
                other: other.id,
            });
        }
        Ok(())
    }

    /// Validate `next` against its track and swap it in.
    fn commit_clip(&mut self, idx: usize, next: Clip) -> Result<ClipBounds> {
        self.validate_clip(&self.tracks[idx], &next)?;
        let bounds = ClipBounds::of(&next);
        let mut track = self.tracks[idx].clone();
        track.replace_clip(next);
        self.commit_track(idx, track);
        Ok(bounds)
    }

    fn commit_track(&mut self, idx: usize, track: Track) {
        Arc::make_mut(&mut self.tracks)[idx] = track;
    }

    fn modify_track(&mut self, id: TrackId, f: impl FnOnce(&mut Track)) -> Result<()> {
        let idx = self.track_index(id).ok_or(TimelineError::TrackNotFound(id))?;
        let mut track = self.tracks[idx].clone();
        f(&mut track);
        self.commit_track(idx, track);
        Ok(())
    }

    /// Snap function for edits of `moving`, whose own edges are excluded.
    fn snapper(&self, moving: ClipId) -> impl Fn(f64) -> Option<f64> + '_ {
        let points = self.snapping.collect_snap_points(
            &self.tracks,
            self.duration,
            self.current_time,
            Some(moving),
        );
        let params = self.coordinate_params();
        move |time| {
            self.snapping
                .find_snap(time, &points, &params)
                .map(|sp| sp.time)
        }
    }
}
