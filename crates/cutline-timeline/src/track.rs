//! Track types for the timeline.

use cutline_core::config::TrackHeights;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::{Clip, ClipId};

pub type TrackId = Uuid;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Effect,
}

impl TrackKind {
    /// Default row height for this kind.
    pub fn default_height(self, heights: &TrackHeights) -> f64 {
        match self {
            TrackKind::Video => heights.video,
            TrackKind::Audio => heights.audio,
            TrackKind::Effect => heights.effect,
        }
    }

    /// Whether clips on this track paint pixels.
    pub fn is_visual(self) -> bool {
        matches!(self, TrackKind::Video)
    }

    /// Short label prefix used for auto-generated names ("V1", "A2", ...).
    pub fn label_prefix(self) -> &'static str {
        match self {
            TrackKind::Video => "V",
            TrackKind::Audio => "A",
            TrackKind::Effect => "FX",
        }
    }
}

/// A track holding non-overlapping clips ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub kind: TrackKind,
    /// Row height in pixels.
    pub height: f64,
    clips: Vec<Clip>,
    /// Locked tracks reject clip edits.
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Track {
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            height: kind.default_height(&TrackHeights::default()),
            clips: Vec::new(),
            locked: false,
            visible: true,
        }
    }

    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Video, name)
    }

    /// Create a new audio track.
    pub fn new_audio(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Audio, name)
    }

    /// Create a new effect track.
    pub fn new_effect(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Effect, name)
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Clips ordered by start time.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Find a clip by id. Returns (index, &Clip).
    pub fn find_clip(&self, id: ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id == id)
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.find_clip(id).map(|(_, clip)| clip)
    }

    pub fn contains_clip(&self, id: ClipId) -> bool {
        self.find_clip(id).is_some()
    }

    /// First clip (other than `clip` itself) that `clip` would overlap.
    pub fn first_conflict(&self, clip: &Clip) -> Option<&Clip> {
        self.clips
            .iter()
            .find(|other| other.id != clip.id && other.overlaps(clip))
    }

    /// Whether `clip` fits without overlapping any other clip.
    pub fn can_place(&self, clip: &Clip) -> bool {
        self.first_conflict(clip).is_none()
    }

    /// Free interval around a clip: `(end of previous clip or 0, start of
    /// next clip or timeline_duration)`.
    pub fn gap_around(&self, clip: &Clip, timeline_duration: f64) -> (f64, f64) {
        let lo = self
            .clips
            .iter()
            .filter(|other| other.id != clip.id && other.end <= clip.start)
            .map(|other| other.end)
            .fold(0.0, f64::max);
        let hi = self
            .clips
            .iter()
            .filter(|other| other.id != clip.id && other.start >= clip.end)
            .map(|other| other.start)
            .fold(timeline_duration, f64::min);
        (lo, hi)
    }

    /// The clip active at `time`, if any.
    pub fn active_clip_at(&self, time: f64) -> Option<&Clip> {
        let idx = self.clips.partition_point(|clip| clip.start <= time);
        idx.checked_sub(1)
            .and_then(|i| self.clips.get(i))
            .filter(|clip| clip.is_active_at(time))
    }

    /// End of the last clip, or 0 for an empty track.
    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(|clip| clip.end).fold(0.0, f64::max)
    }

    /// Whether clips are sorted and pairwise non-overlapping.
    pub fn is_overlap_free(&self) -> bool {
        self.clips.windows(2).all(|pair| pair[0].end <= pair[1].start)
    }

    /// Insert a clip keeping start-time order. Does not check overlap.
    pub(crate) fn insert_sorted(&mut self, clip: Clip) {
        let idx = self.clips.partition_point(|c| c.start <= clip.start);
        self.clips.insert(idx, clip);
    }

    /// Replace a clip by id, restoring start-time order.
    pub(crate) fn replace_clip(&mut self, clip: Clip) -> bool {
        match self.clips.iter().position(|c| c.id == clip.id) {
            Some(idx) => {
                self.clips.remove(idx);
                self.insert_sorted(clip);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let idx = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(idx))
    }

    pub(crate) fn retain_clips(&mut self, f: impl FnMut(&mut Clip) -> bool) {
        self.clips.retain_mut(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(clips: &[(f64, f64)]) -> Track {
        let mut track = Track::new_video("V1");
        for &(start, end) in clips {
            track.insert_sorted(Clip::new("a.mp4", start, end));
        }
        track
    }

    #[test]
    fn test_new_track_heights() {
        assert_eq!(Track::new_video("V").height, 80.0);
        assert_eq!(Track::new_audio("A").height, 60.0);
        assert_eq!(Track::new_effect("FX").height, 40.0);
    }

    #[test]
    fn test_insert_keeps_order() {
        let track = track_with(&[(5.0, 6.0), (0.0, 1.0), (2.0, 3.0)]);
        let starts: Vec<f64> = track.clips().iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 2.0, 5.0]);
        assert!(track.is_overlap_free());
    }

    #[test]
    fn test_can_place() {
        let track = track_with(&[(0.0, 5.0)]);
        assert!(track.can_place(&Clip::new("b.mp4", 5.0, 8.0)));
        assert!(!track.can_place(&Clip::new("b.mp4", 4.0, 8.0)));
    }

    #[test]
    fn test_can_place_ignores_self() {
        let track = track_with(&[(0.0, 5.0)]);
        let mut moved = track.clips()[0].clone();
        moved.start = 1.0;
        moved.end = 6.0;
        assert!(track.can_place(&moved));
    }

    #[test]
    fn test_gap_around() {
        let track = track_with(&[(0.0, 2.0), (4.0, 6.0), (8.0, 9.0)]);
        let middle = track.clips()[1].clone();
        assert_eq!(track.gap_around(&middle, 10.0), (2.0, 8.0));
        let last = track.clips()[2].clone();
        assert_eq!(track.gap_around(&last, 10.0), (6.0, 10.0));
    }

    #[test]
    fn test_active_clip_at() {
        let track = track_with(&[(0.0, 2.0), (4.0, 6.0)]);
        assert_eq!(track.active_clip_at(1.0).map(|c| c.start), Some(0.0));
        assert!(track.active_clip_at(2.0).is_none());
        assert!(track.active_clip_at(3.0).is_none());
        assert_eq!(track.active_clip_at(4.0).map(|c| c.start), Some(4.0));
        assert!(track.active_clip_at(6.0).is_none());
    }

    #[test]
    fn test_replace_and_remove() {
        let mut track = track_with(&[(0.0, 2.0), (4.0, 6.0)]);
        let mut first = track.clips()[0].clone();
        first.start = 7.0;
        first.end = 8.0;
        assert!(track.replace_clip(first.clone()));
        assert_eq!(track.clips()[1].id, first.id);

        assert_eq!(track.remove_clip(first.id).map(|c| c.id), Some(first.id));
        assert_eq!(track.clip_count(), 1);
        assert!(track.remove_clip(first.id).is_none());
    }

    #[test]
    fn test_kind_json() {
        assert_eq!(serde_json::to_string(&TrackKind::Effect).unwrap(), "\"effect\"");
    }
}
