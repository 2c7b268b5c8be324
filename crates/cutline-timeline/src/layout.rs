//! Derived layout: track rows, hit testing, clip rectangles and
//! thumbnail slots.
//!
//! Nothing here is stored; every value is recomputed from the track list and
//! [`CoordinateParams`] so a zoom or height change cannot leave stale
//! geometry behind.

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::coords::{index_to_px, CoordinateParams};
use crate::track::{Track, TrackId, TrackKind};

/// Vertical placement of one track row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub track_id: TrackId,
    pub index: usize,
    pub kind: TrackKind,
    pub y_offset: f64,
    pub height: f64,
}

impl TrackLayout {
    pub fn y_end(&self) -> f64 {
        self.y_offset + self.height
    }

    /// Half-open vertical containment.
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y_offset && y < self.y_end()
    }
}

/// Layout of every track, top to bottom.
pub fn calculate_layout(tracks: &[Track]) -> Vec<TrackLayout> {
    let mut y = 0.0;
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let layout = TrackLayout {
                track_id: track.id,
                index,
                kind: track.kind,
                y_offset: y,
                height: track.height,
            };
            y += track.height;
            layout
        })
        .collect()
}

/// Layout of a single track by id.
pub fn track_layout(tracks: &[Track], id: TrackId) -> Option<TrackLayout> {
    calculate_layout(tracks).into_iter().find(|l| l.track_id == id)
}

/// Y offset of the track at `index` (sum of the heights above it).
pub fn track_y_offset(tracks: &[Track], index: usize) -> Option<f64> {
    (index < tracks.len()).then(|| tracks[..index].iter().map(|t| t.height).sum())
}

pub fn total_height(tracks: &[Track]) -> f64 {
    tracks.iter().map(|t| t.height).sum()
}

/// Index of the track row under `y`, if any.
pub fn track_index_at_y(tracks: &[Track], y: f64) -> Option<usize> {
    hitmap(tracks).track_index_at(y)
}

/// Vertical hit-test map, precomputed once per layout change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitMap {
    rows: Vec<TrackLayout>,
}

/// Build a hit map for the current track list.
pub fn hitmap(tracks: &[Track]) -> HitMap {
    HitMap {
        rows: calculate_layout(tracks),
    }
}

impl HitMap {
    pub fn rows(&self) -> &[TrackLayout] {
        &self.rows
    }

    pub fn row_at(&self, y: f64) -> Option<&TrackLayout> {
        // Rows are contiguous and sorted by y_offset.
        let idx = self.rows.partition_point(|row| row.y_offset <= y);
        idx.checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .filter(|row| row.contains_y(y))
    }

    pub fn track_index_at(&self, y: f64) -> Option<usize> {
        self.row_at(y).map(|row| row.index)
    }

    pub fn track_at(&self, y: f64) -> Option<TrackId> {
        self.row_at(y).map(|row| row.track_id)
    }
}

/// Horizontal placement of a clip in content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRect {
    pub left: f64,
    pub width: f64,
}

impl ClipRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Pixel rectangle of a clip. Both edges go through the same rounding as
/// the playhead and thumbnails; the width is at least one pixel.
pub fn clip_position(clip: &Clip, params: &CoordinateParams) -> ClipRect {
    let left = params.time_to_px(clip.start);
    let right = params.time_to_px(clip.end);
    ClipRect {
        left,
        width: (right - left).max(1.0),
    }
}

/// One slot of the thumbnail strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSlot {
    pub index: usize,
    /// Timeline time the thumbnail represents.
    pub time: f64,
    pub left: f64,
    pub width: f64,
}

/// Evenly spaced thumbnail slots spanning the whole content width.
pub fn thumbnail_slots(params: &CoordinateParams, count: usize) -> Vec<ThumbnailSlot> {
    if count == 0 || params.duration <= 0.0 {
        return Vec::new();
    }
    let item_width = params.thumbnail_width(count);
    (0..count)
        .map(|index| {
            let left = index_to_px(index, item_width);
            let right = index_to_px(index + 1, item_width);
            ThumbnailSlot {
                index,
                time: index as f64 * params.duration / count as f64,
                left,
                width: right - left,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<Track> {
        vec![
            Track::new_video("V1"),
            Track::new_audio("A1"),
            Track::new_effect("FX1"),
        ]
    }

    #[test]
    fn test_layout_offsets() {
        let tracks = tracks();
        let layout = calculate_layout(&tracks);
        let offsets: Vec<f64> = layout.iter().map(|l| l.y_offset).collect();
        assert_eq!(offsets, vec![0.0, 80.0, 140.0]);
        assert_eq!(total_height(&tracks), 180.0);
        assert_eq!(track_y_offset(&tracks, 2), Some(140.0));
        assert_eq!(track_y_offset(&tracks, 3), None);
        assert_eq!(track_layout(&tracks, tracks[1].id).map(|l| l.height), Some(60.0));
    }

    #[test]
    fn test_track_index_at_y() {
        let tracks = tracks();
        assert_eq!(track_index_at_y(&tracks, 0.0), Some(0));
        assert_eq!(track_index_at_y(&tracks, 79.9), Some(0));
        assert_eq!(track_index_at_y(&tracks, 80.0), Some(1));
        assert_eq!(track_index_at_y(&tracks, 179.0), Some(2));
        assert_eq!(track_index_at_y(&tracks, 180.0), None);
        assert_eq!(track_index_at_y(&tracks, -1.0), None);
        assert_eq!(track_index_at_y(&[], 10.0), None);
    }

    #[test]
    fn test_hitmap_track_at() {
        let tracks = tracks();
        let map = hitmap(&tracks);
        assert_eq!(map.track_at(100.0), Some(tracks[1].id));
        assert_eq!(map.rows().len(), 3);
    }

    #[test]
    fn test_clip_position() {
        let params = CoordinateParams::new(10.0, 1000.0).with_zoom(2.0);
        let clip = Clip::new("a.mp4", 1.0, 2.5);
        let rect = clip_position(&clip, &params);
        assert_eq!(rect.left, 200.0);
        assert_eq!(rect.width, 300.0);
        assert_eq!(rect.right(), 500.0);
    }

    #[test]
    fn test_thumbnail_slots_tile_the_content() {
        let params = CoordinateParams::new(7.3, 1000.0).with_zoom(1.7);
        let slots = thumbnail_slots(&params, 13);
        assert_eq!(slots.len(), 13);
        assert_eq!(slots[0].left, 0.0);
        for pair in slots.windows(2) {
            assert_eq!(pair[0].left + pair[0].width, pair[1].left);
        }
        let last = slots[slots.len() - 1];
        assert_eq!(last.left + last.width, params.content_width());
    }

    #[test]
    fn test_clip_and_thumbnail_edges_coincide() {
        for &zoom in &[0.5, 1.0, 2.0, 4.0] {
            let params = CoordinateParams::new(10.0, 1600.0).with_zoom(zoom);
            let slots = thumbnail_slots(&params, 20);
            let clip = Clip::new("a.mp4", slots[4].time, slots[9].time);
            let rect = clip_position(&clip, &params);
            assert_eq!(rect.left, slots[4].left);
            assert_eq!(rect.right(), slots[9].left);
        }
    }

    #[test]
    fn test_no_slots_without_duration() {
        assert!(thumbnail_slots(&CoordinateParams::new(0.0, 1000.0), 20).is_empty());
    }
}
