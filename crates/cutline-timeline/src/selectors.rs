//! Grouped read views over [`Timeline`] for UI consumers.

use serde::Serialize;

use crate::clip::ClipId;
use crate::coords::TimeRange;
use crate::state::Timeline;
use crate::track::TrackId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub zoom: f64,
    pub scroll_left: f64,
    pub base_width: f64,
    pub viewport_width: f64,
    /// Zoomed content width in pixels.
    pub content_width: f64,
    pub visible: TimeRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionState {
    pub selected_clip_id: Option<ClipId>,
    pub active_track_id: Option<TrackId>,
    pub selected_frame_index: Option<usize>,
    pub hovered_frame_index: Option<usize>,
    pub trim: TimeRange,
}

impl Timeline {
    pub fn playback(&self) -> PlaybackState {
        PlaybackState {
            current_time: self.current_time(),
            duration: self.duration(),
            is_playing: self.is_playing(),
        }
    }

    pub fn view(&self) -> ViewState {
        let params = self.coordinate_params();
        ViewState {
            zoom: self.zoom(),
            scroll_left: self.scroll_left(),
            base_width: self.base_width(),
            viewport_width: self.viewport_width(),
            content_width: params.content_width(),
            visible: params.visible_range(self.viewport_width()),
        }
    }

    pub fn selection(&self) -> SelectionState {
        SelectionState {
            selected_clip_id: self.selected_clip_id(),
            active_track_id: self.active_track_id(),
            selected_frame_index: self.selected_frame_index(),
            hovered_frame_index: self.hovered_frame_index(),
            trim: self.trim_range(),
        }
    }

    /// Playhead position in content pixels.
    pub fn playhead_px(&self) -> f64 {
        self.coordinate_params().time_to_px(self.current_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackKind;

    #[test]
    fn test_view_state() {
        let mut t = Timeline::new();
        t.set_base_width(1000.0);
        t.set_duration(10.0);
        t.zoom_to(2.0, 500.0);
        t.set_scroll_left(400.0);

        let view = t.view();
        assert_eq!(view.content_width, 2000.0);
        assert_eq!(view.visible, TimeRange::new(2.0, 4.5));
    }

    #[test]
    fn test_playback_and_selection() {
        let mut t = Timeline::new();
        t.set_duration(8.0);
        t.set_current_time(3.0);
        t.set_playing(true);
        let track = t.add_track(TrackKind::Audio);
        t.set_active_track(Some(track));
        t.set_hovered_frame_index(Some(4));

        assert_eq!(
            t.playback(),
            PlaybackState {
                current_time: 3.0,
                duration: 8.0,
                is_playing: true
            }
        );
        let selection = t.selection();
        assert_eq!(selection.active_track_id, Some(track));
        assert_eq!(selection.hovered_frame_index, Some(4));
        assert_eq!(selection.trim, TimeRange::new(0.0, 8.0));
    }

    #[test]
    fn test_playhead_px_matches_clip_edges() {
        let mut t = Timeline::new();
        t.set_base_width(1600.0);
        t.set_duration(10.0);
        for zoom in [0.5, 1.0, 2.0, 4.0] {
            t.set_zoom(zoom);
            t.set_current_time(2.5);
            let clip = crate::clip::Clip::new("a.mp4", 2.5, 4.0);
            let rect = crate::layout::clip_position(&clip, &t.coordinate_params());
            assert_eq!(t.playhead_px(), rect.left);
        }
    }
}
