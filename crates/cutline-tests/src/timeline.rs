//! Integration tests for the timeline subsystem.
//!
//! Exercises the edit engine through the shared handle and checks that
//! every layout consumer derives positions from the same coordinates.

use cutline_core::{EditorConfig, MIN_CLIP_DURATION};
use cutline_timeline::layout::{clip_position, thumbnail_slots};
use cutline_timeline::{
    Clip, ClipPatch, SharedTimeline, Timeline, TimelineError, TrackKind, TrimEdge,
};

// ── Helpers ────────────────────────────────────────────────────

fn timeline(duration: f64) -> Timeline {
    let mut timeline = Timeline::with_config(EditorConfig::default().timeline);
    timeline.set_duration(duration);
    timeline.set_base_width(1000.0);
    timeline
}

fn assert_invariants(timeline: &Timeline) {
    assert!(timeline.is_consistent());
    for track in timeline.tracks() {
        assert!(track.is_overlap_free(), "overlap on {}", track.name);
        for clip in track.clips() {
            assert!(clip.duration() >= MIN_CLIP_DURATION - 1e-9);
            assert!(clip.start >= 0.0 && clip.end <= timeline.duration());
        }
    }
}

// ── Placement invariants ───────────────────────────────────────

#[test]
fn edits_never_produce_overlaps() {
    let shared = SharedTimeline::new(timeline(20.0));
    let (track, a, b) = shared.update(|t| {
        let track = t.add_track(TrackKind::Video);
        let a = t.add_clip(track, Clip::new("a.mp4", 0.0, 4.0)).unwrap();
        let b = t.add_clip(track, Clip::new("b.mp4", 6.0, 10.0)).unwrap();
        (track, a, b)
    });

    shared.update(|t| {
        // Rejected outright: the model stays as it was.
        let err = t.move_clip(track, a, 7.0).unwrap_err();
        assert!(matches!(err, TimelineError::Overlap { .. }));
        let err = t
            .update_clip(track, b, &ClipPatch::bounds(3.0, 8.0))
            .unwrap_err();
        assert!(matches!(err, TimelineError::Overlap { .. }));
        assert_eq!(t.track(track).unwrap().clip(a).unwrap().start, 0.0);

        // Clamped against the neighbour.
        let bounds = t.drag_clip_to(track, a, 4.5).unwrap();
        assert_eq!((bounds.start, bounds.end), (2.0, 6.0));
        let bounds = t.trim_clip_to(track, b, TrimEdge::Left, 1.0).unwrap();
        assert_eq!(bounds.start, 6.0);

        // Trim never goes below the minimum duration.
        let bounds = t.trim_clip_to(track, b, TrimEdge::Right, 6.0).unwrap();
        assert!((bounds.end - bounds.start - MIN_CLIP_DURATION).abs() < 1e-9);

        assert_invariants(t);
    });
}

#[test]
fn left_trim_advances_offset() {
    let mut t = timeline(10.0);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 0.0, 5.0)).unwrap();

    let bounds = t.trim_clip_to(track, clip, TrimEdge::Left, 2.0).unwrap();
    assert_eq!((bounds.start, bounds.end, bounds.offset), (2.0, 5.0, 2.0));

    let stored = t.track(track).unwrap().clip(clip).unwrap();
    assert_eq!(stored.offset, 2.0);
    assert_eq!(stored.end, 5.0);
    assert_eq!(stored.source_time_at(2.0), Some(2.0));
}

#[test]
fn drag_past_end_is_clamped_to_timeline() {
    let mut t = timeline(10.0);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 0.0, 3.0)).unwrap();

    let bounds = t.drag_clip_to(track, clip, 9.0).unwrap();
    assert_eq!((bounds.start, bounds.end), (7.0, 10.0));
    assert_invariants(&t);
}

#[test]
fn split_then_duplicate_keeps_track_ordered() {
    let mut t = timeline(30.0);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 0.0, 10.0)).unwrap();

    let right = t.split_clip(track, clip, 4.0).unwrap();
    let copy = t.duplicate_clip(track, right).unwrap();

    let starts: Vec<f64> = t.track(track).unwrap().clips().iter().map(|c| c.start).collect();
    assert_eq!(starts, vec![0.0, 4.0, 10.0]);
    let copy = t.track(track).unwrap().clip(copy).unwrap();
    assert_eq!((copy.end, copy.offset), (16.0, 4.0));
    assert_invariants(&t);
}

#[test]
fn locked_track_rejects_edits() {
    let mut t = timeline(10.0);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 0.0, 3.0)).unwrap();
    t.set_track_locked(track, true).unwrap();

    assert_eq!(
        t.move_clip(track, clip, 5.0),
        Err(TimelineError::TrackLocked(track))
    );
    assert_eq!(t.track(track).unwrap().clip(clip).unwrap().start, 0.0);
}

// ── Zoom and alignment ─────────────────────────────────────────

#[test]
fn zoom_round_trip_restores_scroll() {
    let mut t = timeline(60.0);
    t.set_base_width(1200.0);
    t.set_scroll_left(300.0);

    t.zoom_to(2.0, 400.0);
    assert_eq!(t.zoom(), 2.0);
    t.zoom_to(1.0, 400.0);
    assert!((t.scroll_left() - 300.0).abs() <= 1.0);
}

#[test]
fn thumbnails_clips_and_playhead_share_pixels() {
    let mut t = timeline(10.0);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 2.5, 7.5)).unwrap();
    t.set_current_time(2.5);

    for zoom in [0.25, 0.5, 1.0, 1.7, 2.0, 4.0] {
        t.set_zoom(zoom);
        let params = t.coordinate_params();
        let slots = thumbnail_slots(&params, 20);
        let rect = clip_position(t.track(track).unwrap().clip(clip).unwrap(), &params);

        assert_eq!(slots[5].left, rect.left, "zoom {zoom}");
        assert_eq!(slots[15].left, rect.right(), "zoom {zoom}");
        assert_eq!(t.playhead_px(), rect.left, "zoom {zoom}");
        let last = slots[19];
        assert_eq!(last.left + last.width, params.content_width(), "zoom {zoom}");
    }
}

#[test]
fn pointer_drag_follows_zoom() {
    let mut t = timeline(10.0);
    t.set_snapping_enabled(false);
    let track = t.add_track(TrackKind::Video);
    let clip = t.add_clip(track, Clip::new("a.mp4", 1.0, 2.0)).unwrap();

    // 100 px/s at 1x, 200 px/s at 2x.
    t.set_zoom(2.0);
    let drag = t.begin_drag(track, clip, 200.0).unwrap();
    let bounds = t.drag_clip(&drag, 500.0).unwrap();
    assert_eq!((bounds.start, bounds.end), (2.5, 3.5));
}
