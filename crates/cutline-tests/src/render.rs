//! Integration tests for the render pipeline.
//!
//! Timeline state flows through the render graph and compositor into a
//! headless surface, with media served by the asset store.

use std::sync::Arc;

use cutline_core::{FrameBuffer, Rgba8};
use cutline_media::{AssetStore, SyntheticLoader};
use cutline_render::{evaluate, Compositor, HeadlessSurface, RenderLoop};
use cutline_timeline::{Clip, SharedTimeline, Timeline, TrackKind};
use tokio::runtime::Handle;

const RED: &str = "color://ff0000?size=4x4&duration=10";
const BLUE: &str = "color://0000ff?size=4x4&duration=10";

// ── Helpers ────────────────────────────────────────────────────

async fn preloaded_store(refs: &[&str]) -> AssetStore {
    let store = AssetStore::new(Arc::new(SyntheticLoader::new()), Handle::current());
    for src in refs {
        store.load_now(&(*src).into()).await.unwrap();
    }
    store
}

/// Track 0 holds RED over 0..3, track 1 holds BLUE over 1..4.
fn overlapping_tracks() -> Timeline {
    let mut t = Timeline::new();
    t.set_duration(10.0);
    let lower = t.add_track(TrackKind::Video);
    let upper = t.add_track(TrackKind::Video);
    t.add_clip(lower, Clip::new(RED, 0.0, 3.0)).unwrap();
    t.add_clip(upper, Clip::new(BLUE, 1.0, 4.0)).unwrap();
    t
}

// ── Graph ──────────────────────────────────────────────────────

#[test]
fn both_layers_active_upper_track_last() {
    let t = overlapping_tracks();
    let graph = evaluate(t.tracks(), t.duration());

    let active = graph.clips_at_time(2.0);
    let z: Vec<usize> = active.iter().map(|n| n.z_index).collect();
    assert_eq!(z, vec![0, 1]);
    assert_eq!(active[1].source.as_str(), BLUE);
}

#[test]
fn clip_end_is_exclusive() {
    let mut t = Timeline::new();
    t.set_duration(10.0);
    let track = t.add_track(TrackKind::Video);
    t.add_clip(track, Clip::new(RED, 0.0, 5.0)).unwrap();
    let graph = evaluate(t.tracks(), t.duration());

    assert_eq!(graph.clips_at_time(4.999).len(), 1);
    assert!(graph.clips_at_time(5.0).is_empty());
}

#[test]
fn graph_is_a_snapshot() {
    let shared = SharedTimeline::new(overlapping_tracks());
    let graph = evaluate(&shared.snapshot().tracks, 10.0);

    shared.update(|t| {
        let track = t.tracks()[0].id;
        t.remove_track(track).unwrap();
    });
    assert_eq!(graph.node_count(), 2);
    assert_eq!(evaluate(&shared.snapshot().tracks, 10.0).node_count(), 1);
}

#[test]
fn empty_timeline_fails_validation_without_error() {
    let t = Timeline::new();
    let report = evaluate(t.tracks(), t.duration()).validate();
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), 2);
}

// ── Compositing ────────────────────────────────────────────────

#[tokio::test]
async fn upper_track_wins_in_composite() {
    let compositor = Compositor::new(preloaded_store(&[RED, BLUE]).await);
    let t = overlapping_tracks();
    let graph = evaluate(t.tracks(), t.duration());
    let mut frame = FrameBuffer::new(4, 4);

    let stats = compositor.composite(&graph, 2.0, &mut frame);
    assert_eq!(stats.painted, 2);
    assert_eq!(frame.pixel(0, 0), Some(Rgba8::opaque(0, 0, 255)));

    let stats = compositor.composite(&graph, 3.5, &mut frame);
    assert_eq!(stats.painted, 1);
    assert_eq!(frame.pixel(0, 0), Some(Rgba8::opaque(0, 0, 255)));

    compositor.composite(&graph, 0.5, &mut frame);
    assert_eq!(frame.pixel(0, 0), Some(Rgba8::opaque(255, 0, 0)));
}

#[tokio::test]
async fn hidden_track_is_not_painted() {
    let compositor = Compositor::new(preloaded_store(&[RED, BLUE]).await);
    let mut t = overlapping_tracks();
    let upper = t.tracks()[1].id;
    t.set_track_visible(upper, false).unwrap();
    let mut frame = FrameBuffer::new(4, 4);

    let graph = evaluate(t.tracks(), t.duration());
    assert_eq!(graph.node_count(), 2);
    let stats = compositor.composite(&graph, 2.0, &mut frame);
    assert_eq!((stats.painted, stats.skipped), (1, 1));
    assert_eq!(frame.pixel(0, 0), Some(Rgba8::opaque(255, 0, 0)));
}

// ── Render loop ────────────────────────────────────────────────

#[tokio::test]
async fn render_loop_sees_edits_between_ticks() {
    let store = preloaded_store(&[RED, BLUE]).await;
    let shared = SharedTimeline::new(overlapping_tracks());
    let mut render_loop = RenderLoop::new(
        shared.clone(),
        Compositor::new(store),
        HeadlessSurface::new(4, 4),
    );

    shared.update(|t| t.set_current_time(2.0));
    render_loop.tick();
    let pixel = render_loop.surface().last_frame().unwrap().pixel(1, 1);
    assert_eq!(pixel, Some(Rgba8::opaque(0, 0, 255)));

    // Drag the upper clip out from under the playhead.
    shared.update(|t| {
        let upper = t.tracks()[1].id;
        let clip = t.tracks()[1].clips()[0].id;
        t.move_clip(upper, clip, 6.0).unwrap();
    });
    let report = render_loop.tick();
    assert_eq!(report.stats.painted, 1);
    let pixel = render_loop.surface().last_frame().unwrap().pixel(1, 1);
    assert_eq!(pixel, Some(Rgba8::opaque(255, 0, 0)));
}

#[tokio::test]
async fn unloaded_media_appears_once_ready() {
    let store = preloaded_store(&[RED]).await;
    let shared = SharedTimeline::new(overlapping_tracks());
    shared.update(|t| t.set_current_time(2.0));
    let mut render_loop = RenderLoop::new(
        shared.clone(),
        Compositor::new(store.clone()),
        HeadlessSurface::new(4, 4),
    );

    let first = render_loop.tick();
    assert_eq!((first.stats.painted, first.stats.pending), (1, 1));

    for _ in 0..100 {
        if store.get_ready(&BLUE.into()).is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    let second = render_loop.tick();
    assert_eq!((second.stats.painted, second.stats.pending), (2, 0));
}
