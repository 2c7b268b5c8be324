//! Frame compositor.
//!
//! Clears the destination, then paints every active layer from the lowest
//! track to the highest. A layer whose asset has not finished loading is
//! skipped for this frame and its load is kicked off in the background.

use cutline_core::FrameBuffer;
use cutline_media::AssetStore;
use cutline_timeline::{Track, TrackKind};
use tracing::trace;

use crate::graph::{RenderGraph, RenderNode};

/// Per-frame layer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Layers drawn into the destination.
    pub painted: usize,
    /// Layers waiting on an asset load.
    pub pending: usize,
    /// Active layers that produce no pixels (hidden tracks, audio, effects,
    /// no frame at that source time).
    pub skipped: usize,
}

impl CompositeStats {
    pub fn active(&self) -> usize {
        self.painted + self.pending + self.skipped
    }
}

#[derive(Debug, Clone)]
pub struct Compositor {
    assets: AssetStore,
}

impl Compositor {
    pub fn new(assets: AssetStore) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Composite the layers of `graph` active at `time` into `dst`.
    pub fn composite(
        &self,
        graph: &RenderGraph,
        time: f64,
        dst: &mut FrameBuffer,
    ) -> CompositeStats {
        dst.clear();
        let mut stats = CompositeStats::default();
        for node in graph.clips_at_time(time) {
            self.paint_layer(node, time, dst, &mut stats);
        }
        stats
    }

    /// Same as [`composite`](Self::composite), building the graph first.
    pub fn composite_tracks(
        &self,
        tracks: &[Track],
        duration: f64,
        time: f64,
        dst: &mut FrameBuffer,
    ) -> CompositeStats {
        let graph = RenderGraph::build(tracks, duration);
        self.composite(&graph, time, dst)
    }

    fn paint_layer(
        &self,
        node: &RenderNode,
        time: f64,
        dst: &mut FrameBuffer,
        stats: &mut CompositeStats,
    ) {
        if !node.visible {
            stats.skipped += 1;
            return;
        }
        match node.kind {
            TrackKind::Video => {
                let Some(source) = self.assets.get_or_request(&node.source) else {
                    trace!("Asset {} not ready, skipping layer", node.source);
                    stats.pending += 1;
                    return;
                };
                let frame = node
                    .source_time_at(time)
                    .and_then(|source_time| source.frame_at(source_time));
                match frame {
                    Some(frame) => {
                        dst.draw_stretched(&frame);
                        stats.painted += 1;
                    }
                    None => stats.skipped += 1,
                }
            }
            // Mixed elsewhere.
            TrackKind::Audio => stats.skipped += 1,
            // Effect clips carry parameters only.
            TrackKind::Effect => stats.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_core::Rgba8;
    use cutline_media::SyntheticLoader;
    use cutline_timeline::{Clip, Timeline};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    const RED: &str = "color://ff0000?size=4x4";
    const BLUE: &str = "color://0000ff?size=4x4";

    async fn compositor(preload: &[&str]) -> Compositor {
        let store = AssetStore::new(Arc::new(SyntheticLoader::new()), Handle::current());
        for src in preload {
            store.load_now(&(*src).into()).await.unwrap();
        }
        Compositor::new(store)
    }

    fn two_layer_timeline() -> Timeline {
        let mut t = Timeline::new();
        t.set_duration(10.0);
        let low = t.add_track(TrackKind::Video);
        let high = t.add_track(TrackKind::Video);
        t.add_clip(low, Clip::new(RED, 0.0, 3.0)).unwrap();
        t.add_clip(high, Clip::new(BLUE, 1.0, 4.0)).unwrap();
        t
    }

    #[tokio::test]
    async fn test_higher_track_painted_last() {
        let compositor = compositor(&[RED, BLUE]).await;
        let t = two_layer_timeline();
        let mut dst = FrameBuffer::new(8, 8);

        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 2.0, &mut dst);
        assert_eq!(stats.painted, 2);
        assert_eq!(dst.pixel(3, 3), Some(Rgba8::opaque(0, 0, 255)));

        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 0.5, &mut dst);
        assert_eq!(stats.painted, 1);
        assert_eq!(dst.pixel(3, 3), Some(Rgba8::opaque(255, 0, 0)));
    }

    #[tokio::test]
    async fn test_destination_cleared_between_frames() {
        let compositor = compositor(&[RED, BLUE]).await;
        let t = two_layer_timeline();
        let mut dst = FrameBuffer::new(8, 8);

        compositor.composite_tracks(t.tracks(), t.duration(), 2.0, &mut dst);
        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 6.0, &mut dst);
        assert_eq!(stats.active(), 0);
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }

    #[tokio::test]
    async fn test_unready_asset_is_requested_and_skipped() {
        let compositor = compositor(&[RED]).await;
        let t = two_layer_timeline();
        let mut dst = FrameBuffer::new(8, 8);

        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 2.0, &mut dst);
        assert_eq!(stats, CompositeStats { painted: 1, pending: 1, skipped: 0 });
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::opaque(255, 0, 0)));
        assert!(compositor.assets().status(&BLUE.into()).is_some());
    }

    #[tokio::test]
    async fn test_audio_and_effect_paint_nothing() {
        let compositor = compositor(&[RED]).await;
        let mut t = Timeline::new();
        t.set_duration(10.0);
        let audio = t.add_track(TrackKind::Audio);
        let fx = t.add_track(TrackKind::Effect);
        t.add_clip(audio, Clip::new(RED, 0.0, 5.0)).unwrap();
        t.add_clip(fx, Clip::new(RED, 0.0, 5.0)).unwrap();
        let mut dst = FrameBuffer::new(4, 4);

        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 1.0, &mut dst);
        assert_eq!(stats, CompositeStats { painted: 0, pending: 0, skipped: 2 });
        assert_eq!(dst.pixel(1, 1), Some(Rgba8::TRANSPARENT));
    }

    #[tokio::test]
    async fn test_hidden_layer_counts_as_skipped() {
        let compositor = compositor(&[RED, BLUE]).await;
        let mut t = two_layer_timeline();
        let high = t.tracks()[1].id;
        t.set_track_visible(high, false).unwrap();
        let mut dst = FrameBuffer::new(8, 8);

        let stats = compositor.composite_tracks(t.tracks(), t.duration(), 2.0, &mut dst);
        assert_eq!(stats, CompositeStats { painted: 1, pending: 0, skipped: 1 });
        assert_eq!(dst.pixel(3, 3), Some(Rgba8::opaque(255, 0, 0)));
    }
}
