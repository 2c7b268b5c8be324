//! Cutline - headless timeline preview
//!
//! Builds a demo timeline from synthetic media, applies a few edits, then
//! plays it through the render loop onto an in-memory surface.
//!
//! Usage: `cutline [config.json]`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cutline_core::logging::init_logging;
use cutline_core::{time, EditorConfig, MediaRef};
use cutline_media::{AssetStore, SourceSeeker, SyntheticLoader, ThumbnailExtractor};
use cutline_render::{Compositor, HeadlessSurface, RenderGraph, RenderLoop};
use cutline_timeline::{SharedTimeline, Timeline, TrackKind, TrimEdge};
use tokio::runtime::Handle;
use tracing::{info, warn};

/// Frames played before exiting.
const DEMO_FRAMES: u64 = 90;

const MAIN_MEDIA: &str = "bars://main?duration=12&size=640x360";
const OVERLAY_MEDIA: &str = "color://ff8800?duration=3&size=320x180";

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(path),
        None => EditorConfig::default(),
    };
    init_logging(&config.logging);

    info!("Cutline starting...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(run(config))
}

async fn run(config: EditorConfig) -> Result<()> {
    let assets = AssetStore::new(Arc::new(SyntheticLoader::new()), Handle::current());
    let timeline = SharedTimeline::new(Timeline::with_config(config.timeline.clone()));

    build_demo_timeline(&timeline, &assets).await?;

    let graph = RenderGraph::from_snapshot(&timeline.snapshot());
    let validation = graph.validate();
    if validation.is_valid() {
        info!(
            "Render graph: {} nodes across {} tracks",
            graph.node_count(),
            graph.track_count
        );
    } else {
        for error in &validation.errors {
            warn!("Render graph: {}", error);
        }
    }

    extract_thumbnails(&config, &assets).await?;
    play(&config, timeline, assets).await
}

/// Import the demo media and perform a short editing session.
async fn build_demo_timeline(timeline: &SharedTimeline, assets: &AssetStore) -> Result<()> {
    let main_ref = MediaRef::new(MAIN_MEDIA);
    let overlay_ref = MediaRef::new(OVERLAY_MEDIA);
    let main_source = assets.load_now(&main_ref).await?;
    let overlay_source = assets.load_now(&overlay_ref).await?;

    timeline.update(|t| -> Result<()> {
        let (main_track, main_clip) =
            t.import_media(main_ref, main_source.duration(), TrackKind::Video)?;
        let tail = t.split_clip(main_track, main_clip, 6.0)?;
        t.trim_clip_to(main_track, tail, TrimEdge::Left, 6.5)?;

        let overlay_track = t.add_track(TrackKind::Video);
        t.set_active_track(Some(overlay_track));
        let (_, overlay_clip) =
            t.import_media(overlay_ref, overlay_source.duration(), TrackKind::Video)?;
        t.move_clip(overlay_track, overlay_clip, 4.0)?;
        t.duplicate_clip(overlay_track, overlay_clip)?;

        t.add_track(TrackKind::Audio);
        t.set_selected_clip(Some(tail));

        for track in t.tracks() {
            info!(
                "Track {} ({:?}): {} clips, ends at {}",
                track.name,
                track.kind,
                track.clip_count(),
                time::format_time_with_millis(track.end_time())
            );
        }
        Ok(())
    })
}

async fn extract_thumbnails(config: &EditorConfig, assets: &AssetStore) -> Result<()> {
    let source = assets.load_now(&MediaRef::new(MAIN_MEDIA)).await?;
    let mut media = SourceSeeker::new(source);
    let extractor = ThumbnailExtractor::new(config.thumbnails);

    let ticket = extractor.begin();
    let thumbnails = extractor.extract(&ticket, &mut media, 0.0).await?;
    let missing = thumbnails.iter().filter(|t| t.is_none()).count();
    info!(
        "Extracted {} thumbnails ({} placeholders)",
        thumbnails.len(),
        missing
    );
    Ok(())
}

/// Advance the playhead frame by frame while the render loop runs.
async fn play(
    config: &EditorConfig,
    timeline: SharedTimeline,
    assets: AssetStore,
) -> Result<()> {
    let fps = if config.render.fps.is_finite() && config.render.fps > 0.0 {
        config.render.fps
    } else {
        time::DEFAULT_FPS
    };
    let surface = HeadlessSurface::new(config.render.width, config.render.height);
    let render_loop = RenderLoop::new(timeline.clone(), Compositor::new(assets), surface);
    let handle = render_loop.spawn(fps);

    timeline.update(|t| t.set_playing(true));
    let mut clock = tokio::time::interval(Duration::from_secs_f64(1.0 / fps));
    for frame in 0..DEMO_FRAMES {
        clock.tick().await;
        timeline.update(|t| {
            let duration = t.duration();
            let now = time::frame_to_time(frame, fps);
            t.set_current_time(if duration > 0.0 { now % duration } else { 0.0 });
        });
    }
    timeline.update(|t| t.set_playing(false));

    let mut render_loop = handle.join().await.context("render loop task failed")?;
    let last = render_loop.tick();
    info!(
        "Rendered {} frames; at {} painted {} layers ({} pending, {} skipped)",
        render_loop.frames_rendered(),
        time::format_time_with_millis(last.time),
        last.stats.painted,
        last.stats.pending,
        last.stats.skipped
    );
    Ok(())
}
