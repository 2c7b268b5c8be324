//! Render loop.
//!
//! Each tick pulls a fresh snapshot from the shared timeline, composites it
//! into a back buffer and presents the result. Nothing is carried between
//! ticks except the back buffer allocation.

use std::time::Duration;

use cutline_core::FrameBuffer;
use cutline_timeline::SharedTimeline;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::compositor::{CompositeStats, Compositor};
use crate::graph::RenderGraph;

/// Where finished frames go.
pub trait Surface: Send {
    /// Current output size in pixels.
    fn size(&self) -> (u32, u32);

    fn present(&mut self, frame: &FrameBuffer);
}

/// Surface that keeps the last presented frame in memory.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    presented: u64,
    last: Option<FrameBuffer>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            presented: 0,
            last: None,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last.as_ref()
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &FrameBuffer) {
        self.presented += 1;
        self.last = Some(frame.clone());
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub time: f64,
    pub stats: CompositeStats,
}

/// Drives the compositor from a [`SharedTimeline`].
pub struct RenderLoop<S: Surface> {
    timeline: SharedTimeline,
    compositor: Compositor,
    surface: S,
    back: FrameBuffer,
    frames: u64,
}

impl<S: Surface> RenderLoop<S> {
    pub fn new(timeline: SharedTimeline, compositor: Compositor, surface: S) -> Self {
        let (width, height) = surface.size();
        Self {
            timeline,
            compositor,
            surface,
            back: FrameBuffer::new(width, height),
            frames: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Render and present one frame of the current timeline state.
    pub fn tick(&mut self) -> TickReport {
        let snapshot = self.timeline.snapshot();

        let (width, height) = self.surface.size();
        if self.back.resize(width, height) {
            debug!("Back buffer resized to {}x{}", width, height);
        }

        let graph = RenderGraph::from_snapshot(&snapshot);
        let stats = self
            .compositor
            .composite(&graph, snapshot.current_time, &mut self.back);
        self.surface.present(&self.back);
        self.frames += 1;

        TickReport {
            frame: self.frames,
            time: snapshot.current_time,
            stats,
        }
    }
}

impl<S: Surface + 'static> RenderLoop<S> {
    /// Run [`tick`](Self::tick) at `fps` on a tokio task.
    ///
    /// Must be called from within a tokio runtime. A non-positive `fps`
    /// falls back to 30.
    pub fn spawn(mut self, fps: f64) -> RenderLoopHandle<S> {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            warn!("Invalid render fps {}, using 30", fps);
            30.0
        };
        let period = Duration::from_secs_f64(1.0 / fps);
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!("Render loop started at {:.1} fps", fps);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.tick();
                    }
                    changed = stopped.changed() => {
                        // A dropped handle also stops the loop.
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Render loop stopped after {} frames", self.frames);
            self
        });

        RenderLoopHandle { stop, task }
    }
}

/// Handle to a spawned [`RenderLoop`].
pub struct RenderLoopHandle<S: Surface> {
    stop: watch::Sender<bool>,
    task: JoinHandle<RenderLoop<S>>,
}

impl<S: Surface> RenderLoopHandle<S> {
    /// Ask the loop to exit after the current tick. Idempotent.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop and get it back, or `None` if the task panicked or was
    /// aborted.
    pub async fn join(self) -> Option<RenderLoop<S>> {
        self.stop();
        match self.task.await {
            Ok(render_loop) => Some(render_loop),
            Err(e) => {
                warn!("Render loop task ended abnormally: {}", e);
                None
            }
        }
    }
}
