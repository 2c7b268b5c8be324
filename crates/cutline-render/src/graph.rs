//! Render graph: the timeline flattened into a composition schedule.
//!
//! Every clip on every track becomes one [`RenderNode`]. Nodes are
//! sorted by start time, then by stacking order, so the compositor can find
//! the active layers at any instant with a short scan.

use cutline_core::MediaRef;
use cutline_timeline::{ClipId, TimelineSnapshot, Track, TrackId, TrackKind};
use smallvec::SmallVec;
use tracing::{debug, warn};

/// Active layers at one instant. Most frames have only a few.
pub type ActiveNodes<'a> = SmallVec<[&'a RenderNode; 8]>;

/// One clip scheduled for composition.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// Timeline time the clip starts at.
    pub at_time: f64,
    pub duration: f64,
    /// Source time shown at `at_time`.
    pub trim_offset: f64,
    pub source: MediaRef,
    pub track_id: TrackId,
    pub clip_id: ClipId,
    /// Index of the owning track; higher is painted later.
    pub z_index: usize,
    pub kind: TrackKind,
    /// Hidden tracks stay in the schedule but are not painted.
    pub visible: bool,
}

impl RenderNode {
    pub fn end_time(&self) -> f64 {
        self.at_time + self.duration
    }

    /// Half-open: active at `at_time`, inactive at `at_time + duration`.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.at_time && time < self.end_time()
    }

    /// Source time to sample at timeline `time`.
    pub fn source_time_at(&self, time: f64) -> Option<f64> {
        self.is_active_at(time)
            .then(|| self.trim_offset + (time - self.at_time))
    }
}

/// Outcome of [`RenderGraph::validate`]. Problems are reported, never raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphValidation {
    pub errors: Vec<String>,
}

impl GraphValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Time-sorted schedule for one timeline state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderGraph {
    pub duration: f64,
    nodes: Vec<RenderNode>,
    pub track_count: usize,
}

impl RenderGraph {
    /// Flatten `tracks` into a sorted schedule.
    pub fn build(tracks: &[Track], duration: f64) -> Self {
        let mut nodes = Vec::with_capacity(tracks.iter().map(Track::clip_count).sum());

        for (z_index, track) in tracks.iter().enumerate() {
            for clip in track.clips() {
                let clip_duration = clip.duration();
                if clip_duration <= 0.0 {
                    warn!(
                        "Skipping clip {} on track {} with duration {:.3}",
                        clip.id, track.name, clip_duration
                    );
                    continue;
                }
                nodes.push(RenderNode {
                    at_time: clip.start,
                    duration: clip_duration,
                    trim_offset: clip.offset,
                    source: clip.src.clone(),
                    track_id: track.id,
                    clip_id: clip.id,
                    z_index,
                    kind: track.kind,
                    visible: track.visible,
                });
            }
        }

        nodes.sort_by(|a, b| {
            a.at_time
                .total_cmp(&b.at_time)
                .then(a.z_index.cmp(&b.z_index))
        });

        debug!(
            "Built render graph: {} nodes from {} tracks",
            nodes.len(),
            tracks.len()
        );

        Self {
            duration,
            nodes,
            track_count: tracks.len(),
        }
    }

    pub fn from_snapshot(snapshot: &TimelineSnapshot) -> Self {
        Self::build(&snapshot.tracks, snapshot.duration)
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes active at `time`, lowest z-index first.
    pub fn clips_at_time(&self, time: f64) -> ActiveNodes<'_> {
        let mut active = ActiveNodes::new();
        for node in &self.nodes {
            // Sorted by start: nothing later can be active.
            if node.at_time > time {
                break;
            }
            if node.is_active_at(time) {
                active.push(node);
            }
        }
        active.sort_by_key(|node| node.z_index);
        active
    }

    pub fn validate(&self) -> GraphValidation {
        let mut errors = Vec::new();
        if self.nodes.is_empty() {
            errors.push("No clips to render".to_string());
        }
        if self.duration.is_nan() || self.duration <= 0.0 {
            errors.push("Invalid duration".to_string());
        }
        GraphValidation { errors }
    }
}

/// Pure snapshot of the composition schedule for `tracks`.
pub fn evaluate(tracks: &[Track], duration: f64) -> RenderGraph {
    RenderGraph::build(tracks, duration)
}
