//! Cutline Render - Composition of timeline state into frames
//!
//! - Render graph: tracks and clips flattened into a time-sorted schedule
//! - Compositor: paints the layers active at one instant
//! - Render loop: per-frame pull from the shared timeline on a tokio task

pub mod compositor;
pub mod graph;
pub mod render_loop;

pub use compositor::{CompositeStats, Compositor};
pub use graph::{evaluate, GraphValidation, RenderGraph, RenderNode};
pub use render_loop::{HeadlessSurface, RenderLoop, RenderLoopHandle, Surface, TickReport};
