//! Cutline Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types used throughout Cutline:
//! - Error type and result alias
//! - RGBA frame buffers used as compositing surfaces
//! - Pixel math and time formatting helpers
//! - Media references
//! - Editor configuration and logging setup

pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod media;
pub mod pixel;
pub mod time;

pub use config::{EditorConfig, LoggingConfig, RenderConfig, ThumbnailConfig, TimelineConfig};
pub use error::{CutlineError, Result};
pub use frame::{FrameBuffer, FramePlane, Rgba8, SharedFrameBuffer};
pub use media::MediaRef;

/// Shortest clip the editor allows, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.1;
