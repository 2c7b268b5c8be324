//! Media source traits.
//!
//! A [`MediaSource`] hands out decoded frames by source time and is shared
//! between the compositor and whoever loaded it. A [`SeekableMedia`] is the
//! stateful, one-position-at-a-time handle the thumbnail extractor drives.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cutline_core::{FrameBuffer, MediaRef, SharedFrameBuffer};

use crate::error::{MediaError, Result};

/// Random-access frame provider.
pub trait MediaSource: Send + Sync + fmt::Debug {
    /// Duration in seconds.
    fn duration(&self) -> f64;

    /// Native frame size.
    fn dimensions(&self) -> (u32, u32);

    /// Whether frames can be served right now.
    fn is_ready(&self) -> bool {
        true
    }

    /// Frame shown at `source_time`, or `None` outside the media.
    fn frame_at(&self, source_time: f64) -> Option<SharedFrameBuffer>;
}

pub type SharedSource = Arc<dyn MediaSource>;

/// Resolves a [`MediaRef`] into a ready source.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, src: &MediaRef) -> Result<SharedSource>;
}

/// A media element with a single playback position.
///
/// Seeking is asynchronous; a capture reflects the position of the last
/// completed seek.
#[async_trait]
pub trait SeekableMedia: Send {
    fn duration(&self) -> f64;

    fn current_time(&self) -> f64;

    async fn seek(&mut self, time: f64) -> Result<()>;

    /// Capture the current frame scaled to `width`×`height`.
    fn capture(&self, width: u32, height: u32) -> Option<FrameBuffer>;
}

/// [`SeekableMedia`] over a shared [`MediaSource`], with an optional
/// simulated seek latency.
#[derive(Debug, Clone)]
pub struct SourceSeeker {
    source: SharedSource,
    position: f64,
    seek_delay: Duration,
}

impl SourceSeeker {
    pub fn new(source: SharedSource) -> Self {
        Self {
            source,
            position: 0.0,
            seek_delay: Duration::ZERO,
        }
    }

    pub fn with_seek_delay(mut self, delay: Duration) -> Self {
        self.seek_delay = delay;
        self
    }
}

#[async_trait]
impl SeekableMedia for SourceSeeker {
    fn duration(&self) -> f64 {
        self.source.duration()
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    async fn seek(&mut self, time: f64) -> Result<()> {
        if !time.is_finite() || time < 0.0 || time > self.source.duration() {
            return Err(MediaError::SeekFailed {
                time,
                reason: "outside media".to_string(),
            });
        }
        if !self.seek_delay.is_zero() {
            tokio::time::sleep(self.seek_delay).await;
        }
        self.position = time;
        Ok(())
    }

    fn capture(&self, width: u32, height: u32) -> Option<FrameBuffer> {
        let frame = self.source.frame_at(self.position)?;
        let mut out = FrameBuffer::new(width, height);
        out.draw_stretched(&frame);
        Some(out)
    }
}
