//! Thumbnail extraction.
//!
//! Frames are pulled strictly in sequence from one [`SeekableMedia`]: seek,
//! wait for the seek, capture, then move on. A media handle has a single
//! playback position, so overlapping seeks would capture the wrong frames.

use std::sync::Arc;

use cutline_core::{SharedFrameBuffer, ThumbnailConfig};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{MediaError, Result};
use crate::source::SeekableMedia;

/// Times at which `count` thumbnails are taken: `i * duration / count`.
pub fn thumbnail_times(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 || !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }
    let interval = duration / count as f64;
    (0..count).map(|i| i as f64 * interval).collect()
}

/// Seek to `time` and capture one frame at `width`×`height`.
pub async fn extract_single_frame(
    media: &mut dyn SeekableMedia,
    time: f64,
    width: u32,
    height: u32,
) -> Result<SharedFrameBuffer> {
    media.seek(time).await?;
    media
        .capture(width, height)
        .map(Arc::new)
        .ok_or(MediaError::CaptureFailed { time })
}

/// Handle for one extraction run. Stale once a newer run begins.
#[derive(Debug, Clone)]
pub struct ExtractionTicket {
    id: u64,
    generation: watch::Receiver<u64>,
}

impl ExtractionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        *self.generation.borrow() == self.id
    }

    fn check(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(MediaError::Superseded)
        }
    }
}

/// Produces thumbnail strips; only the most recent run may publish.
#[derive(Debug)]
pub struct ThumbnailExtractor {
    config: ThumbnailConfig,
    generation: watch::Sender<u64>,
}

impl ThumbnailExtractor {
    pub fn new(config: ThumbnailConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self { config, generation }
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    /// Start a new run, superseding every earlier ticket.
    pub fn begin(&self) -> ExtractionTicket {
        self.generation.send_modify(|g| *g += 1);
        let id = *self.generation.borrow();
        debug!("Thumbnail extraction {} started", id);
        ExtractionTicket {
            id,
            generation: self.generation.subscribe(),
        }
    }

    /// Extract the configured number of thumbnails across `duration`.
    ///
    /// A non-positive `duration` falls back to the media's own. Failed
    /// frames become `None` placeholders. The media position is restored
    /// afterwards, also when the run is superseded.
    pub async fn extract(
        &self,
        ticket: &ExtractionTicket,
        media: &mut dyn SeekableMedia,
        duration: f64,
    ) -> Result<Vec<Option<SharedFrameBuffer>>> {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            media.duration()
        };
        if !duration.is_finite() || duration <= 0.0 {
            return Err(MediaError::NoDuration);
        }
        ticket.check()?;

        let original = media.current_time();
        let result = self.run(ticket, media, duration).await;
        if let Err(e) = media.seek(original).await {
            warn!("Could not restore media position to {:.3}s: {}", original, e);
        }
        result
    }

    async fn run(
        &self,
        ticket: &ExtractionTicket,
        media: &mut dyn SeekableMedia,
        duration: f64,
    ) -> Result<Vec<Option<SharedFrameBuffer>>> {
        let ThumbnailConfig { count, width, height } = self.config;
        let mut thumbnails = Vec::with_capacity(count);

        for time in thumbnail_times(duration, count) {
            let frame = extract_single_frame(media, time, width, height).await;
            ticket.check()?;
            match frame {
                Ok(frame) => thumbnails.push(Some(frame)),
                Err(e) => {
                    warn!("Failed to extract thumbnail at {:.3}s: {}", time, e);
                    thumbnails.push(None);
                }
            }
        }

        debug!(
            "Thumbnail extraction {} produced {} frames",
            ticket.id,
            thumbnails.len()
        );
        Ok(thumbnails)
    }
}
