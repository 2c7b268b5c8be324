//! Synthetic media for previews, demos and tests.
//!
//! References understood by [`SyntheticLoader`]:
//! - `bars://<name>?duration=10&fps=30&size=640x360` animated colour bars
//! - `color://RRGGBB?duration=5&size=320x180` a solid still

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cutline_core::{time, FrameBuffer, MediaRef, Rgba8, SharedFrameBuffer};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{MediaError, Result};
use crate::source::{AssetLoader, MediaSource, SharedSource};

const DEFAULT_DURATION: f64 = 10.0;
const DEFAULT_SIZE: (u32, u32) = (640, 360);
/// Largest frame a synthetic source will allocate.
const MAX_FRAME_PIXELS: u64 = 8192 * 8192;

/// Colour bars with a progress strip along the bottom that advances with
/// source time, so each frame is distinguishable.
#[derive(Debug)]
pub struct ColorBars {
    width: u32,
    height: u32,
    duration: f64,
    fps: f64,
    base: FrameBuffer,
    last: Mutex<Option<(u64, SharedFrameBuffer)>>,
}

impl ColorBars {
    pub fn new(width: u32, height: u32, duration: f64, fps: f64) -> Self {
        Self {
            width,
            height,
            duration: duration.max(0.0),
            fps: if fps > 0.0 { fps } else { time::DEFAULT_FPS },
            base: FrameBuffer::test_pattern(width, height),
            last: Mutex::new(None),
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    fn render(&self, frame: u64) -> FrameBuffer {
        let mut out = self.base.clone();
        let strip = (self.height / 16).max(1).min(self.height);
        let progress = if self.duration > 0.0 {
            (time::frame_to_time(frame, self.fps) / self.duration).min(1.0)
        } else {
            0.0
        };
        let filled = (progress * self.width as f64).round() as u32;
        for y in self.height - strip..self.height {
            for x in 0..self.width {
                let color = if x < filled { Rgba8::WHITE } else { Rgba8::BLACK };
                out.set_pixel(x, y, color);
            }
        }
        out
    }
}

impl MediaSource for ColorBars {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn frame_at(&self, source_time: f64) -> Option<SharedFrameBuffer> {
        if !(0.0..=self.duration).contains(&source_time) {
            return None;
        }
        let frame = time::time_to_frame(source_time, self.fps);

        let mut last = self.last.lock();
        if let Some((cached, buffer)) = last.as_ref() {
            if *cached == frame {
                return Some(Arc::clone(buffer));
            }
        }
        let buffer = Arc::new(self.render(frame));
        *last = Some((frame, Arc::clone(&buffer)));
        Some(buffer)
    }
}

/// A single image shown for its whole duration.
#[derive(Debug)]
pub struct StillImage {
    frame: SharedFrameBuffer,
    duration: f64,
}

impl StillImage {
    pub fn new(frame: FrameBuffer, duration: f64) -> Self {
        Self {
            frame: Arc::new(frame),
            duration: duration.max(0.0),
        }
    }

    pub fn solid(width: u32, height: u32, color: Rgba8, duration: f64) -> Self {
        Self::new(FrameBuffer::solid(width, height, color), duration)
    }
}

impl MediaSource for StillImage {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn frame_at(&self, source_time: f64) -> Option<SharedFrameBuffer> {
        (0.0..=self.duration)
            .contains(&source_time)
            .then(|| Arc::clone(&self.frame))
    }
}

/// Builds synthetic sources from `bars://` and `color://` references.
#[derive(Debug, Clone, Default)]
pub struct SyntheticLoader {
    latency: Duration,
}

impl SyntheticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load, to exercise the not-ready path.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Build a source synchronously.
    pub fn build(&self, src: &MediaRef) -> Result<SharedSource> {
        let (scheme, rest) = src
            .as_str()
            .split_once("://")
            .ok_or_else(|| MediaError::Unsupported(src.clone()))?;
        let (body, query) = rest.split_once('?').unwrap_or((rest, ""));
        let params = QueryParams::parse(src, query)?;
        let (width, height) = params.size.unwrap_or(DEFAULT_SIZE);
        let duration = params.duration.unwrap_or(DEFAULT_DURATION);
        if u64::from(width) * u64::from(height) > MAX_FRAME_PIXELS {
            return Err(MediaError::LoadFailed {
                src: src.clone(),
                reason: format!("frame {width}x{height} is too large"),
            });
        }

        match scheme {
            "bars" => {
                let fps = params.fps.unwrap_or(time::DEFAULT_FPS);
                Ok(Arc::new(ColorBars::new(width, height, duration, fps)))
            }
            "color" => {
                let color = parse_hex_color(body).ok_or_else(|| MediaError::InvalidRef {
                    src: src.clone(),
                    reason: format!("bad colour {body:?}"),
                })?;
                Ok(Arc::new(StillImage::solid(width, height, color, duration)))
            }
            _ => Err(MediaError::Unsupported(src.clone())),
        }
    }
}

#[async_trait]
impl AssetLoader for SyntheticLoader {
    async fn load(&self, src: &MediaRef) -> Result<SharedSource> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let source = self.build(src)?;
        debug!("Loaded synthetic source {}", src);
        Ok(source)
    }
}

#[derive(Debug, Default)]
struct QueryParams {
    duration: Option<f64>,
    fps: Option<f64>,
    size: Option<(u32, u32)>,
}

impl QueryParams {
    fn parse(src: &MediaRef, query: &str) -> Result<Self> {
        let invalid = |reason: String| MediaError::InvalidRef {
            src: src.clone(),
            reason,
        };
        let mut params = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(format!("missing value for {pair:?}")))?;
            match key {
                "duration" => {
                    let duration = parse_positive(value)
                        .ok_or_else(|| invalid(format!("bad duration {value:?}")))?;
                    params.duration = Some(duration);
                }
                "fps" => {
                    let fps = parse_positive(value)
                        .ok_or_else(|| invalid(format!("bad fps {value:?}")))?;
                    params.fps = Some(fps);
                }
                "size" => {
                    let size = value
                        .split_once('x')
                        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
                        .filter(|&(w, h): &(u32, u32)| w > 0 && h > 0)
                        .ok_or_else(|| invalid(format!("bad size {value:?}")))?;
                    params.size = Some(size);
                }
                _ => return Err(invalid(format!("unknown parameter {key:?}"))),
            }
        }
        Ok(params)
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_hex_color(hex: &str) -> Option<Rgba8> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba8::opaque(channel(0)?, channel(2)?, channel(4)?))
}
