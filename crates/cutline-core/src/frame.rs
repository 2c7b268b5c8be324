//! RGBA frame buffers used as compositing surfaces and decoded source frames.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One straight-alpha RGBA8 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Source-over blend of `self` onto `dst`.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let alpha = sa as f32 / 255.0;
                let inv = 1.0 - alpha;
                let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * inv).round() as u8;
                Self {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (sa as f32 + dst.a as f32 * inv).round().min(255.0) as u8,
                }
            }
        }
    }
}

/// A plane of pixel data with stride information.
#[derive(Debug, Clone)]
pub struct FramePlane {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Bytes per row (may include padding)
    pub stride: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FramePlane {
    const BYTES_PER_PIXEL: usize = 4;

    /// Create a zeroed RGBA8 plane with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        // Align stride to 64 bytes for SIMD and GPU upload
        let min_stride = width as usize * Self::BYTES_PER_PIXEL;
        let stride = (min_stride + 63) & !63;
        Self {
            data: vec![0u8; stride * height as usize],
            stride,
            width,
            height,
        }
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * Self::BYTES_PER_PIXEL]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * Self::BYTES_PER_PIXEL;
        &mut self.data[start..end]
    }

    /// A row viewed as pixels.
    #[inline]
    pub fn pixels(&self, y: u32) -> &[Rgba8] {
        bytemuck::cast_slice(self.row(y))
    }

    /// A row viewed as mutable pixels.
    #[inline]
    pub fn pixels_mut(&mut self, y: u32) -> &mut [Rgba8] {
        bytemuck::cast_slice_mut(self.row_mut(y))
    }
}

/// An RGBA8 frame in CPU memory.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    plane: FramePlane,
}

impl FrameBuffer {
    /// Create a fully transparent frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            plane: FramePlane::new(width, height),
        }
    }

    /// Create a frame buffer filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let mut frame = Self::new(width, height);
        frame.fill(color);
        frame
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.plane.data.len()
    }

    #[inline]
    pub fn plane(&self) -> &FramePlane {
        &self.plane
    }

    #[inline]
    pub fn plane_mut(&mut self) -> &mut FramePlane {
        &mut self.plane
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.plane.data.fill(0);
    }

    pub fn fill(&mut self, color: Rgba8) {
        for y in 0..self.height {
            self.plane.pixels_mut(y).fill(color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.plane.pixels(y)[x as usize])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x < self.width && y < self.height {
            self.plane.pixels_mut(y)[x as usize] = color;
        }
    }

    /// Reallocate to new dimensions. Returns true when the size changed.
    ///
    /// Contents are discarded on resize.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Stretch `src` over the whole frame (nearest neighbour, source-over).
    pub fn draw_stretched(&mut self, src: &FrameBuffer) {
        if self.is_empty() || src.is_empty() {
            return;
        }
        let (dw, dh) = (self.width as u64, self.height as u64);
        let (sw, sh) = (src.width as u64, src.height as u64);

        for y in 0..self.height {
            let sy = (y as u64 * sh / dh) as u32;
            let src_row = src.plane.pixels(sy);
            let dst_row = self.plane.pixels_mut(y);
            for (x, dst) in dst_row.iter_mut().enumerate() {
                let sx = (x as u64 * sw / dw) as usize;
                *dst = src_row[sx].over(*dst);
            }
        }
    }

    /// Copy out tightly packed RGBA rows (no stride padding).
    pub fn to_packed_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            out.extend_from_slice(self.plane.row(y));
        }
        out
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        const BARS: [Rgba8; 8] = [
            Rgba8::WHITE,
            Rgba8::opaque(255, 255, 0),
            Rgba8::opaque(0, 255, 255),
            Rgba8::opaque(0, 255, 0),
            Rgba8::opaque(255, 0, 255),
            Rgba8::opaque(255, 0, 0),
            Rgba8::opaque(0, 0, 255),
            Rgba8::BLACK,
        ];

        let mut frame = Self::new(width, height);
        for y in 0..height {
            let row = frame.plane.pixels_mut(y);
            for (x, px) in row.iter_mut().enumerate() {
                let bar = x * BARS.len() / width as usize;
                *px = BARS[bar];
            }
        }
        frame
    }
}

/// Arc-wrapped frame buffer for shared ownership.
pub type SharedFrameBuffer = Arc<FrameBuffer>;
