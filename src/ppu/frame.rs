//! The picture produced by the video unit: 240 rows of 256 palette indices.
//!
//! The core performs no colour conversion while rendering. `to_rgba` (and
//! `save_png` with the `screenshot` feature) are conveniences for callers
//! that want pixels.

use super::palette::rgb;
use super::{SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub const fn width(&self) -> usize {
        SCREEN_WIDTH
    }

    pub const fn height(&self) -> usize {
        SCREEN_HEIGHT
    }

    /// Palette index at column `x`, row `y`; `None` off-screen.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        Some(self.pixels[y * SCREEN_WIDTH + x])
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, index: u8) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = index;
        }
    }

    /// One row of palette indices.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let start = y.checked_mul(SCREEN_WIDTH)?;
        self.pixels.get(start..start + SCREEN_WIDTH)
    }

    /// Row-major palette indices.
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    /// Convert through the master palette into RGBA8 (alpha always 0xFF).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &index in &self.pixels {
            let [r, g, b] = rgb(index);
            out.extend_from_slice(&[r, g, b, 0xFF]);
        }
        out
    }

    /// Write the frame as an RGB PNG.
    #[cfg(feature = "screenshot")]
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> crate::error::Result<()> {
        let rgb_bytes: Vec<u8> = self.pixels.iter().flat_map(|&i| rgb(i)).collect();
        image::save_buffer_with_format(
            path,
            &rgb_bytes,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
