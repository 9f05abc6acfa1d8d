//! Color-indexing (palette) transform.
//!
//! Images with at most 256 distinct colors can be sent as palette indices.
//! Small palettes pack several indices into one byte:
//!
//! | colors  | bits per index | pixels per byte |
//! |---------|----------------|-----------------|
//! | 1..=2   | 1              | 8               |
//! | 3..=4   | 2              | 4               |
//! | 5..=16  | 4              | 2               |
//! | 17..=256| 8              | 1               |
//!
//! Packed bytes go into the green channel of an opaque, narrower image.
//! The palette itself is sent as a `len x 1` image, each entry stored as the
//! difference to the one before it.

use crate::pixel::Rgba;
use oxiwebp_core::{Result, WebpError};
use std::collections::HashMap;

/// Largest palette VP8L can express.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Distinct colors in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<Rgba>,
    index: HashMap<Rgba, u8>,
}

impl Palette {
    /// Collect the palette of `pixels`.
    ///
    /// Fails with [`WebpError::PaletteOverflow`] as soon as a 257th color
    /// shows up.
    pub fn from_pixels(pixels: &[Rgba]) -> Result<Self> {
        let mut palette = Self::default();
        for &px in pixels {
            if palette.index.contains_key(&px) {
                continue;
            }
            if palette.colors.len() == MAX_PALETTE_SIZE {
                return Err(WebpError::palette_overflow(MAX_PALETTE_SIZE + 1));
            }
            palette.index.insert(px, palette.colors.len() as u8);
            palette.colors.push(px);
        }
        Ok(palette)
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in index order.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Palette index of `px`, if present.
    pub fn index_of(&self, px: Rgba) -> Option<u8> {
        self.index.get(&px).copied()
    }

    /// Log2 of the number of pixels packed into one byte.
    pub fn width_bits(&self) -> u8 {
        match self.colors.len() {
            0..=2 => 3,
            3..=4 => 2,
            5..=16 => 1,
            _ => 0,
        }
    }

    /// Replace pixels by packed indices; returns the packed image and its
    /// width.
    pub fn pack(&self, pixels: &[Rgba], width: usize, height: usize) -> (Vec<Rgba>, usize) {
        let per_byte = 1usize << self.width_bits();
        let bits_per_index = 8 / per_byte;
        let packed_width = width.div_ceil(per_byte);

        let mut packed = Vec::with_capacity(packed_width * height);
        for row in pixels.chunks_exact(width).take(height) {
            for group in row.chunks(per_byte) {
                let byte = group.iter().enumerate().fold(0u8, |acc, (i, &px)| {
                    // Every pixel came from the same image the palette did.
                    let index = self.index_of(px).unwrap_or_default();
                    acc | (index << (i * bits_per_index))
                });
                packed.push(Rgba::new(0, byte, 0, 255));
            }
        }

        (packed, packed_width)
    }

    /// The palette as transmitted: each entry minus its predecessor.
    pub fn delta_coded(&self) -> Vec<Rgba> {
        let mut previous = Rgba::default();
        self.colors
            .iter()
            .map(|&color| {
                let delta = color.wrapping_sub(previous);
                previous = color;
                delta
            })
            .collect()
    }
}
