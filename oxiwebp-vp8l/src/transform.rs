//! Reversible pixel transforms and their bitstream records.
//!
//! Transforms are applied in place, in a fixed order, before the pixels are
//! tokenized:
//!
//! ```text
//! color-indexing -> subtract-green -> color transform -> predictor
//! ```
//!
//! Each one is announced with a `1` bit and a 2-bit [`TransformType`]; a
//! single `0` bit closes the chain. Tiled transforms carry a [`BlockImage`]
//! with one pixel of parameters per tile, which is entropy coded like any
//! other image.
//!
//! The palette and predictor transforms live in their own modules; this one
//! holds the record framing, subtract-green and the color transform.

use crate::pixel::Rgba;
use oxiwebp_core::BitWriter;

/// Tile size in bits used by the tiled transforms (16x16 tiles).
pub const TILE_BITS: u8 = 4;

/// Transform type tags as they appear in the bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransformType {
    /// Spatial prediction per tile.
    Predictor = 0,
    /// Cross-channel decorrelation per tile.
    Color = 1,
    /// Green subtracted from red and blue.
    SubtractGreen = 2,
    /// Palette indices.
    ColorIndexing = 3,
}

impl TransformType {
    /// Write the "transform present" bit and the type tag.
    pub fn write(self, writer: &mut BitWriter) {
        writer.write_bits(1, 1);
        writer.write_bits(self as u64, 2);
    }
}

/// Write the bit that closes the transform chain.
pub fn write_transform_end(writer: &mut BitWriter) {
    writer.write_bits(0, 1);
}

/// `ceil(size / 2^bits)`.
#[inline]
pub fn subsample_size(size: usize, bits: u8) -> usize {
    (size + (1 << bits) - 1) >> bits
}

/// Per-tile parameters of a tiled transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockImage {
    /// Tile size in bits.
    pub tile_bits: u8,
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// One pixel per tile, row-major.
    pub pixels: Vec<Rgba>,
}

impl BlockImage {
    /// Block image with every tile set to `fill`.
    pub fn new(image_width: usize, image_height: usize, tile_bits: u8, fill: Rgba) -> Self {
        let width = subsample_size(image_width, tile_bits);
        let height = subsample_size(image_height, tile_bits);
        Self {
            tile_bits,
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Write the tile size field (`tile_bits - 2` in 3 bits).
    pub fn write_tile_bits(&self, writer: &mut BitWriter) {
        writer.write_bits((self.tile_bits - 2) as u64, 3);
    }
}

/// Subtract green from red and blue, wrapping.
pub fn subtract_green(pixels: &mut [Rgba]) {
    for px in pixels {
        px.r = px.r.wrapping_sub(px.g);
        px.b = px.b.wrapping_sub(px.g);
    }
}

/// Inverse of [`subtract_green`].
pub fn add_green(pixels: &mut [Rgba]) {
    for px in pixels {
        px.r = px.r.wrapping_add(px.g);
        px.b = px.b.wrapping_add(px.g);
    }
}

/// Multipliers of the color transform, as signed 3.5 fixed point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTransformElement {
    /// Green's contribution subtracted from red.
    pub green_to_red: u8,
    /// Green's contribution subtracted from blue.
    pub green_to_blue: u8,
    /// Red's contribution subtracted from blue.
    pub red_to_blue: u8,
}

impl ColorTransformElement {
    /// The constant multipliers used for every tile.
    pub const FIXED: Self = Self {
        green_to_red: 3,
        green_to_blue: 2,
        red_to_blue: 1,
    };

    /// Block image pixel holding this element.
    pub fn to_pixel(self) -> Rgba {
        Rgba::new(self.red_to_blue, self.green_to_blue, self.green_to_red, 255)
    }

    /// Decorrelate one pixel.
    #[inline]
    pub fn apply(self, px: Rgba) -> Rgba {
        let red = px
            .r
            .wrapping_sub(color_transform_delta(self.green_to_red, px.g));
        let blue = px
            .b
            .wrapping_sub(color_transform_delta(self.green_to_blue, px.g))
            .wrapping_sub(color_transform_delta(self.red_to_blue, px.r));
        Rgba::new(red, px.g, blue, px.a)
    }

    /// Undo [`apply`](Self::apply) the way a decoder does.
    #[inline]
    pub fn invert(self, px: Rgba) -> Rgba {
        let red = px
            .r
            .wrapping_add(color_transform_delta(self.green_to_red, px.g));
        let blue = px
            .b
            .wrapping_add(color_transform_delta(self.green_to_blue, px.g))
            .wrapping_add(color_transform_delta(self.red_to_blue, red));
        Rgba::new(red, px.g, blue, px.a)
    }
}

/// `(t * c) >> 5` with both operands read as signed bytes.
#[inline]
fn color_transform_delta(t: u8, c: u8) -> u8 {
    ((t as i8 as i32 * c as i8 as i32) >> 5) as u8
}

/// Apply the fixed color transform to every tile and return its block image.
pub fn apply_color_transform(pixels: &mut [Rgba], width: usize, height: usize) -> BlockImage {
    let element = ColorTransformElement::FIXED;
    for px in pixels.iter_mut() {
        *px = element.apply(*px);
    }
    BlockImage::new(width, height, TILE_BITS, element.to_pixel())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Rgba> {
        (0..=255u8)
            .map(|v| Rgba::new(v, v.wrapping_mul(37), v ^ 0xa5, v.wrapping_add(3)))
            .collect()
    }

    #[test]
    fn test_transform_record_bits() {
        let mut writer = BitWriter::new();
        TransformType::ColorIndexing.write(&mut writer);
        TransformType::Predictor.write(&mut writer);
        write_transform_end(&mut writer);
        assert_eq!(writer.bits_written(), 7);
        // 1,11 then 1,00 then 0, LSB first.
        assert_eq!(writer.into_bytes(), vec![0b0000_1111]);
    }

    #[test]
    fn test_subsample_size() {
        assert_eq!(subsample_size(1, 4), 1);
        assert_eq!(subsample_size(16, 4), 1);
        assert_eq!(subsample_size(17, 4), 2);
        assert_eq!(subsample_size(10, 3), 2);
    }

    #[test]
    fn test_subtract_green_inverse() {
        let original = sample();
        let mut pixels = original.clone();
        subtract_green(&mut pixels);
        assert_ne!(pixels, original);
        add_green(&mut pixels);
        assert_eq!(pixels, original);
    }

    #[test]
    fn test_subtract_green_values() {
        let mut pixels = vec![Rgba::new(10, 20, 30, 40)];
        subtract_green(&mut pixels);
        assert_eq!(pixels[0], Rgba::new(246, 20, 10, 40));
    }

    #[test]
    fn test_color_transform_inverse() {
        let element = ColorTransformElement::FIXED;
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(3) {
                let px = Rgba::new(r, g, r ^ g, 200);
                assert_eq!(element.invert(element.apply(px)), px);
            }
        }
    }

    #[test]
    fn test_color_transform_delta_sign() {
        // -128 * 3 >> 5 = -12
        assert_eq!(color_transform_delta(3, 0x80), (-12i8) as u8);
        assert_eq!(color_transform_delta(2, 64), 4);
    }

    #[test]
    fn test_color_transform_block_image() {
        let mut pixels = sample();
        let block = apply_color_transform(&mut pixels, 32, 8);
        assert_eq!((block.width, block.height), (2, 1));
        assert!(block.pixels.iter().all(|&p| p == Rgba::new(1, 2, 3, 255)));
    }
}
