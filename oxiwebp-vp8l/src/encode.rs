//! Lossless WebP encoding.
//!
//! [`Vp8lEncoder`] runs the whole pipeline for one image:
//!
//! 1. Validate dimensions and flatten the input to RGBA pixels
//! 2. Apply transforms, writing a record for each one
//! 3. Tokenize the transformed pixels and build Huffman codes
//! 4. Emit headers and tokens, pad, and frame the result in RIFF
//!
//! Nothing reaches the sink until the container is complete.

use crate::container::{MAX_DIMENSION, wrap, write_bitstream_header};
use crate::histogram::{EntropyCodes, Histogram};
use crate::lz77::tokenize;
use crate::options::EncoderOptions;
use crate::palette::Palette;
use crate::pixel::{Rgba, pixels_from_rgba};
use crate::predictor::apply_predictor_transform;
use crate::transform::{
    BlockImage, TransformType, apply_color_transform, subtract_green, write_transform_end,
};
use image::DynamicImage;
use log::debug;
use oxiwebp_core::{BitWriter, Result, WebpError};
use std::io::Write;

/// Lossless VP8L encoder.
#[derive(Debug, Clone, Default)]
pub struct Vp8lEncoder {
    options: EncoderOptions,
}

impl Vp8lEncoder {
    /// Create an encoder with the given options.
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode interleaved RGBA bytes into a complete WebP file.
    pub fn encode_rgba(&self, width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(WebpError::unsupported_format(format!(
                "RGBA buffer of {} bytes for a {width}x{height} image (expected {expected})",
                rgba.len()
            )));
        }
        self.encode_pixels(width, height, pixels_from_rgba(rgba))
    }

    /// Encode a decoded image into a complete WebP file.
    pub fn encode_image(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = (image.width(), image.height());
        check_dimensions(width, height)?;
        let rgba = flatten(image)?;
        self.encode_pixels(width, height, pixels_from_rgba(&rgba))
    }

    /// Encode row-major pixels into a complete WebP file.
    pub fn encode_pixels(&self, width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Vec<u8>> {
        self.options.validate()?;
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(WebpError::unsupported_format(format!(
                "{} pixels for a {width}x{height} image (expected {expected})",
                pixels.len()
            )));
        }

        let alpha = pixels.iter().any(|px| px.a != 255);
        let mut writer = BitWriter::with_capacity(pixels.len());
        write_bitstream_header(&mut writer, width, height, alpha);
        self.write_bitstream_data(&mut writer, pixels, width as usize, height as usize);
        writer.pad_to_even();

        let payload = writer.into_bytes();
        debug!(
            "encoded {width}x{height} image (alpha: {alpha}) into {} payload bytes",
            payload.len()
        );
        Ok(wrap(&payload))
    }

    fn write_bitstream_data(
        &self,
        writer: &mut BitWriter,
        mut pixels: Vec<Rgba>,
        mut width: usize,
        height: usize,
    ) {
        let cache_bits = self.options.color_cache_bits;

        let palette = if self.options.palette {
            match Palette::from_pixels(&pixels) {
                Ok(palette) => Some(palette),
                Err(err) => {
                    debug!("skipping color indexing: {err}");
                    None
                }
            }
        } else {
            None
        };

        if let Some(palette) = palette {
            debug!(
                "color indexing with {} colors, {} pixels per byte",
                palette.len(),
                1 << palette.width_bits()
            );
            TransformType::ColorIndexing.write(writer);
            writer.write_bits(palette.len() as u64 - 1, 8);
            let colors = palette.delta_coded();
            write_image_data(writer, &colors, colors.len(), cache_bits, false);

            let (packed, packed_width) = palette.pack(&pixels, width, height);
            pixels = packed;
            width = packed_width;
        } else {
            if self.options.subtract_green {
                debug!("subtract green");
                TransformType::SubtractGreen.write(writer);
                subtract_green(&mut pixels);
            }
            if self.options.color_transform {
                debug!("fixed color transform");
                TransformType::Color.write(writer);
                let block = apply_color_transform(&mut pixels, width, height);
                write_block_image(writer, &block, cache_bits);
            }
            if self.options.predictor {
                TransformType::Predictor.write(writer);
                let block = apply_predictor_transform(&mut pixels, width, height);
                debug!("predictor over {}x{} tiles", block.width, block.height);
                write_block_image(writer, &block, cache_bits);
            }
        }

        write_transform_end(writer);
        let tokens = write_image_data(writer, &pixels, width, cache_bits, true);
        debug!("main image: {width}x{height} pixels, {tokens} tokens");
    }
}

fn write_block_image(writer: &mut BitWriter, block: &BlockImage, cache_bits: u8) {
    block.write_tile_bits(writer);
    write_image_data(writer, &block.pixels, block.width, cache_bits, false);
}

/// Entropy-code one image and return the number of tokens written.
///
/// Only the top-level image carries the meta prefix bit.
fn write_image_data(
    writer: &mut BitWriter,
    pixels: &[Rgba],
    width: usize,
    cache_bits: u8,
    top_level: bool,
) -> usize {
    if cache_bits > 0 {
        writer.write_bits(1, 1);
        writer.write_bits(cache_bits as u64, 4);
    } else {
        writer.write_bits(0, 1);
    }

    if top_level {
        writer.write_bits(0, 1);
    }

    let tokens = tokenize(pixels, width, cache_bits);
    let codes = EntropyCodes::from_histogram(&Histogram::from_tokens(&tokens, cache_bits));
    codes.write_headers(writer);
    codes.write_tokens(writer, &tokens);
    tokens.len()
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(WebpError::invalid_image(width, height));
    }
    Ok(())
}

/// Flatten an 8-bit image to interleaved RGBA bytes.
fn flatten(image: &DynamicImage) -> Result<Vec<u8>> {
    match image {
        DynamicImage::ImageRgba8(buffer) => Ok(buffer.as_raw().clone()),
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgb8(_) => {
            Ok(image.to_rgba8().into_raw())
        }
        other => Err(WebpError::unsupported_format(format!("{:?}", other.color()))),
    }
}

/// Encode `image` as lossless WebP into `sink`.
pub fn encode<W: Write>(sink: W, image: &DynamicImage, options: &EncoderOptions) -> Result<()> {
    let file = Vp8lEncoder::new(*options).encode_image(image)?;
    write_all(sink, &file)
}

/// Encode interleaved RGBA bytes as lossless WebP into `sink`.
pub fn encode_rgba<W: Write>(
    sink: W,
    width: u32,
    height: u32,
    rgba: &[u8],
    options: &EncoderOptions,
) -> Result<()> {
    let file = Vp8lEncoder::new(*options).encode_rgba(width, height, rgba)?;
    write_all(sink, &file)
}

/// Encode `image` as lossless WebP into a new buffer.
pub fn encode_to_vec(image: &DynamicImage, options: &EncoderOptions) -> Result<Vec<u8>> {
    Vp8lEncoder::new(*options).encode_image(image)
}

fn write_all<W: Write>(mut sink: W, file: &[u8]) -> Result<()> {
    sink.write_all(file)?;
    sink.flush()?;
    Ok(())
}
