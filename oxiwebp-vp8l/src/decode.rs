//! Decoding through the `image` crate's WebP decoder.
//!
//! Decoding is not reimplemented here; these helpers call the external
//! decoder and map its failures onto [`WebpError`]. Callers that want WebP
//! support in `image::open` need nothing extra: the `webp` feature registers
//! the format with `image` itself.
//!
//! The external decoder masks the 14-bit size fields after adding one, so
//! files at the full 16384-pixel side that the encoder accepts are rejected
//! here with [`WebpError::Decode`]. Sides up to 16383 round-trip.

use image::codecs::webp::WebPDecoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageError};
use oxiwebp_core::{Result, WebpError};
use std::io::{BufRead, Seek};

/// Dimensions and pixel layout of a WebP image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout the decoder will produce.
    pub color_type: ColorType,
}

fn map_error(err: ImageError) -> WebpError {
    match err {
        ImageError::IoError(io) => WebpError::Io(io),
        other => WebpError::decode(other.to_string()),
    }
}

/// Decode a WebP image.
pub fn decode<R: BufRead + Seek>(reader: R) -> Result<DynamicImage> {
    let decoder = WebPDecoder::new(reader).map_err(map_error)?;
    DynamicImage::from_decoder(decoder).map_err(map_error)
}

/// Read the image dimensions and layout without decoding pixels.
pub fn decode_config<R: BufRead + Seek>(reader: R) -> Result<ImageConfig> {
    let decoder = WebPDecoder::new(reader).map_err(map_error)?;
    let (width, height) = decoder.dimensions();
    Ok(ImageConfig {
        width,
        height,
        color_type: decoder.color_type(),
    })
}
