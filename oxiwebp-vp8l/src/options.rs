//! Encoder configuration.

use crate::color_cache::MAX_COLOR_CACHE_BITS;
use oxiwebp_core::{Result, WebpError};

/// Tuning knobs for the lossless encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Color cache size in bits; 0 disables the cache.
    pub color_cache_bits: u8,
    /// Try the color-indexing transform first.
    /// Images with more than 256 colors fall back to the other transforms.
    pub palette: bool,
    /// Apply the fixed color transform when no palette is used.
    pub color_transform: bool,
    /// Apply the predictor transform when no palette is used.
    pub predictor: bool,
    /// Apply subtract-green when no palette is used.
    pub subtract_green: bool,
}

impl EncoderOptions {
    /// Default configuration.
    ///
    /// - 4-bit color cache
    /// - Palette when the image allows it
    /// - Otherwise subtract-green and predictor, no color transform
    pub const DEFAULT: Self = Self {
        color_cache_bits: 4,
        palette: true,
        color_transform: false,
        predictor: true,
        subtract_green: true,
    };

    /// Skip the predictor search and the color cache.
    pub const FAST: Self = Self {
        color_cache_bits: 0,
        palette: true,
        color_transform: false,
        predictor: false,
        subtract_green: true,
    };

    /// Create the default configuration.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the color cache size.
    pub fn with_color_cache_bits(mut self, bits: u8) -> Self {
        self.color_cache_bits = bits;
        self
    }

    /// Enable or disable the color-indexing attempt.
    pub fn with_palette(mut self, enabled: bool) -> Self {
        self.palette = enabled;
        self
    }

    /// Enable or disable the color transform.
    pub fn with_color_transform(mut self, enabled: bool) -> Self {
        self.color_transform = enabled;
        self
    }

    /// Enable or disable the predictor transform.
    pub fn with_predictor(mut self, enabled: bool) -> Self {
        self.predictor = enabled;
        self
    }

    /// Enable or disable subtract-green.
    pub fn with_subtract_green(mut self, enabled: bool) -> Self {
        self.subtract_green = enabled;
        self
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<()> {
        if self.color_cache_bits > MAX_COLOR_CACHE_BITS {
            return Err(WebpError::invalid_option(format!(
                "color cache bits {} out of range 0..={MAX_COLOR_CACHE_BITS}",
                self.color_cache_bits
            )));
        }
        Ok(())
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
