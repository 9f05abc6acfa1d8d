//! Error types for OxiWebP operations.
//!
//! A single error type covers the encoder (invalid input rasters, unsupported
//! pixel layouts, sink failures), container inspection (bad magic, truncated
//! headers) and the decode pass-through.

use std::io;
use thiserror::Error;

/// The main error type for OxiWebP operations.
#[derive(Debug, Error)]
pub enum WebpError {
    /// I/O error from the underlying sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The image has zero area or does not fit the 14-bit size fields.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The raster cannot be flattened into interleaved 8-bit RGBA.
    #[error("Unsupported pixel format: {format}")]
    UnsupportedPixelFormat {
        /// Description of the rejected layout.
        format: String,
    },

    /// Too many distinct colors for the color-indexing transform.
    #[error("Palette overflow: more than 256 distinct colors (found at least {colors})")]
    PaletteOverflow {
        /// Number of distinct colors seen before giving up.
        colors: usize,
    },

    /// An encoder option is out of range.
    #[error("Invalid option: {message}")]
    InvalidOption {
        /// Description of the offending option.
        message: String,
    },

    /// Invalid magic bytes in the container.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of file: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// The external decoder rejected the input.
    #[error("Decode error: {message}")]
    Decode {
        /// Message reported by the decoder.
        message: String,
    },
}

/// Result type alias for OxiWebP operations.
pub type Result<T> = std::result::Result<T, WebpError>;

impl WebpError {
    /// Create an invalid image error.
    pub fn invalid_image(width: u32, height: u32) -> Self {
        Self::InvalidImage { width, height }
    }

    /// Create an unsupported pixel format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedPixelFormat {
            format: format.into(),
        }
    }

    /// Create a palette overflow error.
    pub fn palette_overflow(colors: usize) -> Self {
        Self::PaletteOverflow { colors }
    }

    /// Create an invalid option error.
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WebpError::invalid_magic(b"RIFF".to_vec(), b"FORM".to_vec());
        assert!(err.to_string().contains("Invalid magic"));

        let err = WebpError::invalid_image(0, 12);
        assert!(err.to_string().contains("0x12"));

        let err = WebpError::unsupported_format("Rgb16");
        assert!(err.to_string().contains("Rgb16"));

        let err = WebpError::palette_overflow(257);
        assert!(err.to_string().contains("257"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "sink closed");
        let err: WebpError = io_err.into();
        assert!(matches!(err, WebpError::Io(_)));
    }
}
