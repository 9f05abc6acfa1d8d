//! # OxiWebP Core
//!
//! Core components for the OxiWebP lossless encoder.
//!
//! - [`bitstream`]: LSB-first bit-level I/O for the VP8L bitstream
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! OxiWebP is designed as a layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Tooling                                             │
//! │     oxiwebp CLI                                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     RIFF/WEBP framing, VP8L header inspection           │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Transforms, LZ77 tokens, canonical Huffman          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, error types                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiwebp_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0x2f, 8);
//! writer.write_bits(99, 14);
//! let data = writer.into_bytes();
//!
//! let mut reader = BitReader::new(Cursor::new(data));
//! assert_eq!(reader.read_bits(8).unwrap(), 0x2f);
//! assert_eq!(reader.read_bits(14).unwrap(), 99);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{Result, WebpError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{Result, WebpError};
}
