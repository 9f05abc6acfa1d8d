//! # OxiWebP VP8L
//!
//! Pure Rust lossless WebP (VP8L) encoder.
//!
//! ## Features
//!
//! - **Transforms**: color indexing, subtract green, color transform,
//!   per-tile predictor selection
//! - **Backward references**: hash-chain matcher with plane-coded distances
//!   and an optional color cache
//! - **Entropy coding**: depth-limited canonical Huffman codes
//! - **Container**: RIFF/WEBP framing and header inspection
//! - **Decoding**: delegated to the `image` crate
//!
//! ## Example
//!
//! ```rust
//! use oxiwebp_vp8l::{EncoderOptions, decode, encode_rgba};
//! use std::io::Cursor;
//!
//! // 2x2 image: red, green, blue, transparent
//! let rgba = [
//!     255, 0, 0, 255, 0, 255, 0, 255,
//!     0, 0, 255, 255, 0, 0, 0, 0,
//! ];
//!
//! let mut file = Vec::new();
//! encode_rgba(&mut file, 2, 2, &rgba, &EncoderOptions::default()).unwrap();
//!
//! let image = decode(Cursor::new(file)).unwrap();
//! assert_eq!(image.to_rgba8().as_raw(), &rgba);
//! ```
//!
//! ## Options
//!
//! - `EncoderOptions::DEFAULT`: palette when possible, otherwise
//!   subtract green + predictor, 4-bit color cache
//! - `EncoderOptions::FAST`: no predictor search, no color cache

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod color_cache;
pub mod container;
pub mod decode;
pub mod encode;
pub mod histogram;
pub mod huffman;
pub mod lz77;
pub mod options;
pub mod palette;
pub mod pixel;
pub mod predictor;
pub mod tables;
pub mod transform;

// Re-exports
pub use container::{Vp8lHeader, is_webp, read_header};
pub use decode::{ImageConfig, decode, decode_config};
pub use encode::{Vp8lEncoder, encode, encode_rgba, encode_to_vec};
pub use huffman::{HuffmanCode, HuffmanTable};
pub use lz77::{Token, TokenEncoder};
pub use options::EncoderOptions;
pub use pixel::Rgba;
