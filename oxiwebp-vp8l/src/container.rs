//! RIFF/WEBP framing and VP8L header inspection.
//!
//! ```text
//! offset  size  field
//! 0       4     "RIFF"
//! 4       4     u32 LE: file size - 8 (= chunk payload + 12)
//! 8       4     "WEBP"
//! 12      4     "VP8L"
//! 16      4     u32 LE: chunk payload size
//! 20      1     0x2f signature
//! 21      4     14-bit width-1, 14-bit height-1, alpha hint, 3-bit version
//! ```

use oxiwebp_core::{BitReader, BitWriter, Result, WebpError};

/// RIFF magic.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

/// RIFF form type of WebP files.
pub const WEBP_MAGIC: &[u8; 4] = b"WEBP";

/// Chunk tag of lossless bitstreams.
pub const VP8L_TAG: &[u8; 4] = b"VP8L";

/// First byte of every VP8L bitstream.
pub const VP8L_SIGNATURE: u8 = 0x2f;

/// Bytes before the VP8L payload.
pub const CONTAINER_HEADER_SIZE: usize = 20;

/// Signature byte plus the 32 header bits.
pub const VP8L_HEADER_SIZE: usize = 5;

/// Largest width or height the 14-bit fields can hold.
pub const MAX_DIMENSION: u32 = 1 << 14;

/// Parsed container sizes and VP8L header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vp8lHeader {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Alpha hint: some pixel is not fully opaque.
    pub alpha_is_used: bool,
    /// Bitstream version (always 0).
    pub version: u8,
    /// RIFF size field.
    pub riff_size: u32,
    /// VP8L chunk size field.
    pub chunk_size: u32,
}

/// Write the VP8L signature and image header.
pub fn write_bitstream_header(writer: &mut BitWriter, width: u32, height: u32, alpha: bool) {
    writer.write_bits(VP8L_SIGNATURE as u64, 8);
    writer.write_bits((width - 1) as u64, 14);
    writer.write_bits((height - 1) as u64, 14);
    writer.write_bit(alpha);
    writer.write_bits(0, 3);
}

/// Frame a VP8L payload in a RIFF/WEBP container.
///
/// The payload must already be padded to even length.
pub fn wrap(payload: &[u8]) -> Vec<u8> {
    debug_assert!(payload.len() % 2 == 0);
    let chunk_size = payload.len() as u32;

    let mut out = Vec::with_capacity(CONTAINER_HEADER_SIZE + payload.len());
    out.extend_from_slice(RIFF_MAGIC);
    out.extend_from_slice(&(chunk_size + 12).to_le_bytes());
    out.extend_from_slice(WEBP_MAGIC);
    out.extend_from_slice(VP8L_TAG);
    out.extend_from_slice(&chunk_size.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Whether `bytes` start like a WebP file.
pub fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == RIFF_MAGIC && &bytes[8..12] == WEBP_MAGIC
}

/// Parse the container and VP8L header at the start of `bytes`.
pub fn read_header(bytes: &[u8]) -> Result<Vp8lHeader> {
    let needed = CONTAINER_HEADER_SIZE + VP8L_HEADER_SIZE;
    if bytes.len() < 12 {
        return Err(WebpError::unexpected_eof(needed - bytes.len()));
    }
    if &bytes[0..4] != RIFF_MAGIC {
        return Err(WebpError::invalid_magic(RIFF_MAGIC.to_vec(), bytes[0..4].to_vec()));
    }
    if &bytes[8..12] != WEBP_MAGIC {
        return Err(WebpError::invalid_magic(WEBP_MAGIC.to_vec(), bytes[8..12].to_vec()));
    }
    if bytes.len() < needed {
        return Err(WebpError::unexpected_eof(needed - bytes.len()));
    }

    let tag = &bytes[12..16];
    if tag != VP8L_TAG {
        return Err(WebpError::invalid_header(format!(
            "expected lossless VP8L chunk, found {:?}",
            String::from_utf8_lossy(tag)
        )));
    }
    if bytes[20] != VP8L_SIGNATURE {
        return Err(WebpError::invalid_header(format!(
            "bad VP8L signature {:#04x}",
            bytes[20]
        )));
    }

    let le32 = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

    let mut reader = BitReader::new(&bytes[21..needed]);
    let width = reader.read_bits(14)? + 1;
    let height = reader.read_bits(14)? + 1;
    let alpha_is_used = reader.read_bit()?;
    let version = reader.read_bits(3)? as u8;
    if version != 0 {
        return Err(WebpError::invalid_header(format!(
            "unsupported VP8L version {version}"
        )));
    }

    Ok(Vp8lHeader {
        width,
        height,
        alpha_is_used,
        version,
        riff_size: le32(4),
        chunk_size: le32(16),
    })
}
