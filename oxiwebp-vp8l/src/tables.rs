//! Constant tables and prefix coding for VP8L.
//!
//! VP8L codes backward-reference lengths and distances with a shared
//! logarithmic prefix scheme: a Huffman-coded prefix symbol selects a bucket
//! and a run of raw extra bits selects the value inside it. Short distances
//! near the current pixel are first remapped to one of 120 "plane codes".

/// Number of literal symbols in the green alphabet.
pub const NUM_LITERAL_CODES: usize = 256;

/// Number of length-prefix symbols in the green alphabet.
pub const NUM_LENGTH_CODES: usize = 24;

/// Size of the distance-prefix alphabet.
pub const NUM_DISTANCE_CODES: usize = 40;

/// Size of the code-length alphabet.
pub const NUM_CODE_LENGTH_CODES: usize = 19;

/// Maximum Huffman code depth for image data.
pub const MAX_CODE_DEPTH: u8 = 15;

/// Maximum Huffman code depth for the code-length alphabet.
pub const MAX_CODE_LENGTH_DEPTH: u8 = 7;

/// Number of short-distance plane codes.
pub const NUM_PLANE_CODES: usize = 120;

/// Order in which code-length code depths are transmitted.
pub const CODE_LENGTH_ORDER: [usize; NUM_CODE_LENGTH_CODES] = [
    17, 18, 0, 1, 2, 3, 4, 5, 16, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
];

/// Maps a (dy, dx) neighbourhood cell to its plane code minus one.
///
/// Row `y` holds offsets `y` rows up; column `8 - x` holds `x` pixels to the
/// left (columns past 8 are pixels to the right on the row above). Cells
/// that can never be referenced hold 255.
pub const PLANE_TO_CODE_LUT: [u8; 128] = [
    96, 73, 55, 39, 23, 13, 5, 1, 255, 255, 255, 255, 255, 255, 255, 255, //
    101, 78, 58, 42, 26, 16, 8, 2, 0, 3, 9, 17, 27, 43, 59, 79, //
    102, 86, 62, 46, 32, 20, 10, 6, 4, 7, 11, 21, 33, 47, 63, 87, //
    105, 90, 70, 52, 37, 28, 18, 14, 12, 15, 19, 29, 38, 53, 71, 91, //
    110, 99, 82, 66, 48, 35, 30, 24, 22, 25, 31, 36, 49, 67, 83, 100, //
    115, 108, 94, 76, 64, 50, 44, 40, 34, 41, 45, 51, 65, 77, 95, 109, //
    118, 113, 103, 92, 80, 68, 60, 56, 54, 57, 61, 69, 81, 93, 104, 114, //
    119, 116, 111, 106, 97, 88, 84, 74, 72, 75, 85, 89, 98, 107, 112, 117, //
];

/// Convert a length or distance value (>= 1) to its prefix code.
///
/// Returns `(prefix_code, extra_bits, extra_value)`.
pub fn prefix_encode(value: u32) -> (u16, u8, u32) {
    debug_assert!(value >= 1, "prefix-coded values start at 1");

    if value <= 5 {
        let code = value.saturating_sub(1) as u16;
        return (code, prefix_extra_bits(code), 0);
    }

    let mut shift = 0u32;
    let mut rem = value - 1;
    while rem > 3 {
        rem >>= 1;
        shift += 1;
    }

    let (code, extra_value) = if rem == 2 {
        (2 + 2 * shift, value - (2 << shift) - 1)
    } else {
        (3 + 2 * shift, value - (3 << shift) - 1)
    };

    let code = code as u16;
    (code, prefix_extra_bits(code), extra_value)
}

/// Number of raw extra bits that follow a prefix code.
#[inline]
pub fn prefix_extra_bits(code: u16) -> u8 {
    if code < 4 { 0 } else { ((code - 2) >> 1) as u8 }
}

/// Decode a prefix code and its extra bits back to the value.
pub fn prefix_decode(code: u16, extra_value: u32) -> u32 {
    if code < 4 {
        return code as u32 + 1;
    }
    let extra_bits = prefix_extra_bits(code);
    let offset = (2 + (code as u32 & 1)) << extra_bits;
    offset + extra_value + 1
}

/// Map a linear pixel distance to a VP8L distance code.
///
/// Distances that land in the 8x8-ish neighbourhood above and to the left
/// (or just right on the previous rows) get one of the 120 plane codes;
/// everything else is shifted past them.
pub fn distance_to_plane_code(width: usize, distance: usize) -> usize {
    let yoffset = distance / width;
    let xoffset = distance - yoffset * width;

    if xoffset <= 8 && yoffset < 8 {
        PLANE_TO_CODE_LUT[yoffset * 16 + 8 - xoffset] as usize + 1
    } else if xoffset + 8 > width && yoffset < 7 {
        PLANE_TO_CODE_LUT[(yoffset + 1) * 16 + 8 + (width - xoffset)] as usize + 1
    } else {
        distance + NUM_PLANE_CODES
    }
}
