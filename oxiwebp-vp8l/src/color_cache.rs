//! Direct-mapped color cache.
//!
//! The encoder and the decoder keep identical caches: every pixel that
//! crosses the bitstream is inserted at `(argb * 0x1e35a7bd) >> (32 - bits)`,
//! so a later pixel with the same color can be sent as a single slot index.
//! Both sides start from an all-zero table.

use crate::pixel::Rgba;

/// Multiplier used to hash packed ARGB values.
pub const COLOR_HASH_MULTIPLIER: u32 = 0x1e35a7bd;

/// Largest cache size the bitstream can announce.
pub const MAX_COLOR_CACHE_BITS: u8 = 11;

/// Hash a pixel down to `bits` bits.
#[inline]
pub fn color_hash(pixel: Rgba, bits: u8) -> usize {
    debug_assert!((1..=32).contains(&bits));
    (pixel.argb().wrapping_mul(COLOR_HASH_MULTIPLIER) >> (32 - bits as u32)) as usize
}

/// A `1 << bits` entry color cache.
#[derive(Debug, Clone)]
pub struct ColorCache {
    bits: u8,
    colors: Vec<Rgba>,
}

impl ColorCache {
    /// Create an all-zero cache with `1 << bits` slots.
    pub fn new(bits: u8) -> Self {
        debug_assert!((1..=MAX_COLOR_CACHE_BITS).contains(&bits));
        Self {
            bits,
            colors: vec![Rgba::default(); 1 << bits],
        }
    }

    /// Index width in bits.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.colors.len()
    }

    /// Slot `pixel` would occupy.
    #[inline]
    pub fn slot(&self, pixel: Rgba) -> usize {
        color_hash(pixel, self.bits)
    }

    /// Store `pixel` in its slot, evicting whatever was there.
    #[inline]
    pub fn insert(&mut self, pixel: Rgba) {
        let slot = self.slot(pixel);
        self.colors[slot] = pixel;
    }

    /// Color stored in `slot`.
    #[inline]
    pub fn get(&self, slot: usize) -> Rgba {
        self.colors[slot]
    }

    /// Slot index if `pixel` is currently cached.
    #[inline]
    pub fn lookup(&self, pixel: Rgba) -> Option<usize> {
        let slot = self.slot(pixel);
        (self.colors[slot] == pixel).then_some(slot)
    }
}
