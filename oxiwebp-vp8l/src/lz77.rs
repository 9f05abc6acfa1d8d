//! Backward-reference matching for VP8L.
//!
//! The matcher walks the pixel stream once and turns it into [`Token`]s.
//! For each position it hashes the next three pixels, follows a short hash
//! chain of earlier positions with the same hash, and keeps the longest run
//! of identical pixels it finds. Runs of three or more pixels become a
//! length/distance reference; everything else is sent either as a color
//! cache slot or as four literal channels.
//!
//! # Data layout
//!
//! `head` maps a 14-bit hash to the most recent position with that hash and
//! `prev` links each position to the previous one in its chain. Both store
//! positions plus one so that 0 can mean "empty".

use crate::color_cache::{COLOR_HASH_MULTIPLIER, ColorCache};
use crate::pixel::Rgba;
use crate::tables::{distance_to_plane_code, prefix_encode};

/// Hash table size in bits.
pub const HASH_BITS: u32 = 14;

/// Number of hash table buckets.
pub const HASH_SIZE: usize = 1 << HASH_BITS;

/// Maximum number of chain links followed per position.
pub const MAX_CHAIN_HOPS: usize = 8;

/// Largest distance a reference may span.
pub const WINDOW_SIZE: usize = (1 << 20) - 120;

/// Minimum run length worth a reference.
pub const MIN_MATCH: usize = 3;

/// Longest run a single reference can copy.
pub const MAX_MATCH: usize = 4096;

/// A value split into a prefix symbol and raw extra bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixCoded {
    /// Prefix symbol.
    pub code: u16,
    /// Number of raw extra bits.
    pub extra_bits: u8,
    /// Raw extra bits value.
    pub extra: u32,
}

impl PrefixCoded {
    /// Prefix-code `value` (>= 1).
    pub fn new(value: u32) -> Self {
        let (code, extra_bits, extra) = prefix_encode(value);
        Self {
            code,
            extra_bits,
            extra,
        }
    }
}

/// One symbol group of the entropy-coded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A pixel sent channel by channel.
    Literal(Rgba),
    /// A pixel sent as a color cache slot.
    CacheIndex(u16),
    /// Copy `length` pixels from `distance` pixels back.
    BackRef {
        /// Prefix-coded run length.
        length: PrefixCoded,
        /// Prefix-coded distance (after plane-code mapping).
        distance: PrefixCoded,
    },
}

impl Token {
    /// Whether this is a backward reference.
    pub fn is_backref(&self) -> bool {
        matches!(self, Token::BackRef { .. })
    }
}

#[inline]
fn pixel_hash(pixel: Rgba) -> u32 {
    pixel.argb().wrapping_mul(COLOR_HASH_MULTIPLIER) >> (32 - HASH_BITS)
}

/// Chain hash of three consecutive pixels.
#[inline]
fn hash3(p0: Rgba, p1: Rgba, p2: Rgba) -> usize {
    let h = pixel_hash(p0)
        ^ pixel_hash(p1).wrapping_mul(0x9e3779b9)
        ^ pixel_hash(p2).wrapping_mul(0x85ebca6b);
    (h as usize) & (HASH_SIZE - 1)
}

/// Hash-chain matcher producing VP8L tokens.
#[derive(Debug)]
pub struct TokenEncoder {
    head: Vec<u32>,
    prev: Vec<u32>,
    cache: Option<ColorCache>,
}

impl TokenEncoder {
    /// Create a matcher; `cache_bits == 0` disables the color cache.
    pub fn new(cache_bits: u8) -> Self {
        Self {
            head: vec![0; HASH_SIZE],
            prev: Vec::new(),
            cache: (cache_bits > 0).then(|| ColorCache::new(cache_bits)),
        }
    }

    /// Tokenize `pixels`, a row-major image `width` pixels wide.
    pub fn encode(mut self, pixels: &[Rgba], width: usize) -> Vec<Token> {
        let n = pixels.len();
        self.prev = vec![0; n];
        let mut tokens = Vec::with_capacity(n);

        let mut i = 0;
        while i < n {
            if i + 2 < n {
                let (run, distance) = self.find_match(pixels, i);
                if run >= MIN_MATCH {
                    if let Some(cache) = self.cache.as_mut() {
                        for &px in &pixels[i..i + run] {
                            cache.insert(px);
                        }
                    }
                    let code = distance_to_plane_code(width, distance);
                    tokens.push(Token::BackRef {
                        length: PrefixCoded::new(run as u32),
                        distance: PrefixCoded::new(code as u32),
                    });
                    i += run;
                    continue;
                }
            }

            let px = pixels[i];
            match self.cache.as_mut() {
                Some(cache) => match cache.lookup(px) {
                    Some(slot) => tokens.push(Token::CacheIndex(slot as u16)),
                    None => {
                        cache.insert(px);
                        tokens.push(Token::Literal(px));
                    }
                },
                None => tokens.push(Token::Literal(px)),
            }
            i += 1;
        }

        tokens
    }

    /// Link position `i` into its chain and return the best `(run, distance)`.
    fn find_match(&mut self, pixels: &[Rgba], i: usize) -> (usize, usize) {
        let h = hash3(pixels[i], pixels[i + 1], pixels[i + 2]);
        let mut candidate = self.head[h];
        self.prev[i] = candidate;
        self.head[h] = i as u32 + 1;

        let limit = (pixels.len() - i).min(MAX_MATCH);
        let (mut best_run, mut best_distance) = (0, 0);

        for _ in 0..MAX_CHAIN_HOPS {
            if candidate == 0 {
                break;
            }
            let j = candidate as usize - 1;
            if i - j >= WINDOW_SIZE {
                break;
            }

            // Overlapping runs are fine: the decoder copies pixel by pixel.
            let run = (0..limit)
                .take_while(|&k| pixels[i + k] == pixels[j + k])
                .count();
            if run > best_run {
                best_run = run;
                best_distance = i - j;
            }

            candidate = self.prev[j];
        }

        (best_run, best_distance)
    }
}

/// Tokenize an image with the given cache size.
pub fn tokenize(pixels: &[Rgba], width: usize, cache_bits: u8) -> Vec<Token> {
    TokenEncoder::new(cache_bits).encode(pixels, width)
}
