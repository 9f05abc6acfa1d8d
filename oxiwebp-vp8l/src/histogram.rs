//! Symbol statistics and entropy coding of a token stream.
//!
//! Each entropy-coded image uses five Huffman codes. [`Histogram`] counts
//! symbol frequencies over the whole token stream, [`EntropyCodes`] turns the
//! counts into codes, writes their headers and then emits the tokens.

use crate::huffman::HuffmanTable;
use crate::lz77::Token;
use crate::tables::{MAX_CODE_DEPTH, NUM_DISTANCE_CODES, NUM_LENGTH_CODES, NUM_LITERAL_CODES};
use oxiwebp_core::BitWriter;

/// The five alphabets of an entropy-coded image, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// Green literals, length prefixes and cache slots.
    Green = 0,
    /// Red literals.
    Red = 1,
    /// Blue literals.
    Blue = 2,
    /// Alpha literals.
    Alpha = 3,
    /// Distance prefixes.
    Distance = 4,
}

/// Number of alphabets per entropy-coded image.
pub const NUM_ALPHABETS: usize = 5;

/// Size of the green alphabet for a given cache size.
pub fn green_alphabet_size(cache_bits: u8) -> usize {
    let cache = if cache_bits > 0 { 1 << cache_bits } else { 0 };
    NUM_LITERAL_CODES + NUM_LENGTH_CODES + cache
}

/// Symbol counts for the five alphabets.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: [Vec<u32>; NUM_ALPHABETS],
}

impl Histogram {
    /// Create an empty histogram sized for `cache_bits`.
    pub fn new(cache_bits: u8) -> Self {
        Self {
            counts: [
                vec![0; green_alphabet_size(cache_bits)],
                vec![0; NUM_LITERAL_CODES],
                vec![0; NUM_LITERAL_CODES],
                vec![0; NUM_LITERAL_CODES],
                vec![0; NUM_DISTANCE_CODES],
            ],
        }
    }

    /// Count every token of a stream.
    pub fn from_tokens(tokens: &[Token], cache_bits: u8) -> Self {
        let mut histogram = Self::new(cache_bits);
        for token in tokens {
            histogram.add(token);
        }
        histogram
    }

    /// Count one token.
    pub fn add(&mut self, token: &Token) {
        match *token {
            Token::Literal(px) => {
                self.counts[Alphabet::Green as usize][px.g as usize] += 1;
                self.counts[Alphabet::Red as usize][px.r as usize] += 1;
                self.counts[Alphabet::Blue as usize][px.b as usize] += 1;
                self.counts[Alphabet::Alpha as usize][px.a as usize] += 1;
            }
            Token::CacheIndex(slot) => {
                self.counts[Alphabet::Green as usize]
                    [NUM_LITERAL_CODES + NUM_LENGTH_CODES + slot as usize] += 1;
            }
            Token::BackRef { length, distance } => {
                self.counts[Alphabet::Green as usize][NUM_LITERAL_CODES + length.code as usize] +=
                    1;
                self.counts[Alphabet::Distance as usize][distance.code as usize] += 1;
            }
        }
    }

    /// Counts for one alphabet.
    pub fn counts(&self, alphabet: Alphabet) -> &[u32] {
        &self.counts[alphabet as usize]
    }
}

/// Huffman codes for the five alphabets of one image.
#[derive(Debug, Clone)]
pub struct EntropyCodes {
    tables: [HuffmanTable; NUM_ALPHABETS],
}

impl EntropyCodes {
    /// Build depth-limited codes from a histogram.
    pub fn from_histogram(histogram: &Histogram) -> Self {
        Self {
            tables: histogram
                .counts
                .each_ref()
                .map(|counts| HuffmanTable::from_histogram(counts, MAX_CODE_DEPTH)),
        }
    }

    /// Table for one alphabet.
    pub fn table(&self, alphabet: Alphabet) -> &HuffmanTable {
        &self.tables[alphabet as usize]
    }

    /// Write the five code-length headers in alphabet order.
    pub fn write_headers(&self, writer: &mut BitWriter) {
        for table in &self.tables {
            table.write_header(writer);
        }
    }

    /// Emit one token.
    pub fn write_token(&self, writer: &mut BitWriter, token: &Token) {
        let green = self.table(Alphabet::Green);
        match *token {
            Token::Literal(px) => {
                green.write_symbol(writer, px.g as usize);
                self.table(Alphabet::Red).write_symbol(writer, px.r as usize);
                self.table(Alphabet::Blue).write_symbol(writer, px.b as usize);
                self.table(Alphabet::Alpha).write_symbol(writer, px.a as usize);
            }
            Token::CacheIndex(slot) => {
                green.write_symbol(writer, NUM_LITERAL_CODES + NUM_LENGTH_CODES + slot as usize);
            }
            Token::BackRef { length, distance } => {
                green.write_symbol(writer, NUM_LITERAL_CODES + length.code as usize);
                if length.extra_bits > 0 {
                    writer.write_bits(length.extra as u64, length.extra_bits);
                }
                self.table(Alphabet::Distance)
                    .write_symbol(writer, distance.code as usize);
                if distance.extra_bits > 0 {
                    writer.write_bits(distance.extra as u64, distance.extra_bits);
                }
            }
        }
    }

    /// Emit a whole token stream.
    pub fn write_tokens(&self, writer: &mut BitWriter, tokens: &[Token]) {
        for token in tokens {
            self.write_token(writer, token);
        }
    }
}
