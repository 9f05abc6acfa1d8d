//! Canonical Huffman coding for VP8L.
//!
//! Code construction happens in three steps:
//!
//! 1. [`HuffmanTree::build`] merges the two lightest nodes of a min-heap until
//!    one root remains. Weights below `sum >> (max_depth - 2)` are raised to
//!    that floor, which keeps rare symbols from sinking too deep.
//! 2. [`HuffmanTree::assign_depths`] walks the tree and records leaf depths.
//! 3. [`build_codes`] sorts leaves by (depth, symbol) and hands out canonical
//!    bit patterns, so a decoder can rebuild the codes from depths alone.
//!
//! The tree is an arena of nodes addressed by index and is dropped as soon as
//! the depths are known.
//!
//! # Alphabets
//!
//! VP8L transmits five codes per entropy-coded image:
//! - **Green**: 256 literals + 24 length prefixes + color-cache indices
//! - **Red**, **Blue**, **Alpha**: 256 literals each
//! - **Distance**: 40 distance prefixes
//!
//! and a secondary 19-symbol **code-length** code used to transmit the
//! depths of the others.

use crate::tables::{
    CODE_LENGTH_ORDER, MAX_CODE_LENGTH_DEPTH, NUM_CODE_LENGTH_CODES, NUM_LITERAL_CODES,
};
use oxiwebp_core::BitWriter;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A canonical Huffman code for one symbol.
///
/// `bits` holds the pattern MSB-first; a `depth` of 0 marks an unused symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCode {
    /// Symbol this code stands for.
    pub symbol: u16,
    /// Canonical bit pattern, most significant bit first.
    pub bits: u32,
    /// Code length in bits.
    pub depth: u8,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf { symbol: u16 },
    Branch { left: usize, right: usize },
}

/// Transient Huffman tree used only to derive code depths.
#[derive(Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree for `histogram`, flooring weights to keep depths near
    /// `max_depth`.
    pub fn build(histogram: &[u32], max_depth: u8) -> Self {
        debug_assert!(max_depth >= 2);
        Self::build_with_floor(histogram, histogram_sum(histogram) >> (max_depth - 2))
    }

    fn build_with_floor(histogram: &[u32], floor: u64) -> Self {
        let mut nodes = Vec::with_capacity(histogram.len() * 2);
        // Ties are broken by node index so the tree is deterministic.
        let mut heap = BinaryHeap::with_capacity(histogram.len());

        for (symbol, &count) in histogram.iter().enumerate() {
            if count > 0 {
                let weight = (count as u64).max(floor);
                heap.push(Reverse((weight, nodes.len())));
                nodes.push(Node::Leaf {
                    symbol: symbol as u16,
                });
            }
        }

        if heap.is_empty() {
            heap.push(Reverse((floor, nodes.len())));
            nodes.push(Node::Leaf { symbol: 0 });
        }

        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(Reverse((w1, left))), Some(Reverse((w2, right)))) => {
                    heap.push(Reverse((w1 + w2, nodes.len())));
                    nodes.push(Node::Branch { left, right });
                }
                (Some(Reverse((_, root))), None) => break root,
                _ => unreachable!("heap always holds at least one node"),
            }
        };

        Self { nodes, root }
    }

    /// The symbol of a single-leaf tree, if that is what this is.
    fn lone_symbol(&self) -> Option<u16> {
        match self.nodes[self.root] {
            Node::Leaf { symbol } => Some(symbol),
            Node::Branch { .. } => None,
        }
    }

    /// Depth of every leaf as `(symbol, depth)`; the root sits at depth 0.
    pub fn assign_depths(&self) -> Vec<(u16, u32)> {
        let mut depths = Vec::with_capacity(self.nodes.len() / 2 + 1);
        let mut stack = vec![(self.root, 0u32)];

        while let Some((index, level)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { symbol } => depths.push((symbol, level)),
                Node::Branch { left, right } => {
                    stack.push((right, level + 1));
                    stack.push((left, level + 1));
                }
            }
        }

        depths
    }
}

fn histogram_sum(histogram: &[u32]) -> u64 {
    histogram.iter().map(|&c| c as u64).sum()
}

/// Build canonical codes for `histogram` with no code deeper than
/// `max_depth`.
///
/// A histogram with a single live symbol gets a depth-1 code for that
/// symbol; an empty histogram gets no codes at all.
pub fn build_codes(histogram: &[u32], max_depth: u8) -> Vec<HuffmanCode> {
    let mut codes: Vec<HuffmanCode> = (0..histogram.len())
        .map(|symbol| HuffmanCode {
            symbol: symbol as u16,
            ..HuffmanCode::default()
        })
        .collect();

    let mut floor = histogram_sum(histogram) >> (max_depth - 2);
    let mut leaves = loop {
        let tree = HuffmanTree::build_with_floor(histogram, floor);

        if let Some(symbol) = tree.lone_symbol() {
            // The placeholder leaf of an empty histogram is not a real symbol.
            if histogram.get(symbol as usize).is_some_and(|&c| c > 0) {
                codes[symbol as usize].depth = 1;
            }
            return codes;
        }

        let leaves = tree.assign_depths();
        if leaves.iter().all(|&(_, depth)| depth <= max_depth as u32) {
            break leaves;
        }
        // Too deep: flatten the distribution and try again.
        floor = (floor * 2).max(1);
    };

    leaves.sort_unstable_by_key(|&(symbol, depth)| (depth, symbol));

    let mut bits = 0u32;
    let mut prev_depth = 0u32;
    for (symbol, depth) in leaves {
        bits <<= depth - prev_depth;
        codes[symbol as usize] = HuffmanCode {
            symbol,
            bits,
            depth: depth as u8,
        };
        bits += 1;
        prev_depth = depth;
    }

    codes
}

/// The complete set of codes for one alphabet.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    codes: Vec<HuffmanCode>,
    live: usize,
}

impl HuffmanTable {
    /// Build the table for a frequency histogram.
    pub fn from_histogram(histogram: &[u32], max_depth: u8) -> Self {
        Self::from_codes(build_codes(histogram, max_depth))
    }

    /// Wrap already-built codes.
    pub fn from_codes(codes: Vec<HuffmanCode>) -> Self {
        let live = codes.iter().filter(|c| c.depth > 0).count();
        Self { codes, live }
    }

    /// All codes, indexed by symbol.
    pub fn codes(&self) -> &[HuffmanCode] {
        &self.codes
    }

    /// Code depth of `symbol` (0 if unused).
    pub fn depth(&self, symbol: usize) -> u8 {
        self.codes.get(symbol).map_or(0, |c| c.depth)
    }

    /// Number of symbols with a non-zero depth.
    pub fn live_symbols(&self) -> usize {
        self.live
    }

    /// Emit the code for `symbol`.
    ///
    /// An alphabet with only one live symbol is implied by its header, so
    /// nothing is written for it.
    #[inline]
    pub fn write_symbol(&self, writer: &mut BitWriter, symbol: usize) {
        if self.live > 1 {
            let code = self.codes[symbol];
            writer.write_code(code.bits, code.depth);
        }
    }

    /// Write the code-length header that lets a decoder rebuild this table.
    pub fn write_header(&self, writer: &mut BitWriter) {
        write_code_length_header(writer, self);
    }
}

/// Write the header describing `table`.
///
/// Picks the cheapest of the three VP8L forms: the empty code, the inline
/// one- or two-symbol code, or the full code-length-coded table.
pub fn write_code_length_header(writer: &mut BitWriter, table: &HuffmanTable) {
    let mut symbols = [0usize; 2];
    let mut count = 0;
    for code in table.codes().iter().filter(|c| c.depth > 0) {
        if count < 2 {
            symbols[count] = code.symbol as usize;
        }
        count += 1;
        if count > 2 {
            break;
        }
    }

    match count {
        0 => {
            writer.write_bits(1, 1);
            writer.write_bits(0, 3);
        }
        1 | 2 if symbols[..count].iter().all(|&s| s < NUM_LITERAL_CODES) => {
            writer.write_bits(1, 1);
            writer.write_bits(count as u64 - 1, 1);
            if symbols[0] <= 1 {
                writer.write_bits(0, 1);
                writer.write_bits(symbols[0] as u64, 1);
            } else {
                writer.write_bits(1, 1);
                writer.write_bits(symbols[0] as u64, 8);
            }
            if count > 1 {
                writer.write_bits(symbols[1] as u64, 8);
            }
        }
        _ => write_full_code(writer, table),
    }
}

/// Write a table through the secondary code-length code.
fn write_full_code(writer: &mut BitWriter, table: &HuffmanTable) {
    let mut histogram = [0u32; NUM_CODE_LENGTH_CODES];
    for code in table.codes() {
        histogram[code.depth as usize] += 1;
    }

    let mut count = 0;
    for (i, &length) in CODE_LENGTH_ORDER.iter().enumerate() {
        if histogram[length] > 0 {
            count = (i + 1).max(4);
        }
    }

    let lengths = HuffmanTable::from_histogram(&histogram, MAX_CODE_LENGTH_DEPTH);

    writer.write_bits(0, 1);
    writer.write_bits(count as u64 - 4, 4);
    for &length in &CODE_LENGTH_ORDER[..count] {
        writer.write_bits(lengths.depth(length) as u64, 3);
    }

    // Every symbol is coded, no max_symbol override.
    writer.write_bits(0, 1);

    for code in table.codes() {
        lengths.write_symbol(writer, code.depth as usize);
    }
}
