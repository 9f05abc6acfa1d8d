//! Predictor transform.
//!
//! Every 16x16 tile picks one of the 14 VP8L spatial predictors. The tile is
//! then replaced by its residuals (pixel minus prediction, per channel,
//! modulo 256), which a decoder adds back in scan order.
//!
//! Predictors are chosen greedily in tile order. A candidate is scored by
//! the spread of the per-channel residual histograms it would produce when
//! added to the residuals of the tiles already decided:
//!
//! ```text
//! score = Σ_channel (1 - Σ count² / (Σ count)²)
//! ```
//!
//! Lower is better; ties keep the lowest predictor index.

use crate::pixel::Rgba;
use crate::transform::{BlockImage, TILE_BITS};
use log::trace;

/// Number of predictor modes.
pub const NUM_PREDICTORS: usize = 14;

type ChannelHistograms = [[u32; 256]; 4];

/// Neighbours a predictor may look at.
#[derive(Debug, Clone, Copy)]
struct Neighbours {
    left: Rgba,
    top: Rgba,
    top_left: Rgba,
    top_right: Rgba,
}

#[inline]
fn clamp_byte(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

fn select(n: &Neighbours) -> Rgba {
    let (l, t, tl) = (n.left.channels(), n.top.channels(), n.top_left.channels());
    let mut to_left = 0i32;
    let mut to_top = 0i32;
    for c in 0..4 {
        // Distance of the gradient estimate L + T - TL to L and to T.
        to_left += (t[c] as i32 - tl[c] as i32).abs();
        to_top += (l[c] as i32 - tl[c] as i32).abs();
    }
    if to_left < to_top { n.left } else { n.top }
}

fn clamped_gradient(n: &Neighbours) -> Rgba {
    let (l, t, tl) = (n.left.channels(), n.top.channels(), n.top_left.channels());
    let ch = |c: usize| clamp_byte(l[c] as i32 + t[c] as i32 - tl[c] as i32);
    Rgba::new(ch(0), ch(1), ch(2), ch(3))
}

fn clamped_half_gradient(n: &Neighbours) -> Rgba {
    let a = n.left.average2(n.top).channels();
    let tl = n.top_left.channels();
    let ch = |c: usize| clamp_byte(a[c] as i32 + (a[c] as i32 - tl[c] as i32) / 2);
    Rgba::new(ch(0), ch(1), ch(2), ch(3))
}

fn apply_mode(mode: usize, n: &Neighbours) -> Rgba {
    match mode {
        0 => Rgba::OPAQUE_BLACK,
        1 => n.left,
        2 => n.top,
        3 => n.top_right,
        4 => n.top_left,
        5 => n.left.average2(n.top_right).average2(n.top),
        6 => n.left.average2(n.top_left),
        7 => n.left.average2(n.top),
        8 => n.top_left.average2(n.top),
        9 => n.top.average2(n.top_right),
        10 => n
            .left
            .average2(n.top_left)
            .average2(n.top.average2(n.top_right)),
        11 => select(n),
        12 => clamped_gradient(n),
        13 => clamped_half_gradient(n),
        _ => unreachable!("predictor mode {mode} out of range"),
    }
}

/// Prediction for pixel `(x, y)` under `mode`.
///
/// The first pixel predicts opaque black, the rest of the top row predicts
/// its left neighbour and the left column predicts its top neighbour,
/// whatever the mode. On the last column the top-right neighbour is the
/// first pixel of the current row.
pub fn predict(pixels: &[Rgba], width: usize, x: usize, y: usize, mode: usize) -> Rgba {
    match (x, y) {
        (0, 0) => return Rgba::OPAQUE_BLACK,
        (0, _) => return pixels[(y - 1) * width],
        (_, 0) => return pixels[x - 1],
        _ => {}
    }

    let above = (y - 1) * width + x;
    let n = Neighbours {
        left: pixels[y * width + x - 1],
        top: pixels[above],
        top_left: pixels[above - 1],
        top_right: pixels[above + 1],
    };
    apply_mode(mode, &n)
}

fn spread_score(histograms: &ChannelHistograms) -> f64 {
    histograms
        .iter()
        .filter_map(|histogram| {
            let (sum, squares) = histogram.iter().fold((0u64, 0u64), |(s, q), &c| {
                (s + c as u64, q + c as u64 * c as u64)
            });
            (sum > 0).then(|| 1.0 - squares as f64 / (sum as f64 * sum as f64))
        })
        .sum()
}

#[inline]
fn count_residual(histograms: &mut ChannelHistograms, residual: Rgba) {
    for (histogram, value) in histograms.iter_mut().zip(residual.channels()) {
        histogram[value as usize] += 1;
    }
}

/// Replace `pixels` by predictor residuals and return the per-tile modes.
///
/// Modes are stored in the green channel of the block image.
pub fn apply_predictor_transform(pixels: &mut [Rgba], width: usize, height: usize) -> BlockImage {
    let mut block = BlockImage::new(width, height, TILE_BITS, Rgba::OPAQUE_BLACK);
    let tile = 1usize << TILE_BITS;
    let mut residuals = vec![Rgba::default(); pixels.len()];
    let mut accumulated: ChannelHistograms = [[0; 256]; 4];

    for by in 0..block.height {
        for bx in 0..block.width {
            let xs = bx * tile..((bx + 1) * tile).min(width);
            let ys = by * tile..((by + 1) * tile).min(height);

            let mut best_mode = 0;
            let mut best_score = f64::INFINITY;
            for mode in 0..NUM_PREDICTORS {
                let mut candidate = accumulated;
                for y in ys.clone() {
                    for x in xs.clone() {
                        let predicted = predict(pixels, width, x, y, mode);
                        count_residual(&mut candidate, pixels[y * width + x].wrapping_sub(predicted));
                    }
                }
                let score = spread_score(&candidate);
                if score < best_score {
                    best_score = score;
                    best_mode = mode;
                }
            }

            for y in ys.clone() {
                for x in xs.clone() {
                    let predicted = predict(pixels, width, x, y, best_mode);
                    let residual = pixels[y * width + x].wrapping_sub(predicted);
                    residuals[y * width + x] = residual;
                    count_residual(&mut accumulated, residual);
                }
            }

            trace!("predictor tile ({bx}, {by}): mode {best_mode}, score {best_score:.4}");
            block.pixels[by * block.width + bx] = Rgba::new(0, best_mode as u8, 0, 255);
        }
    }

    pixels.copy_from_slice(&residuals);
    block
}

/// Rebuild pixels from residuals, in scan order like a decoder.
pub fn invert_predictor_transform(
    residuals: &[Rgba],
    width: usize,
    height: usize,
    block: &BlockImage,
) -> Vec<Rgba> {
    let mut pixels = vec![Rgba::default(); residuals.len()];
    for y in 0..height {
        for x in 0..width {
            let tile = (y >> block.tile_bits) * block.width + (x >> block.tile_bits);
            let mode = block.pixels[tile].g as usize;
            let predicted = predict(&pixels, width, x, y, mode);
            pixels[y * width + x] = residuals[y * width + x].wrapping_add(predicted);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(width: usize, height: usize) -> Vec<Rgba> {
        let mut seed = 0x2545f491u32;
        (0..width * height)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let [a, b, c, d] = seed.to_le_bytes();
                Rgba::new(a, b, c, d)
            })
            .collect()
    }

    #[test]
    fn test_border_rules() {
        let pixels = noise(4, 3);
        for mode in 0..NUM_PREDICTORS {
            assert_eq!(predict(&pixels, 4, 0, 0, mode), Rgba::OPAQUE_BLACK);
            assert_eq!(predict(&pixels, 4, 2, 0, mode), pixels[1]);
            assert_eq!(predict(&pixels, 4, 0, 2, mode), pixels[4]);
        }
    }

    #[test]
    fn test_top_right_wraps_to_row_start() {
        let pixels = noise(4, 3);
        // Last column of row 1: TR is pixel (0, 1).
        assert_eq!(predict(&pixels, 4, 3, 1, 3), pixels[4]);
    }

    #[test]
    fn test_simple_modes() {
        let l = Rgba::new(10, 20, 30, 40);
        let t = Rgba::new(50, 60, 70, 80);
        let tl = Rgba::new(0, 0, 0, 0);
        let tr = Rgba::new(100, 100, 100, 100);
        let n = Neighbours {
            left: l,
            top: t,
            top_left: tl,
            top_right: tr,
        };
        assert_eq!(apply_mode(1, &n), l);
        assert_eq!(apply_mode(2, &n), t);
        assert_eq!(apply_mode(7, &n), Rgba::new(30, 40, 50, 60));
        assert_eq!(apply_mode(12, &n), Rgba::new(60, 80, 100, 120));
        // |T - TL| = 260 > |L - TL| = 100, so T is closer to the gradient.
        assert_eq!(apply_mode(11, &n), t);
    }

    #[test]
    fn test_clamped_half_gradient_truncates() {
        let n = Neighbours {
            left: Rgba::new(0, 255, 10, 9),
            top: Rgba::new(0, 255, 10, 9),
            top_left: Rgba::new(3, 0, 13, 9),
            top_right: Rgba::default(),
        };
        // a + (a - tl) / 2 with truncation toward zero: 0 + (-3 / 2) = -1 -> 0,
        // 255 + 127 -> 255, 10 + (-3 / 2) = 9, 9 + 0 = 9.
        assert_eq!(apply_mode(13, &n), Rgba::new(0, 255, 9, 9));
    }

    #[test]
    fn test_flat_image_prefers_low_modes() {
        let mut pixels = vec![Rgba::new(7, 7, 7, 255); 16 * 16];
        let block = apply_predictor_transform(&mut pixels, 16, 16);
        // Mode 1 (left) gives all-zero residuals except the first pixel.
        assert_eq!(block.pixels[0].g, 1);
        assert_eq!(pixels[0], Rgba::new(7, 7, 7, 0));
        assert!(pixels[1..].iter().all(|&p| p == Rgba::default()));
    }

    #[test]
    fn test_predictor_roundtrip() {
        for (w, h) in [(1, 1), (1, 40), (40, 1), (33, 17), (16, 16)] {
            let original = noise(w, h);
            let mut pixels = original.clone();
            let block = apply_predictor_transform(&mut pixels, w, h);
            assert_eq!((block.width, block.height), ((w + 15) / 16, (h + 15) / 16));
            assert!(block.pixels.iter().all(|p| (p.g as usize) < NUM_PREDICTORS && p.a == 255));
            assert_eq!(invert_predictor_transform(&pixels, w, h, &block), original);
        }
    }
}
