//! Round-trip tests: encode with OxiWebP, decode with the `image` crate.

use image::{DynamicImage, ImageBuffer, Rgba as ImageRgba};
use oxiwebp_core::BitReader;
use oxiwebp_vp8l::lz77::tokenize;
use oxiwebp_vp8l::pixel::pixels_from_rgba;
use oxiwebp_vp8l::{EncoderOptions, Token, decode, encode_rgba, encode_to_vec, read_header};
use proptest::prelude::*;
use std::io::Cursor;

fn encode_bytes(width: u32, height: u32, rgba: &[u8], options: &EncoderOptions) -> Vec<u8> {
    let mut file = Vec::new();
    encode_rgba(&mut file, width, height, rgba, options).unwrap();
    file
}

fn decode_rgba(file: &[u8]) -> Vec<u8> {
    decode(Cursor::new(file)).unwrap().to_rgba8().into_raw()
}

fn assert_roundtrip(width: u32, height: u32, rgba: &[u8], options: &EncoderOptions) -> Vec<u8> {
    let file = encode_bytes(width, height, rgba, options);
    assert_eq!(decode_rgba(&file), rgba, "{width}x{height} with {options:?}");
    file
}

fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) * 7) as u8,
                255,
            ]);
        }
    }
    rgba
}

fn noise(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..width * height * 4)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn checkerboard(size: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let mut rgba = Vec::new();
    for y in 0..size {
        for x in 0..size {
            rgba.extend_from_slice(if (x + y) % 2 == 0 { &a } else { &b });
        }
    }
    rgba
}

/// Bit reader positioned just after the 32 VP8L header bits.
fn transform_bits(file: &[u8]) -> BitReader<Cursor<Vec<u8>>> {
    let mut reader = BitReader::new(Cursor::new(file[21..].to_vec()));
    reader.read_bits(32).unwrap();
    reader
}

#[test]
fn test_single_opaque_pixel() {
    let rgba = [255, 0, 0, 255];
    let file = assert_roundtrip(1, 1, &rgba, &EncoderOptions::default());

    let header = read_header(&file).unwrap();
    assert!(!header.alpha_is_used);
    assert_eq!(file.len(), 36);
    assert_eq!(header.chunk_size, 16);
    assert_eq!(header.riff_size, 28);

    // Same input, same bytes.
    assert_eq!(encode_bytes(1, 1, &rgba, &EncoderOptions::default()), file);
}

#[test]
fn test_two_color_checkerboard_uses_palette() {
    let rgba = checkerboard(16, [255, 255, 255, 255], [0, 0, 0, 255]);
    let file = assert_roundtrip(16, 16, &rgba, &EncoderOptions::default());

    let mut bits = transform_bits(&file);
    assert_eq!(bits.read_bits(1).unwrap(), 1, "transform present");
    assert_eq!(bits.read_bits(2).unwrap(), 3, "color indexing");
    assert_eq!(bits.read_bits(8).unwrap() + 1, 2, "palette size");
}

#[test]
fn test_transparent_pixel_sets_alpha_flag() {
    let mut rgba = gradient(8, 8);
    rgba[4 * 19 + 3] = 0;
    let file = assert_roundtrip(8, 8, &rgba, &EncoderOptions::default());
    assert!(read_header(&file).unwrap().alpha_is_used);
}

#[test]
fn test_horizontal_run_produces_backref() {
    let mut rgba = noise(32, 4, 7);
    for px in rgba[4 * 40..4 * 52].chunks_exact_mut(4) {
        px.copy_from_slice(&[10, 20, 30, 255]);
    }

    let tokens = tokenize(&pixels_from_rgba(&rgba), 32, 4);
    assert!(tokens.iter().any(Token::is_backref));

    assert_roundtrip(32, 4, &rgba, &EncoderOptions::default());
}

#[test]
fn test_many_colors_fall_back_to_predictor() {
    let rgba = noise(40, 30, 99);
    let file = assert_roundtrip(40, 30, &rgba, &EncoderOptions::default());

    let mut bits = transform_bits(&file);
    assert_eq!(bits.read_bits(1).unwrap(), 1);
    assert_eq!(bits.read_bits(2).unwrap(), 2, "subtract green comes first");
}

#[test]
fn test_option_variants_roundtrip() {
    let variants = [
        EncoderOptions::default().with_color_cache_bits(0),
        EncoderOptions::default().with_color_cache_bits(11),
        EncoderOptions::default().with_color_transform(true),
        EncoderOptions::default().with_palette(false),
        EncoderOptions::default()
            .with_palette(false)
            .with_predictor(false)
            .with_subtract_green(false),
        EncoderOptions::FAST,
    ];

    let images = [
        (23, 17, gradient(23, 17)),
        (19, 21, noise(19, 21, 3)),
        (16, 16, checkerboard(16, [1, 2, 3, 4], [200, 100, 50, 0])),
    ];

    for options in &variants {
        for (width, height, rgba) in &images {
            assert_roundtrip(*width, *height, rgba, options);
        }
    }
}

#[test]
fn test_palette_sizes_roundtrip() {
    // 1, 2, 4 and 16 color boundaries plus one past each.
    for colors in [1u32, 2, 3, 4, 5, 16, 17, 200, 256] {
        let (width, height) = (37, 9);
        let rgba: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let c = (i * 7 + i / 5) % colors;
                [(c * 13) as u8, (c * 29) as u8, (c * 3) as u8, 255 - c as u8]
            })
            .collect();
        assert_roundtrip(width, height, &rgba, &EncoderOptions::default());
    }
}

#[test]
fn test_thin_images() {
    for (width, height) in [(1, 64), (64, 1), (2, 2), (3, 1), (1, 3)] {
        assert_roundtrip(width, height, &noise(width, height, width + height), &EncoderOptions::default());
        assert_roundtrip(width, height, &gradient(width, height), &EncoderOptions::default());
    }
}

#[test]
fn test_long_runs() {
    // Runs longer than one reference can copy.
    let mut rgba = vec![0u8; 300 * 40 * 4];
    for (i, px) in rgba.chunks_exact_mut(4).enumerate() {
        px.copy_from_slice(&[(i / 5000) as u8, 0, 0, 255]);
    }
    assert_roundtrip(300, 40, &rgba, &EncoderOptions::default().with_palette(false));
    assert_roundtrip(300, 40, &rgba, &EncoderOptions::default());
}

#[test]
fn test_largest_decodable_side() {
    let side = 16383;
    let rgba: Vec<u8> = (0..side).flat_map(|i| [(i % 7) as u8, (i % 5) as u8, 9, 255]).collect();
    let file = assert_roundtrip(1, side, &rgba, &EncoderOptions::default());
    assert_eq!(read_header(&file).unwrap().height, side);
    assert_roundtrip(side, 1, &rgba, &EncoderOptions::FAST);
}

#[test]
fn test_dynamic_image_roundtrip() {
    let buffer = ImageBuffer::from_fn(20, 10, |x, y| {
        ImageRgba([(x * 12) as u8, (y * 25) as u8, 0, if x == y { 0 } else { 255 }])
    });
    let image = DynamicImage::ImageRgba8(buffer);
    let file = encode_to_vec(&image, &EncoderOptions::default()).unwrap();
    let decoded = decode(Cursor::new(file)).unwrap();
    assert_eq!(decoded.to_rgba8(), image.to_rgba8());
}

#[test]
fn test_sizes_are_consistent() {
    let file = encode_bytes(33, 7, &noise(33, 7, 5), &EncoderOptions::default());
    let header = read_header(&file).unwrap();
    assert_eq!(header.chunk_size as usize, file.len() - 20);
    assert_eq!(header.riff_size, header.chunk_size + 12);
    assert_eq!(file.len() % 2, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_roundtrip_random(
        width in 1u32..24,
        height in 1u32..24,
        seed in any::<u32>(),
        palette in 1u32..300,
        cache_bits in 0u8..=11,
    ) {
        // Draw pixels from a limited set so both palette and predictor
        // paths get exercised.
        let raw = noise(width, height, seed);
        let rgba: Vec<u8> = raw
            .chunks_exact(4)
            .flat_map(|px| {
                let c = u32::from_le_bytes([px[0], px[1], px[2], px[3]]) % palette;
                [(c * 37) as u8, (c >> 2) as u8, (c * 11) as u8, if c % 5 == 0 { 128 } else { 255 }]
            })
            .collect();

        let options = EncoderOptions::default().with_color_cache_bits(cache_bits);
        let file = encode_bytes(width, height, &rgba, &options);
        prop_assert_eq!(decode_rgba(&file), rgba);
    }
}
