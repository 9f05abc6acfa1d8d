//! Benchmarks for the lossless encoder.
//!
//! Measures throughput of:
//! - Full encodes of flat, gradient and noisy images with both presets
//! - Tokenization on its own
//! - Huffman code construction for a skewed histogram

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxiwebp_vp8l::huffman::build_codes;
use oxiwebp_vp8l::lz77::tokenize;
use oxiwebp_vp8l::pixel::pixels_from_rgba;
use oxiwebp_vp8l::{EncoderOptions, Vp8lEncoder};
use std::hint::black_box;

const SIZE: u32 = 256;

fn generate_flat() -> Vec<u8> {
    [40u8, 90, 200, 255].repeat((SIZE * SIZE) as usize)
}

fn generate_gradient() -> Vec<u8> {
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            rgba.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    rgba
}

fn generate_noise() -> Vec<u8> {
    let mut seed: u32 = 0x9E3779B9;
    (0..SIZE * SIZE * 4)
        .map(|_| {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            (seed >> 16) as u8
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.sample_size(20);
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));

    let images = [
        ("flat", generate_flat()),
        ("gradient", generate_gradient()),
        ("noise", generate_noise()),
    ];
    let presets = [
        ("default", EncoderOptions::DEFAULT),
        ("fast", EncoderOptions::FAST),
    ];

    for (image_name, rgba) in &images {
        for (preset_name, options) in &presets {
            let encoder = Vp8lEncoder::new(*options);
            group.bench_with_input(
                BenchmarkId::new(*preset_name, image_name),
                rgba,
                |b, rgba| {
                    b.iter(|| black_box(encoder.encode_rgba(SIZE, SIZE, black_box(rgba)).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let pixels = pixels_from_rgba(&generate_gradient());
    group.throughput(Throughput::Elements(pixels.len() as u64));

    for cache_bits in [0u8, 4, 10] {
        group.bench_with_input(
            BenchmarkId::from_parameter(cache_bits),
            &pixels,
            |b, pixels| {
                b.iter(|| black_box(tokenize(black_box(pixels), SIZE as usize, cache_bits)));
            },
        );
    }

    group.finish();
}

fn bench_huffman(c: &mut Criterion) {
    let histogram: Vec<u32> = (0..296u32).map(|i| 1 + (i * i) % 977).collect();
    c.bench_function("build_codes/296", |b| {
        b.iter(|| black_box(build_codes(black_box(&histogram), 15)));
    });
}

criterion_group!(benches, bench_encode, bench_tokenize, bench_huffman);
criterion_main!(benches);
