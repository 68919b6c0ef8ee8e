//! Benchmarks for the Augmentor pipeline.
//!
//! Run with: cargo bench -p augmentor-core

use augmentor_core::config::{ArchiveConfig, Config};
use augmentor_core::{ArchivePackager, BatchCount, BatchGenerator, TransformEngine, TransformSpec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{ImageFormat, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn benchmark_engine_basic(c: &mut Criterion) {
    let engine = TransformEngine::new(TransformSpec::basic()).unwrap();
    let img = gradient(512, 384);
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("engine_apply_basic_512", |b| {
        b.iter(|| {
            let _ = engine.apply(black_box(&img), &mut rng);
        })
    });
}

fn benchmark_engine_extended(c: &mut Criterion) {
    let engine = TransformEngine::new(TransformSpec::extended()).unwrap();
    let img = gradient(512, 384);
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("engine_apply_extended_512", |b| {
        b.iter(|| {
            let _ = engine.apply(black_box(&img), &mut rng);
        })
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let generator = BatchGenerator::new(&Config::default(), TransformSpec::default()).unwrap();
    let bytes = jpeg_bytes(1024, 768);
    let count = BatchCount::new(10).unwrap();

    c.bench_function("generate_10_from_1024x768", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let _ = generator.generate(black_box(&bytes), count, &mut rng);
        })
    });
}

fn benchmark_pack(c: &mut Criterion) {
    let generator = BatchGenerator::new(&Config::default(), TransformSpec::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let batch = generator
        .generate(&jpeg_bytes(512, 384), BatchCount::new(10).unwrap(), &mut rng)
        .unwrap();
    let packager = ArchivePackager::new(ArchiveConfig::default());

    c.bench_function("pack_10_jpeg_q75", |b| {
        b.iter(|| {
            let _ = packager.pack(black_box(batch.images()));
        })
    });
}

criterion_group!(
    benches,
    benchmark_engine_basic,
    benchmark_engine_extended,
    benchmark_generate,
    benchmark_pack,
);
criterion_main!(benches);
