//! Benchmarks for the Scaler resize pipeline.
//!
//! Run with: cargo bench -p scaler-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat};
use scaler_core::config::{ArchiveCompression, ResizeFilter};
use scaler_core::pipeline::{encode, resize};
use scaler_core::{Blob, Config, HandleRegistry, ImageTransformer, InputImage, MimeType};
use std::io::Cursor;

fn source_png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn benchmark_resample(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1920, 1080);

    for filter in [ResizeFilter::Triangle, ResizeFilter::Lanczos3] {
        c.bench_function(&format!("resample_1080p_to_1024_{filter:?}"), |b| {
            b.iter(|| resize::resample(black_box(&img), 1024, 576, filter))
        });
    }
}

fn benchmark_encode(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1024, 768);

    c.bench_function("encode_jpeg_q90", |b| {
        b.iter(|| encode::encode(black_box(&img), MimeType::Jpeg, 0.9))
    });
    c.bench_function("encode_png", |b| {
        b.iter(|| encode::encode(black_box(&img), MimeType::Png, 0.9))
    });
}

fn benchmark_transform(c: &mut Criterion) {
    let transformer = ImageTransformer::new(&Config::default(), HandleRegistry::new());
    let data = source_png(2560, 1440);
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("transform_1440p_png_to_2048", |b| {
        b.iter(|| {
            let input = InputImage::new("bench.png", MimeType::Png, data.clone());
            let _ = rt.block_on(transformer.resize(black_box(input), 2048, 0.9));
        })
    });
}

fn benchmark_archive(c: &mut Criterion) {
    let entries: Vec<(String, Blob)> = (0..16)
        .map(|i| (format!("img{i}.png"), Blob::from(vec![i as u8; 256 * 1024])))
        .collect();

    c.bench_function("archive_16x256k_deflated", |b| {
        b.iter(|| {
            scaler_core::package::build_archive(black_box(entries.clone()), ArchiveCompression::Deflated)
        })
    });
}

criterion_group!(
    benches,
    benchmark_resample,
    benchmark_encode,
    benchmark_transform,
    benchmark_archive,
);
criterion_main!(benches);
