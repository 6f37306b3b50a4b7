//! Stack blur throughput across radii.
//! Run with: cargo bench --bench stack_blur

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;
use stackblur_rust::{stack_blur, stack_blur_area, stack_blur_copy, Area};

const SIZE: usize = 512;

fn test_image(channels: usize) -> Array3<u8> {
    Array3::from_shape_fn((SIZE, SIZE, channels), |(y, x, c)| {
        ((x * 7 + y * 13 + c * 31) % 256) as u8
    })
}

/// Per-pixel cost should stay flat as the radius grows.
fn benchmark_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_blur_rgba8");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));

    let image = test_image(4);
    for radius in [1u32, 8, 64] {
        group.bench_with_input(BenchmarkId::new("in_place", radius), &radius, |b, &radius| {
            b.iter_batched_ref(
                || image.clone(),
                |img| stack_blur(img, black_box(radius)),
                criterion::BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("copy", radius), &radius, |b, &radius| {
            b.iter(|| black_box(stack_blur_copy(&image, black_box(radius))))
        });
    }

    group.finish();
}

fn benchmark_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_blur_channels");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));

    for channels in [1usize, 3, 4] {
        let image = test_image(channels);
        group.bench_with_input(BenchmarkId::from_parameter(channels), &image, |b, image| {
            b.iter(|| black_box(stack_blur_copy(image, 8)))
        });
    }

    group.finish();
}

fn benchmark_area(c: &mut Criterion) {
    let image = test_image(4);
    c.bench_function("stack_blur_area_quarter", |b| {
        b.iter_batched_ref(
            || image.clone(),
            |img| stack_blur_area(img, Area::new(128, 128, 256, 256), black_box(16)),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, benchmark_radius, benchmark_channels, benchmark_area);
criterion_main!(benches);
