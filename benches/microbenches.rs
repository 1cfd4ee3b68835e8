//! Criterion microbenches for brickmark's per-photograph work.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - capture JSON parsing and resolution (from_json_str, from_json_slice)
//! - corner merging (combine_nearby)
//! - crop derivation for both strategies (derive_crop)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use brickmark::capture::{from_json_slice, from_json_str};
use brickmark::crop::{derive_crop, CropParams, CropStrategy};
use brickmark::geom::{combine_nearby, Region};

// Include test fixtures at compile time (no file I/O during benchmark)
const PIECES_FIXTURE: &str = include_str!("../tests/fixtures/capture_pieces.json");
const MARKERS_FIXTURE: &str = include_str!("../tests/fixtures/capture_markers_only.json");

/// A box seen on three faces at each of its four corners.
fn corner_observations() -> Vec<Region> {
    let mut regions = Vec::new();
    for (cx, cy) in [(60.0, 60.0), (3900.0, 60.0), (60.0, 2900.0), (3900.0, 2900.0)] {
        for (dx, dy) in [(0.0, 0.0), (12.0, 4.0), (5.0, 14.0)] {
            regions.push(Region::from_upper_left(cx + dx, cy + dy, 50.0, 50.0));
        }
    }
    regions
}

/// Benchmark capture parsing from string and byte slice.
fn bench_capture_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_parse");
    group.throughput(Throughput::Bytes(PIECES_FIXTURE.len() as u64));

    group.bench_function("from_json_str", |b| {
        b.iter(|| {
            let capture = from_json_str(black_box(PIECES_FIXTURE)).unwrap();
            black_box(capture)
        })
    });

    let bytes = PIECES_FIXTURE.as_bytes();
    group.bench_function("from_json_slice_resolve", |b| {
        b.iter(|| {
            let capture = from_json_slice(black_box(bytes)).unwrap().resolve(None).unwrap();
            black_box(capture)
        })
    });

    group.finish();
}

/// Benchmark corner merging.
fn bench_combine_nearby(c: &mut Criterion) {
    let regions = corner_observations();

    let mut group = c.benchmark_group("combine_nearby");
    group.throughput(Throughput::Elements(regions.len() as u64));

    group.bench_function("twelve_observations", |b| {
        b.iter(|| {
            let merged = combine_nearby(black_box(&regions), black_box(400.0));
            black_box(merged)
        })
    });

    group.finish();
}

/// Benchmark crop derivation.
///
/// Captures are parsed and resolved once, outside the timed region.
fn bench_derive_crop(c: &mut Criterion) {
    let params = CropParams::default();
    let pieces = from_json_str(PIECES_FIXTURE).unwrap().resolve(None).unwrap();
    let markers = from_json_str(MARKERS_FIXTURE).unwrap().resolve(None).unwrap();

    let mut group = c.benchmark_group("derive_crop");

    group.bench_function("pieces", |b| {
        let regions = pieces.piece_regions();
        b.iter(|| {
            let plan = derive_crop(
                black_box(&regions),
                black_box(&pieces.markers),
                pieces.frame,
                &params,
                CropStrategy::Pieces,
            )
            .unwrap();
            black_box(plan)
        })
    });

    group.bench_function("markers", |b| {
        b.iter(|| {
            let plan = derive_crop(
                &[],
                black_box(&markers.markers),
                markers.frame,
                &params,
                CropStrategy::Markers,
            )
            .unwrap();
            black_box(plan)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_capture_parse,
    bench_combine_nearby,
    bench_derive_crop,
);
criterion_main!(benches);
