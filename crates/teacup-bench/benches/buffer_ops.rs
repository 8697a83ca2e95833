//! Criterion micro-benchmarks for buffer allocation and element-wise ops.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use teacup_bench::{ramp, triangle_row_lengths};
use teacup_core::ops::{square_in_place, square_into, sum};
use teacup_core::{AllocConfig, DataRecord, FlatBuffer, JaggedBuffer};

/// Benchmark: allocate and release a 1M-element flat i32 buffer.
fn bench_flat_alloc_1m(c: &mut Criterion) {
    let config = AllocConfig::default();
    c.bench_function("flat_alloc_1m", |b| {
        b.iter(|| {
            let buf = FlatBuffer::<i32>::zeroed(black_box(1 << 20), &config).unwrap();
            black_box(buf.release());
        });
    });
}

/// Benchmark: allocate and release a 1K-row triangular jagged buffer (~500K elements).
fn bench_jagged_alloc_1k_rows(c: &mut Criterion) {
    let config = AllocConfig::default();
    let lens = triangle_row_lengths(1000);
    c.bench_function("jagged_alloc_1k_rows", |b| {
        b.iter(|| {
            let m = JaggedBuffer::<i32>::zeroed(lens.len(), black_box(&lens), &config).unwrap();
            black_box(m.release());
        });
    });
}

/// Benchmark: sum 100K f64 values.
fn bench_sum_100k(c: &mut Criterion) {
    let input = ramp(100_000);
    c.bench_function("sum_100k", |b| {
        b.iter(|| black_box(sum(black_box(input.as_slice()))));
    });
}

/// Benchmark: square 100K f64 values into a separate buffer, then in place.
fn bench_square_100k(c: &mut Criterion) {
    let input = ramp(100_000);
    let mut output = FlatBuffer::<f64>::zeroed(input.len(), &AllocConfig::default()).unwrap();
    c.bench_function("square_into_100k", |b| {
        b.iter(|| {
            square_into(black_box(input.as_slice()), output.as_mut_slice()).unwrap();
            black_box(output[0]);
        });
    });

    let mut values = ramp(100_000);
    c.bench_function("square_in_place_100k", |b| {
        b.iter(|| {
            square_in_place(values.as_mut_slice());
            black_box(values[1]);
        });
    });
}

/// Benchmark: record lifecycle with an attached 64x64 matrix.
fn bench_record_lifecycle(c: &mut Criterion) {
    let config = AllocConfig::default();
    let lens = vec![64usize; 64];
    c.bench_function("record_lifecycle_64x64", |b| {
        b.iter(|| {
            let mut record = DataRecord::new(black_box(64));
            let m = JaggedBuffer::zeroed(lens.len(), &lens, &config).unwrap();
            record.attach_matrix(m).unwrap();
            black_box(record.release());
        });
    });
}

criterion_group!(
    benches,
    bench_flat_alloc_1m,
    bench_jagged_alloc_1k_rows,
    bench_sum_100k,
    bench_square_100k,
    bench_record_lifecycle,
);
criterion_main!(benches);
