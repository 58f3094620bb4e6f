//! Cast benchmarks for strided-cast
//!
//! Compares the zero-copy casts against materializing copies, and element
//! reads through a native view against the same reads through the foreign
//! view it was cast to.
//!
//! Run with: cargo bench --bench cast_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::time::Duration;
use strided_cast::{from_faer, to_faer, to_faer_mat, to_ndarray, to_ndarray_owned, StridedArrayView};

fn random_data(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| StandardNormal.sample(&mut rng)).collect()
}

/// Zero-copy cast vs copy into an owned matrix, for a transposed view
fn bench_cast_vs_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast_vs_copy");
    group.sample_size(20);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [16, 128, 512] {
        group.throughput(Throughput::Elements((size * size) as u64));

        let data = random_data(size * size);
        let view = StridedArrayView::<f64, 2>::row_major(&data, [size, size])
            .unwrap()
            .t();

        group.bench_with_input(BenchmarkId::new("faer_cast", size), &size, |bench, _| {
            bench.iter(|| from_faer(to_faer(black_box(view))))
        });

        group.bench_with_input(BenchmarkId::new("faer_copy", size), &size, |bench, _| {
            bench.iter(|| to_faer_mat(black_box(&view)))
        });

        group.bench_with_input(BenchmarkId::new("ndarray_cast", size), &size, |bench, _| {
            bench.iter(|| to_ndarray(black_box(view.reversed(0))))
        });

        group.bench_with_input(BenchmarkId::new("ndarray_copy", size), &size, |bench, _| {
            bench.iter(|| to_ndarray_owned(black_box(view.reversed(0))))
        });
    }
    group.finish();
}

/// Summing every element through the native view and through the foreign views
fn bench_element_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_reads");
    group.sample_size(20);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [64, 256] {
        group.throughput(Throughput::Elements((size * size) as u64));

        let data = random_data(size * size);
        let view = StridedArrayView::<f64, 2>::row_major(&data, [size, size])
            .unwrap()
            .reversed(1);

        group.bench_with_input(BenchmarkId::new("native", size), &size, |bench, _| {
            bench.iter(|| view.iter().sum::<f64>())
        });

        let mat = to_faer(view);
        group.bench_with_input(BenchmarkId::new("faer", size), &size, |bench, _| {
            bench.iter(|| {
                let mut sum = 0.0;
                for i in 0..mat.nrows() {
                    for j in 0..mat.ncols() {
                        sum += mat[(i, j)];
                    }
                }
                sum
            })
        });

        let array = to_ndarray(view);
        group.bench_with_input(BenchmarkId::new("ndarray", size), &size, |bench, _| {
            bench.iter(|| array.sum())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cast_vs_copy, bench_element_reads);
criterion_main!(benches);
