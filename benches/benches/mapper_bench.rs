//! # Range Mapper Benchmarks
//!
//! Measures the logical → physical mapping across bands, signs and extremes.
//!
//! Run: `cargo bench --bench mapper_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use piservo_core::{map, RangeConfig, RangeMapper};

/// Benchmark single mappings in even and odd bands
fn bench_map_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_single");
    let range = RangeConfig::new(10, 90).unwrap();

    for logical in [0i64, 50, 150, -150, i64::MIN, i64::MAX] {
        group.bench_with_input(BenchmarkId::from_parameter(logical), &logical, |b, &logical| {
            b.iter(|| black_box(map(black_box(logical), range)))
        });
    }

    group.finish();
}

/// Benchmark a long relative-move accumulator
fn bench_map_accumulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_accumulator");
    let mapper = RangeMapper::new(RangeConfig::new(500, 2500).unwrap());

    for steps in [100usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut logical = 50i64;
                let mut sum = 0.0;
                for _ in 0..steps {
                    logical += 7;
                    sum += mapper.map(logical).value();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_map_single, bench_map_accumulator);
criterion_main!(benches);
