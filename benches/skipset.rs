//! Benchmarks for this crate's [`SkipSet`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::{Rng, SeedableRng, rngs::StdRng};
use skipset::SkipSet;

/// Benchmarking sizes.
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

/// Range the benchmark keys are drawn from, well clear of the sentinels.
const KEYS: std::ops::Range<i32> = -1_000_000..1_000_000;

/// A seeded set of `size` random keys.
fn filled(rng: &mut StdRng, size: usize) -> SkipSet {
    let mut set = SkipSet::with_seed(0x1234_abcd);
    for _ in 0..size {
        black_box(set.insert(rng.random_range(KEYS)).ok());
    }
    set
}

/// Benchmarking insertion.
#[inline]
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut set = filled(&mut rng, size);

            b.iter(|| {
                black_box(set.insert(rng.random_range(KEYS)).ok());
            });
        });
    }
}

/// Benchmarking membership tests.
#[inline]
pub fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Find");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let set = filled(&mut rng, size);
            let probes: Vec<i32> = std::iter::repeat_with(|| rng.random_range(KEYS))
                .take(10)
                .collect();

            b.iter(|| {
                for &k in &probes {
                    black_box(set.find(k).ok());
                }
            });
        });
    }
}

/// Benchmarking a delete followed by re-insertion of the same key, so that
/// the size of the set stays constant.
#[inline]
pub fn delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipSet Delete");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut set = filled(&mut rng, size);
            let present: Vec<i32> = set.iter().collect();

            b.iter(|| {
                let k = present[rng.random_range(0..present.len())];
                black_box(set.delete(k).ok());
                black_box(set.insert(k).ok());
            });
        });
    }
}

/// Benchmarking iteration.
#[inline]
pub fn iter(c: &mut Criterion) {
    c.bench_function("SkipSet Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let set = filled(&mut rng, 100_000);

        b.iter(|| {
            for k in &set {
                black_box(k);
            }
        });
    });
}
