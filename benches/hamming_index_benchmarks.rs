use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hamming_index::{HammingIndex, HammingIndexConfig};

fn fingerprint(seed: u64) -> Vec<u64> {
    let mut x = seed ^ 0x9E3779B97F4A7C15;
    (0..4)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        })
        .collect()
}

fn populated_index(use_multiindex: bool, n: u64) -> HammingIndex {
    let mut idx = HammingIndex::new(HammingIndexConfig {
        hash_size: 256,
        max_distance: 20,
        use_multiindex,
    })
    .unwrap();
    for seed in 0..n {
        idx.add(&fingerprint(seed));
    }
    idx
}

/// Benchmark: Add/remove churn
fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming_index_add_remove");

    group.bench_function("add_multiindex", |b| {
        let mut idx = populated_index(true, 1000);
        let mut counter = 10_000u64;
        b.iter(|| {
            idx.add(black_box(&fingerprint(counter)));
            counter += 1;
        });
    });

    group.bench_function("add_brute_force", |b| {
        let mut idx = populated_index(false, 1000);
        let mut counter = 10_000u64;
        b.iter(|| {
            idx.add(black_box(&fingerprint(counter)));
            counter += 1;
        });
    });

    group.finish();
}

/// Benchmark: shortest_distance query, brute-force vs multi-index, scaling
/// with stored set size.
fn bench_shortest_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming_index_shortest_distance");

    for size in [100u64, 1_000, 10_000] {
        let brute = populated_index(false, size);
        group.bench_with_input(BenchmarkId::new("brute_force", size), &size, |b, _| {
            let query = fingerprint(999_999);
            b.iter(|| black_box(brute.shortest_distance(black_box(&query))));
        });

        let multi = populated_index(true, size);
        group.bench_with_input(BenchmarkId::new("multi_index", size), &size, |b, _| {
            let query = fingerprint(999_999);
            b.iter(|| black_box(multi.shortest_distance(black_box(&query))));
        });
    }

    group.finish();
}

/// Benchmark: deep-copying an index via `dup`, the operation the
/// read-copy-update publish cycle pays on every write.
fn bench_dup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming_index_dup");

    for size in [100u64, 1_000, 10_000] {
        let idx = populated_index(true, size);
        group.bench_with_input(BenchmarkId::new("dup", size), &size, |b, _| {
            b.iter(|| black_box(idx.dup()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_remove,
    bench_shortest_distance,
    bench_dup,
);
criterion_main!(benches);
