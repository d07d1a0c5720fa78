//! Benchmarks for loading and splitting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use kge_dataset::binding::{RawBinding, RawTriplet};
use kge_dataset::dataset::Dataset;
use kge_dataset::split;

fn synthetic_rows(n: usize) -> Vec<RawTriplet> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| {
            let s: u32 = rng.gen_range(0..5_000);
            let p: u32 = rng.gen_range(0..50);
            let o: u32 = rng.gen_range(0..5_000);
            RawTriplet::new(
                RawBinding::uri(format!("http://www.wikidata.org/entity/Q{s}")),
                RawBinding::uri(format!("http://www.wikidata.org/prop/direct/P{p}")),
                RawBinding::uri(format!("http://www.wikidata.org/entity/Q{o}")),
            )
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let rows = synthetic_rows(10_000);

    c.bench_function("load_bindings_10k", |bench| {
        bench.iter(|| {
            let mut dataset = Dataset::new();
            black_box(dataset.load_bindings(&rows, false))
        })
    });
}

fn bench_split(c: &mut Criterion) {
    let mut dataset = Dataset::new();
    dataset.load_bindings(&synthetic_rows(100_000), false);
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    c.bench_function("split_100k", |bench| {
        bench.iter(|| black_box(split::split(dataset.triplets(), 0.8, &mut rng).unwrap()))
    });
}

criterion_group!(benches, bench_load, bench_split);
criterion_main!(benches);
