//! Ring lookup benchmarks using Criterion.

use corelib::ring::RingBuilder;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_lookup");

    for peers in [3usize, 16, 64] {
        let ring = RingBuilder::new()
            .add_peers((0..peers).map(|i| format!("http://node{}:8000", i)))
            .build()
            .expect("valid ring");
        let keys: Vec<String> = (0..1024).map(|i| format!("key-{}", i)).collect();

        group.bench_with_input(BenchmarkId::new("get", peers), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(ring.get(black_box(key)));
                }
            });
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let peers: Vec<String> = (0..16).map(|i| format!("http://node{}:8000", i)).collect();

    c.bench_function("ring_rebuild_16_peers", |b| {
        b.iter(|| {
            RingBuilder::new()
                .add_peers(black_box(&peers).iter().cloned())
                .build()
        });
    });
}

criterion_group!(benches, bench_lookup, bench_rebuild);
criterion_main!(benches);
