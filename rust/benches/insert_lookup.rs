use bplus_index::{recommended_degree, BPlusTree};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const SIZE: usize = 10_000;

fn random_keys(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count).map(|_| rng.gen_range(0..(count as u64 * 4))).collect()
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let keys = random_keys(SIZE);

    for degree in [3, 8, 32] {
        group.bench_with_input(BenchmarkId::new("our_tree", degree), &degree, |b, &degree| {
            b.iter(|| {
                let mut tree = BPlusTree::new(degree);
                for &key in &keys {
                    tree.insert(key, key);
                }
                black_box(tree);
            })
        });
    }

    group.bench_function("std_tree", |b| {
        b.iter(|| {
            let mut tree = BTreeMap::new();
            for &key in &keys {
                tree.insert(key, key);
            }
            black_box(tree);
        })
    });

    group.finish();
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let keys = random_keys(SIZE);
    let probes = random_keys(1_000);

    for degree in [3, 8, 32] {
        let tree: BPlusTree<u64, u64> = keys.iter().fold(BPlusTree::new(degree), |mut tree, &key| {
            tree.insert(key, key);
            tree
        });

        group.bench_with_input(BenchmarkId::new("our_tree", degree), &tree, |b, tree| {
            b.iter(|| {
                for probe in &probes {
                    black_box(tree.find(black_box(probe)));
                }
            })
        });
    }

    let std_tree: BTreeMap<u64, u64> = keys.iter().map(|&key| (key, key)).collect();
    group.bench_function("std_tree", |b| {
        b.iter(|| {
            for probe in &probes {
                black_box(std_tree.get(black_box(probe)));
            }
        })
    });

    group.finish();
}

fn remove_benchmark(c: &mut Criterion) {
    let keys = random_keys(SIZE);

    c.bench_function("remove_half", |b| {
        b.iter_batched(
            || {
                let mut tree = BPlusTree::new(recommended_degree(SIZE));
                for &key in &keys {
                    tree.insert(key, key);
                }
                tree
            },
            |mut tree| {
                for key in keys.iter().step_by(2) {
                    black_box(tree.remove(key));
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, insert_benchmark, lookup_benchmark, remove_benchmark);
criterion_main!(benches);
