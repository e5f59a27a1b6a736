// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thicket_tree::{Aabb2D, DynamicTree, QueryStack, TreeConfig};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell * 0.9, cell * 0.9));
        }
    }
    out
}

fn gen_random_rects(count: usize, extent: f64, size: f64, seed: u64) -> Vec<Aabb2D<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x0 = rng.gen_range(0.0..extent - size);
            let y0 = rng.gen_range(0.0..extent - size);
            Aabb2D::<f64>::from_xywh(x0, y0, size, size)
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = StdRng::seed_from_u64(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let cx = rng.gen_range(0.0..2000.0);
        let cy = rng.gen_range(0.0..2000.0);
        for _ in 0..per_cluster {
            let dx = rng.gen_range(-0.5..0.5) * spread;
            let dy = rng.gen_range(-0.5..0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build(rects: &[Aabb2D<f64>], config: TreeConfig<f64>) -> DynamicTree<u32> {
    let mut tree = DynamicTree::with_config(config).unwrap();
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(i as u32, r).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                DynamicTree::<u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.insert(i as u32, r);
                    }
                    black_box(tree.height());
                },
                BatchSize::SmallInput,
            );
        });
    }
    let rects = gen_clustered_rects(16, 256, 200.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("clustered_4096", |b| {
        b.iter_batched(
            DynamicTree::<u32>::new,
            |mut tree| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = tree.insert(i as u32, r);
                }
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let rects = gen_random_rects(4096, 2000.0, 12.0, 0xCAFE_F00D);
    group.throughput(Throughput::Elements(rects.len() as u64));

    // Jitter stays inside the fattened boxes.
    group.bench_function("small_moves_4096", |b| {
        b.iter_batched(
            || build(&rects, TreeConfig::default().with_thickness(0.25)),
            |mut tree| {
                for (i, r) in rects.iter().enumerate() {
                    let _ = tree.set_position(&(i as u32), r.min_x + 1.0, r.min_y + 1.0, false);
                }
                black_box(tree.node_count());
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("large_moves_4096", |b| {
        b.iter_batched(
            || build(&rects, TreeConfig::default()),
            |mut tree| {
                for (i, r) in rects.iter().enumerate() {
                    let x = 2000.0 - r.max_x;
                    let _ = tree.set_position(&(i as u32), x, r.min_y, false);
                }
                black_box(tree.height());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(4096, 2000.0, 12.0, 0xFACE_FEED);
    let tree = build(&rects, TreeConfig::default());
    group.throughput(Throughput::Elements(rects.len() as u64));

    group.bench_function("per_key_shared_stack", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for i in 0..rects.len() as u32 {
                tree.query(&i, |_| hits += 1).unwrap();
            }
            black_box(hits);
        });
    });

    group.bench_function("per_key_caller_stack", |b| {
        let mut stack = QueryStack::for_height(tree.height());
        b.iter(|| {
            let mut hits = 0_usize;
            for i in 0..rects.len() as u32 {
                tree.query_with(&mut stack, &i, |_| hits += 1).unwrap();
            }
            black_box(hits);
        });
    });

    group.bench_function("all_pairs", |b| {
        b.iter(|| {
            let mut pairs = 0_usize;
            tree.query_pairs(|_, _| pairs += 1).unwrap();
            black_box(pairs);
        });
    });

    group.bench_function("region", |b| {
        let region = Aabb2D::<f64>::from_xywh(800.0, 800.0, 400.0, 400.0);
        b.iter(|| {
            let mut hits = 0_usize;
            tree.query_aabb(region, |_| hits += 1).unwrap();
            black_box(hits);
        });
    });
    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[256usize, 1024] {
        let rects = gen_random_rects(n, 2000.0, 12.0, 0xBADC_F00D);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{n}"), |b| {
            b.iter_batched(
                || build(&rects, TreeConfig::default()),
                |mut tree| {
                    tree.rebuild();
                    black_box(tree.surface_area_ratio());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("f32");
    let rects: Vec<Aabb2D<f32>> = gen_random_rects(4096, 2000.0, 12.0, 0x1234_5678)
        .into_iter()
        .map(|r| Aabb2D::new(r.min_x as f32, r.min_y as f32, r.max_x as f32, r.max_y as f32))
        .collect();
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("insert_query_4096", |b| {
        b.iter_batched(
            DynamicTree::<u32, f32>::new,
            |mut tree| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = tree.insert(i as u32, r);
                }
                let mut hits = 0_usize;
                tree.query_pairs(|_, _| hits += 1).unwrap();
                black_box(hits);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_update,
    bench_query,
    bench_rebuild,
    bench_f32,
);
criterion_main!(benches);
