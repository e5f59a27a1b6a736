// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thicket_broadphase::{Body, Broadphase, CollisionLayers};

fn populate(count: u32, seed: u64) -> (Broadphase<u32>, Vec<Vec2>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bp = Broadphase::new();
    let mut velocities = Vec::with_capacity(count as usize);
    for e in 0..count {
        let x = rng.gen_range(0.0..2000.0);
        let y = rng.gen_range(0.0..2000.0);
        let layer = if e % 4 == 0 {
            CollisionLayers::PLAYER
        } else {
            CollisionLayers::ENEMY
        };
        bp.insert(
            e,
            Rect::new(x, y, x + 8.0, y + 8.0),
            Body::new(layer, CollisionLayers::all()),
        )
        .unwrap();
        velocities.push(Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)));
    }
    (bp, velocities)
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase_step");
    for &n in &[1024u32, 4096] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("move_and_pair_n{n}"), |b| {
            b.iter_batched(
                || populate(n, 0x5EED),
                |(mut bp, velocities)| {
                    let mut pairs = Vec::new();
                    for _ in 0..4 {
                        for (e, v) in velocities.iter().enumerate() {
                            let _ = bp.translate(&(e as u32), *v);
                        }
                        pairs.clear();
                        bp.candidate_pairs(&mut pairs).unwrap();
                        let _ = bp.maintain();
                    }
                    black_box(pairs.len());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
