// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A few simulation steps: move bodies, collect candidate pairs, and pick a point.

use kurbo::{Point, Rect, Vec2};
use log::info;
use thicket_broadphase::{Body, Broadphase, BroadphaseConfig, CollisionLayers, TreeResult};

fn main() -> TreeResult<()> {
    env_logger::init();

    let mut bp: Broadphase<u32> =
        Broadphase::with_config(BroadphaseConfig::default().with_max_surface_area_ratio(6.0))?;

    let wall = Body::new(
        CollisionLayers::WORLD,
        CollisionLayers::PLAYER | CollisionLayers::PROJECTILE,
    );
    let player = Body::new(CollisionLayers::PLAYER, CollisionLayers::all());
    let bullet = Body::new(
        CollisionLayers::PROJECTILE,
        CollisionLayers::WORLD | CollisionLayers::ENEMY,
    );
    let enemy = Body::new(
        CollisionLayers::ENEMY,
        CollisionLayers::PLAYER | CollisionLayers::PROJECTILE,
    );

    bp.insert(0, Rect::new(0.0, 100.0, 400.0, 110.0), wall)?;
    bp.insert(1, Rect::new(20.0, 60.0, 36.0, 92.0), player)?;
    bp.insert(2, Rect::new(40.0, 70.0, 44.0, 74.0), bullet)?;
    bp.insert(3, Rect::new(200.0, 60.0, 216.0, 92.0), enemy)?;

    let velocities = [
        (1, Vec2::new(0.0, 4.0)),
        (2, Vec2::new(40.0, 0.0)),
        (3, Vec2::new(-6.0, 4.0)),
    ];

    let mut pairs = Vec::new();
    for step in 0..5 {
        for (entity, v) in velocities {
            bp.translate(&entity, v)?;
        }
        pairs.clear();
        bp.candidate_pairs(&mut pairs)?;
        println!("step {step}: candidate pairs {pairs:?}");
        if bp.maintain() {
            info!("tree rebuilt at step {step}");
        }
    }

    let mut picked = Vec::new();
    bp.hit_point(Point::new(25.0, 100.0), CollisionLayers::all(), &mut picked)?;
    println!("bodies under (25, 100): {picked:?}");
    Ok(())
}
