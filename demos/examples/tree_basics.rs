// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a tree, stop a query early, inspect shape metrics, and rebuild.
//!
//! Run with `RUST_LOG=debug` to see pool growth and rebuild messages.

use core::ops::ControlFlow;

use thicket_tree::{Aabb2D, DynamicTree, QueryStack, TreeConfig, TreeResult};

fn main() -> TreeResult<()> {
    env_logger::init();

    let config = TreeConfig::default()
        .with_thickness(0.1)
        .with_initial_capacity(4);
    let mut tree: DynamicTree<u32> = DynamicTree::with_config(config)?;

    // A diagonal staircase of boxes; each overlaps its neighbours.
    for k in 0..64_u32 {
        let x = f64::from(k) * 8.0;
        tree.insert(k, Aabb2D::from_xywh(x, x, 10.0, 10.0))?;
    }
    println!(
        "inserted {} leaves: height {}, max balance {}, area ratio {:.2}",
        tree.len(),
        tree.height(),
        tree.max_balance(),
        tree.surface_area_ratio()
    );

    let mut first = None;
    tree.query(&10, |k| {
        first = Some(*k);
        ControlFlow::Break(())
    })?;
    println!("first neighbour of 10: {first:?}");

    // Reuse one stack across many queries.
    let mut stack = QueryStack::for_height(tree.height());
    let mut total = 0;
    for k in 0..64_u32 {
        tree.query_with(&mut stack, &k, |_| total += 1)?;
    }
    println!("{total} directed neighbour reports");

    let mut pairs = 0;
    tree.query_pairs(|_, _| pairs += 1)?;
    println!("{pairs} overlapping pairs");

    // Scatter half of the boxes, then rebuild if the hierarchy degraded.
    for k in (0..64_u32).step_by(2) {
        let x = f64::from(k * 37 % 64) * 50.0;
        tree.set_position(&k, x, 2000.0 - x, false)?;
    }
    let before = tree.surface_area_ratio();
    let rebuilt = tree.rebuild_if_degraded(4.0);
    println!(
        "area ratio {before:.2} -> {:.2} (rebuilt: {rebuilt}), height {}",
        tree.surface_area_ratio(),
        tree.height()
    );
    tree.validate();
    Ok(())
}
