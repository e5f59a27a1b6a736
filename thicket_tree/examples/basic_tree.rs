// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Thicket Tree: insert, move, query, and erase.

use thicket_tree::{Aabb2D, DynamicTree, TreeResult};

fn main() -> TreeResult<()> {
    let mut tree: DynamicTree<&str> = DynamicTree::new();
    tree.insert("crate", Aabb2D::new(0.0, 0.0, 10.0, 10.0))?;
    tree.insert("barrel", Aabb2D::new(5.0, 5.0, 15.0, 15.0))?;
    tree.insert("tree", Aabb2D::new(40.0, 0.0, 50.0, 30.0))?;

    let mut hits = Vec::new();
    tree.query_into(&"crate", &mut hits)?;
    println!("overlapping crate: {hits:?}");

    // A small nudge stays inside the fattened box.
    tree.set_position(&"crate", 0.2, 0.2, false)?;
    println!("crate stored as {:?}", tree.at(&"crate")?);

    // Moving far away reinserts the leaf.
    tree.set_position(&"crate", 38.0, 5.0, false)?;
    hits.clear();
    tree.query_into(&"crate", &mut hits)?;
    println!("overlapping crate after move: {hits:?}");

    tree.erase(&"barrel");
    println!(
        "{} leaves, {} nodes, height {}",
        tree.len(),
        tree.node_count(),
        tree.height()
    );
    Ok(())
}
