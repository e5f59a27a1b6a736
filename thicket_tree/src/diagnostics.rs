// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape metrics and structural invariant checks.

use core::hash::Hash;

use crate::tree::DynamicTree;
use crate::types::Scalar;

impl<K: Eq + Hash + Clone, T: Scalar> DynamicTree<K, T> {
    /// Height of the root; 0 for an empty tree or a single leaf.
    pub fn height(&self) -> u32 {
        self.root.map_or(0, |r| self.pool[r].height)
    }

    /// Largest height difference between the two children of any internal node.
    pub fn max_balance(&self) -> u32 {
        self.pool
            .iter()
            .filter_map(|(_, node)| node.children())
            .map(|(l, r)| self.pool[l].height.abs_diff(self.pool[r].height))
            .max()
            .unwrap_or(0)
    }

    /// Sum of the surface areas of all nodes divided by the root's.
    ///
    /// Grows as the hierarchy degrades; `0.0` for an empty tree.
    pub fn surface_area_ratio(&self) -> f64 {
        let Some(root) = self.root else {
            return 0.0;
        };
        let root_area = T::acc_to_f64(self.pool[root].bounds.area);
        if root_area <= 0.0 {
            return 0.0;
        }
        let total: f64 = self
            .pool
            .iter()
            .map(|(_, node)| T::acc_to_f64(node.bounds.area))
            .sum();
        total / root_area
    }

    /// Assert the structural invariants of the tree.
    ///
    /// Checks parent/child links, heights, cached boxes and areas, the key
    /// lookup, and pool accounting. Compiled to a no-op without debug assertions.
    pub fn validate(&self) {
        #[cfg(debug_assertions)]
        self.validate_inner();
    }

    #[cfg(debug_assertions)]
    fn validate_inner(&self) {
        use crate::pool::{Kind, NodeIdx};
        use crate::types::surface_area;

        debug_assert_eq!(
            self.pool.len() + self.pool.free_len(),
            self.pool.capacity(),
            "every slot is either active or on the free list"
        );
        let Some(root) = self.root else {
            debug_assert_eq!(self.pool.len(), 0, "empty tree holds no nodes");
            debug_assert!(self.lookup.is_empty(), "empty tree holds no keys");
            return;
        };
        debug_assert!(self.pool[root].parent.is_none(), "root has no parent");

        let mut reached = 0_usize;
        let mut leaves = 0_usize;
        let mut stack: Vec<NodeIdx> = vec![root];
        while let Some(idx) = stack.pop() {
            reached += 1;
            let node = &self.pool[idx];
            debug_assert!(
                node.bounds.area == surface_area(&node.bounds.aabb),
                "cached area of node {} is stale",
                idx.get()
            );
            match &node.kind {
                Kind::Leaf { key, tight } => {
                    leaves += 1;
                    debug_assert_eq!(node.height, 0, "leaf {} has height 0", idx.get());
                    debug_assert!(
                        node.bounds.aabb.contains(tight),
                        "stored box of leaf {} contains its exact box",
                        idx.get()
                    );
                    debug_assert_eq!(
                        self.lookup.get(key),
                        Some(&idx),
                        "lookup points at leaf {}",
                        idx.get()
                    );
                }
                Kind::Internal { left, right } => {
                    let (l, r) = (&self.pool[*left], &self.pool[*right]);
                    debug_assert_eq!(l.parent, Some(idx), "left child links back to {}", idx.get());
                    debug_assert_eq!(r.parent, Some(idx), "right child links back to {}", idx.get());
                    debug_assert_eq!(
                        node.height,
                        1 + l.height.max(r.height),
                        "height of node {} matches its children",
                        idx.get()
                    );
                    debug_assert_eq!(
                        node.bounds.aabb,
                        l.bounds.union(&r.bounds).aabb,
                        "box of node {} is the union of its children",
                        idx.get()
                    );
                    stack.push(*left);
                    stack.push(*right);
                }
                Kind::Free { .. } => {
                    debug_assert!(false, "free slot {} reachable from the root", idx.get());
                }
            }
        }
        debug_assert_eq!(reached, self.pool.len(), "every active node is reachable");
        debug_assert_eq!(leaves, self.lookup.len(), "every key has exactly one leaf");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::types::Aabb2D;

    #[test]
    fn metrics_of_empty_and_small_trees() {
        let mut tree: DynamicTree<u32> =
            DynamicTree::with_config(TreeConfig::default().without_thickness()).unwrap();
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.max_balance(), 0);
        assert_eq!(tree.surface_area_ratio(), 0.0);
        tree.validate();

        tree.insert(1, Aabb2D::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.surface_area_ratio(), 1.0);

        tree.insert(2, Aabb2D::new(1.0, 0.0, 2.0, 1.0)).unwrap();
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.max_balance(), 0);
        // Root perimeter 6, leaves 4 each.
        let ratio = tree.surface_area_ratio();
        assert!((ratio - 14.0 / 6.0).abs() < 1e-12, "ratio {ratio}");
        tree.validate();
    }

    #[test]
    fn root_area_bounds_the_ratio_from_below() {
        let mut tree: DynamicTree<u32> = DynamicTree::new();
        for k in 0..16_u32 {
            let x = f64::from(k % 4) * 100.0;
            let y = f64::from(k / 4) * 100.0;
            tree.insert(k, Aabb2D::from_xywh(x, y, 10.0, 10.0)).unwrap();
        }
        assert!(tree.surface_area_ratio() > 1.0);
        assert!(tree.max_balance() <= tree.height());
        tree.validate();
    }
}
