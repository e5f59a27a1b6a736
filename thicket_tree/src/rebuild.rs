// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up reconstruction of the internal hierarchy.

use alloc::vec::Vec;
use core::hash::Hash;

use log::{debug, warn};

use crate::pool::{Kind, NodeIdx};
use crate::tree::DynamicTree;
use crate::types::Scalar;

/// Leaf count above which a rebuild logs a warning; each merge step scans all pairs.
pub const REBUILD_WARN_LEAVES: usize = 4096;

impl<K: Eq + Hash + Clone, T: Scalar> DynamicTree<K, T> {
    /// Discard every internal node and rebuild the hierarchy by repeatedly
    /// merging the pair of subtrees whose union has the smallest area.
    ///
    /// Leaves keep their stored boxes and keys. Each merge step is quadratic
    /// in the number of remaining subtrees, so this is meant for occasional
    /// maintenance rather than per-frame use.
    pub fn rebuild(&mut self) {
        if self.root.is_none() {
            return;
        }
        let mut roots = self.detach_leaves();
        let leaves = roots.len();
        if leaves > REBUILD_WARN_LEAVES {
            warn!("rebuilding {leaves} leaves; pairwise merge cost grows quadratically");
        }

        while roots.len() > 1 {
            let (i, j) = self.cheapest_pair(&roots);
            let (a, b) = (roots[i], roots[j]);
            let bounds = self.pool[a].bounds.union(&self.pool[b].bounds);
            let parent = self
                .pool
                .allocate(bounds, Kind::Internal { left: a, right: b });
            self.pool[parent].height = 1 + self.pool[a].height.max(self.pool[b].height);
            self.pool[a].parent = Some(parent);
            self.pool[b].parent = Some(parent);
            roots[i] = parent;
            let _ = roots.swap_remove(j);
        }

        self.root = roots.first().copied();
        debug!("rebuilt tree over {leaves} leaves, height {}", self.height());
    }

    /// Rebuild only when [`surface_area_ratio`](Self::surface_area_ratio)
    /// exceeds `max_ratio`. Returns whether a rebuild happened.
    pub fn rebuild_if_degraded(&mut self, max_ratio: f64) -> bool {
        let ratio = self.surface_area_ratio();
        if ratio > max_ratio {
            debug!("surface area ratio {ratio:.3} above {max_ratio:.3}, rebuilding");
            self.rebuild();
            true
        } else {
            false
        }
    }

    /// Free all internal nodes and return the orphaned leaves.
    fn detach_leaves(&mut self) -> Vec<NodeIdx> {
        let mut leaves = Vec::with_capacity(self.lookup.len());
        let mut internal = Vec::new();
        for (idx, node) in self.pool.iter() {
            if node.is_leaf() {
                leaves.push(idx);
            } else {
                internal.push(idx);
            }
        }
        for idx in internal {
            let _ = self.pool.free(idx);
        }
        for &leaf in &leaves {
            self.pool[leaf].parent = None;
        }
        self.root = None;
        leaves
    }

    fn cheapest_pair(&self, roots: &[NodeIdx]) -> (usize, usize) {
        let mut best = (0, 1);
        let mut best_area = None;
        for i in 0..roots.len() {
            let a = &self.pool[roots[i]].bounds;
            for j in i + 1..roots.len() {
                let area = a.union(&self.pool[roots[j]].bounds).area;
                if best_area.is_none_or(|b| area < b) {
                    best_area = Some(area);
                    best = (i, j);
                }
            }
        }
        best
    }
}
