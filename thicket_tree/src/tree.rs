// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree structure: insertion, removal, rebalancing, and lazy updates.

use core::cell::Cell;
use core::fmt::Debug;
use core::hash::Hash;

use fxhash::FxHashMap;
use log::{debug, trace};

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::pool::{Kind, NodeIdx, NodePool};
use crate::query::QueryStack;
use crate::types::{Aabb2D, Bounds, Scalar, validate_aabb};

/// A dynamic bounding-volume tree of 2D AABBs keyed by `K`.
///
/// Leaves store a fattened copy of each box so that small movements do not
/// restructure the tree; internal nodes store the union of their children and
/// are kept height balanced with rotations.
pub struct DynamicTree<K, T: Scalar = f64> {
    pub(crate) pool: NodePool<K, T>,
    pub(crate) lookup: FxHashMap<K, NodeIdx>,
    pub(crate) root: Option<NodeIdx>,
    pub(crate) thickness: Option<T>,
    pub(crate) touch_is_overlap: bool,
    pub(crate) stack_capacity: usize,
    // Taken for the duration of a query and put back on every exit path.
    pub(crate) scratch: Cell<Option<QueryStack>>,
}

impl<K, T: Scalar> Debug for DynamicTree<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicTree")
            .field("leaves", &self.lookup.len())
            .field("nodes", &self.pool.len())
            .field("capacity", &self.pool.capacity())
            .field("has_root", &self.root.is_some())
            .field("thickness", &self.thickness)
            .field("touch_is_overlap", &self.touch_is_overlap)
            .finish_non_exhaustive()
    }
}

impl<K: Eq + Hash + Clone, T: Scalar> Default for DynamicTree<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, T: Scalar> DynamicTree<K, T> {
    /// Create an empty tree with the default [`TreeConfig`].
    pub fn new() -> Self {
        Self::build(TreeConfig::default())
    }

    /// Create an empty tree with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidThickness`] if the thickness factor is not
    /// positive and finite.
    pub fn with_config(config: TreeConfig<T>) -> TreeResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TreeConfig<T>) -> Self {
        Self {
            pool: NodePool::with_capacity(config.initial_capacity),
            lookup: FxHashMap::default(),
            root: None,
            thickness: config.thickness,
            touch_is_overlap: config.touch_is_overlap,
            stack_capacity: config.query_stack_capacity,
            scratch: Cell::new(Some(QueryStack::with_capacity(
                config.query_stack_capacity,
            ))),
        }
    }

    /// Insert a leaf for `key` with the exact box `aabb`.
    ///
    /// The stored box is fattened when a thickness factor is configured.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`] for degenerate or non-finite boxes and
    /// [`TreeError::DuplicateKey`] if `key` is already present. The tree is
    /// unchanged in both cases.
    pub fn insert(&mut self, key: K, aabb: Aabb2D<T>) -> TreeResult<()> {
        validate_aabb(&aabb)?;
        if self.lookup.contains_key(&key) {
            return Err(TreeError::DuplicateKey);
        }
        let bounds = Bounds::new(self.fatten(aabb));
        let leaf = self.pool.allocate(
            bounds,
            Kind::Leaf {
                key: key.clone(),
                tight: aabb,
            },
        );
        self.insert_leaf(leaf);
        let _ = self.lookup.insert(key, leaf);
        Ok(())
    }

    /// Remove the leaf for `key`. Returns `false` if the key is unknown.
    pub fn erase(&mut self, key: &K) -> bool {
        let Some(leaf) = self.lookup.remove(key) else {
            return false;
        };
        self.remove_leaf(leaf);
        let _ = self.pool.free(leaf);
        true
    }

    /// Remove every leaf. Node capacity is retained.
    pub fn clear(&mut self) {
        let keys: Vec<K> = self.lookup.keys().cloned().collect();
        debug!("clearing tree with {} leaves", keys.len());
        for key in &keys {
            let _ = self.erase(key);
        }
        self.lookup.clear();
        debug_assert!(self.root.is_none(), "tree has no root after clear");
    }

    /// Move the leaf for `key` to the exact box `aabb`.
    ///
    /// When the stored fattened box still contains `aabb` and `force_reinsert`
    /// is false the tree structure is left untouched. Returns `Ok(false)` if
    /// the key is unknown.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`] for degenerate or non-finite boxes.
    pub fn update(&mut self, key: &K, aabb: Aabb2D<T>, force_reinsert: bool) -> TreeResult<bool> {
        validate_aabb(&aabb)?;
        let Some(&leaf) = self.lookup.get(key) else {
            return Ok(false);
        };
        let node = &mut self.pool[leaf];
        if let Kind::Leaf { tight, .. } = &mut node.kind {
            *tight = aabb;
        }
        if !force_reinsert && node.bounds.aabb.contains(&aabb) {
            return Ok(true);
        }
        self.remove_leaf(leaf);
        let bounds = Bounds::new(self.fatten(aabb));
        self.pool[leaf].bounds = bounds;
        self.insert_leaf(leaf);
        trace!("reinserted leaf {}", leaf.get());
        Ok(true)
    }

    /// Move the leaf for `key` so that its exact box starts at `(x, y)`, keeping its size.
    ///
    /// Follows the same lazy policy as [`update`](Self::update). Returns
    /// `Ok(false)` if the key is unknown.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`] if the moved box is not finite.
    pub fn set_position(&mut self, key: &K, x: T, y: T, force_reinsert: bool) -> TreeResult<bool> {
        let Some(tight) = self.tight(key) else {
            return Ok(false);
        };
        self.update(key, tight.with_origin(x, y), force_reinsert)
    }

    /// Stored (fattened) box for `key`.
    pub fn get(&self, key: &K) -> Option<Aabb2D<T>> {
        self.lookup.get(key).map(|&idx| self.pool[idx].bounds.aabb)
    }

    /// Stored (fattened) box for `key`.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the key is unknown.
    pub fn at(&self, key: &K) -> TreeResult<Aabb2D<T>> {
        self.get(key).ok_or(TreeError::KeyNotFound)
    }

    /// Exact box last supplied for `key`.
    pub fn tight(&self, key: &K) -> Option<Aabb2D<T>> {
        let idx = *self.lookup.get(key)?;
        match &self.pool[idx].kind {
            Kind::Leaf { tight, .. } => Some(*tight),
            _ => None,
        }
    }

    /// Whether `key` has a leaf in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.lookup.contains_key(key)
    }

    /// Keys of all leaves, in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.lookup.keys()
    }

    /// Keys with their stored (fattened) boxes, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Aabb2D<T>)> + '_ {
        self.lookup
            .iter()
            .map(|(k, &idx)| (k, self.pool[idx].bounds.aabb))
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// True if the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Active nodes (leaves and internal nodes).
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Allocated node slots.
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Configured fattening factor.
    pub fn thickness(&self) -> Option<T> {
        self.thickness
    }

    /// Whether touching boxes count as overlapping in queries.
    pub fn touch_is_overlap(&self) -> bool {
        self.touch_is_overlap
    }

    /// Change the touch semantics used by later queries.
    pub fn set_touch_is_overlap(&mut self, touch_is_overlap: bool) {
        self.touch_is_overlap = touch_is_overlap;
    }

    fn fatten(&self, aabb: Aabb2D<T>) -> Aabb2D<T> {
        match self.thickness {
            Some(t) => aabb.fattened(t),
            None => aabb,
        }
    }
}

// Structural operations only need the key to be stored, not hashed.
impl<K, T: Scalar> DynamicTree<K, T> {
    /// Splice an allocated leaf into the tree next to its best sibling.
    pub(crate) fn insert_leaf(&mut self, leaf: NodeIdx) {
        let Some(root) = self.root else {
            self.root = Some(leaf);
            self.pool[leaf].parent = None;
            return;
        };

        let leaf_bounds = self.pool[leaf].bounds;
        let two = T::acc_from_usize(2);
        let mut index = root;
        while let Some((left, right)) = self.pool[index].children() {
            let node_bounds = self.pool[index].bounds;
            let combined = node_bounds.union(&leaf_bounds);

            // Cost of pairing the leaf with this node under a new parent.
            let cost = two * combined.area;
            // Minimum cost paid by every ancestor when descending further.
            let inheritance = two * (combined.area - node_bounds.area);

            let cost_left = self.descent_cost(left, &leaf_bounds, inheritance);
            let cost_right = self.descent_cost(right, &leaf_bounds, inheritance);

            if cost < cost_left && cost < cost_right {
                break;
            }
            index = if cost_left < cost_right { left } else { right };
        }

        let sibling = index;
        let old_parent = self.pool[sibling].parent;
        let sibling_bounds = self.pool[sibling].bounds;
        let sibling_height = self.pool[sibling].height;
        let parent = self.pool.allocate(
            leaf_bounds.union(&sibling_bounds),
            Kind::Internal {
                left: sibling,
                right: leaf,
            },
        );
        self.pool[parent].parent = old_parent;
        self.pool[parent].height = sibling_height + 1;
        match old_parent {
            Some(p) => self.replace_child(p, sibling, parent),
            None => self.root = Some(parent),
        }
        self.pool[sibling].parent = Some(parent);
        self.pool[leaf].parent = Some(parent);

        self.refit_upwards(Some(parent));
    }

    fn descent_cost(&self, child: NodeIdx, leaf: &Bounds<T>, inheritance: T::Acc) -> T::Acc {
        let node = &self.pool[child];
        let merged = node.bounds.union(leaf).area;
        if node.is_leaf() {
            merged + inheritance
        } else {
            merged - node.bounds.area + inheritance
        }
    }

    /// Detach a leaf, collapsing its parent. The leaf slot itself stays allocated.
    pub(crate) fn remove_leaf(&mut self, leaf: NodeIdx) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }
        let Some(parent) = self.pool[leaf].parent else {
            debug_assert!(false, "non-root leaf {} has no parent", leaf.get());
            return;
        };
        let Some((left, right)) = self.pool[parent].children() else {
            debug_assert!(false, "parent {} is not internal", parent.get());
            return;
        };
        let sibling = if left == leaf { right } else { left };
        let grandparent = self.pool[parent].parent;

        match grandparent {
            Some(g) => {
                self.replace_child(g, parent, sibling);
                self.pool[sibling].parent = Some(g);
                let _ = self.pool.free(parent);
                self.refit_upwards(Some(g));
            }
            None => {
                self.root = Some(sibling);
                self.pool[sibling].parent = None;
                let _ = self.pool.free(parent);
            }
        }
        self.pool[leaf].parent = None;
    }

    /// Balance and refit every node from `start` to the root.
    fn refit_upwards(&mut self, start: Option<NodeIdx>) {
        let mut cursor = start;
        while let Some(idx) = cursor {
            let idx = self.balance(idx);
            self.refit(idx);
            cursor = self.pool[idx].parent;
        }
    }

    /// Recompute an internal node's box and height from its children.
    pub(crate) fn refit(&mut self, idx: NodeIdx) {
        if let Some((left, right)) = self.pool[idx].children() {
            let bounds = self.pool[left].bounds.union(&self.pool[right].bounds);
            let height = 1 + self.pool[left].height.max(self.pool[right].height);
            let node = &mut self.pool[idx];
            node.bounds = bounds;
            node.height = height;
        }
    }

    fn replace_child(&mut self, parent: NodeIdx, old: NodeIdx, new: NodeIdx) {
        if let Kind::Internal { left, right } = &mut self.pool[parent].kind {
            if *left == old {
                *left = new;
            } else {
                debug_assert!(*right == old, "{} is not a child of {}", old.get(), parent.get());
                *right = new;
            }
        }
    }

    /// Rotate around `a` if its children's heights differ by more than one.
    /// Returns the root of the (possibly new) subtree.
    pub(crate) fn balance(&mut self, a: NodeIdx) -> NodeIdx {
        let Some((b, c)) = self.pool[a].children() else {
            return a;
        };
        if self.pool[a].height < 2 {
            return a;
        }
        let left_height = self.pool[b].height;
        let right_height = self.pool[c].height;
        if right_height > left_height + 1 {
            self.rotate_right(a, b, c)
        } else if left_height > right_height + 1 {
            self.rotate_left(a, b, c)
        } else {
            a
        }
    }

    /// Promote the right child `c` of `a`. The taller of `c`'s children stays
    /// under `c`; the shorter one replaces `c` under `a`.
    fn rotate_right(&mut self, a: NodeIdx, b: NodeIdx, c: NodeIdx) -> NodeIdx {
        let Some((f, g)) = self.pool[c].children() else {
            return a;
        };
        self.promote(a, c);
        let (keep, moved) = if self.pool[f].height > self.pool[g].height {
            (f, g)
        } else {
            (g, f)
        };
        self.pool[c].kind = Kind::Internal {
            left: a,
            right: keep,
        };
        self.pool[a].kind = Kind::Internal {
            left: b,
            right: moved,
        };
        self.pool[moved].parent = Some(a);
        self.refit(a);
        self.refit(c);
        trace!("rotated node {} above {}", c.get(), a.get());
        c
    }

    /// Promote the left child `b` of `a`. Mirror of [`Self::rotate_right`].
    fn rotate_left(&mut self, a: NodeIdx, b: NodeIdx, c: NodeIdx) -> NodeIdx {
        let Some((d, e)) = self.pool[b].children() else {
            return a;
        };
        self.promote(a, b);
        let (keep, moved) = if self.pool[d].height > self.pool[e].height {
            (d, e)
        } else {
            (e, d)
        };
        self.pool[b].kind = Kind::Internal {
            left: a,
            right: keep,
        };
        self.pool[a].kind = Kind::Internal {
            left: moved,
            right: c,
        };
        self.pool[moved].parent = Some(a);
        self.refit(a);
        self.refit(b);
        trace!("rotated node {} above {}", b.get(), a.get());
        b
    }

    /// Put `child` in `a`'s place and make `a` its child.
    fn promote(&mut self, a: NodeIdx, child: NodeIdx) {
        let parent = self.pool[a].parent;
        self.pool[child].parent = parent;
        self.pool[a].parent = Some(child);
        match parent {
            Some(p) => self.replace_child(p, a, child),
            None => self.root = Some(child),
        }
    }
}
