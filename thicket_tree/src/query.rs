// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap queries over a bounded, reusable traversal stack.
//!
//! Queries never recurse and never allocate: the traversal stack is created
//! once with a fixed capacity and reused. A query that would need more slots
//! than the stack provides fails with [`TreeError::QueryStackExhausted`]
//! instead of silently dropping results. Depth-first traversal needs at most
//! `height + 1` slots, see [`QueryStack::for_height`].

use alloc::vec::Vec;
use core::hash::Hash;
use core::ops::ControlFlow;

use crate::error::{TreeError, TreeResult};
use crate::pool::{Kind, NodeIdx};
use crate::tree::DynamicTree;
use crate::types::{Aabb2D, Scalar};

/// Return type of query callbacks, deciding whether the traversal stops.
///
/// `()` always continues, `bool` stops on `true`, and `ControlFlow` stops on
/// `Break`.
pub trait QueryFlow {
    /// Whether the traversal should stop after this callback.
    fn should_stop(self) -> bool;
}

impl QueryFlow for () {
    #[inline]
    fn should_stop(self) -> bool {
        false
    }
}

impl QueryFlow for bool {
    #[inline]
    fn should_stop(self) -> bool {
        self
    }
}

impl QueryFlow for ControlFlow<()> {
    #[inline]
    fn should_stop(self) -> bool {
        self.is_break()
    }
}

/// Fixed-capacity traversal stack for overlap queries.
///
/// The backing storage is allocated once; pushes beyond the capacity fail
/// rather than grow.
#[derive(Clone, Debug)]
pub struct QueryStack {
    items: Vec<NodeIdx>,
    capacity: usize,
}

impl QueryStack {
    /// A stack holding at most `capacity` pending nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// A stack large enough for any query on a tree of the given height.
    pub fn for_height(height: u32) -> Self {
        Self::with_capacity(height as usize + 1)
    }

    /// Maximum number of pending nodes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&mut self, idx: NodeIdx) -> TreeResult<()> {
        if self.items.len() >= self.capacity {
            return Err(TreeError::QueryStackExhausted {
                capacity: self.capacity,
            });
        }
        self.items.push(idx);
        Ok(())
    }

    fn pop(&mut self) -> Option<NodeIdx> {
        self.items.pop()
    }

    fn reset(&mut self) {
        self.items.clear();
    }
}

impl<K: Eq + Hash + Clone, T: Scalar> DynamicTree<K, T> {
    /// Report every other leaf whose stored box overlaps the stored box of `key`.
    ///
    /// The callback sees each match once, in unspecified order, and may stop
    /// the traversal early (see [`QueryFlow`]). Unknown keys are a no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::QueryStackExhausted`] if the tree is deeper than the
    /// configured stack capacity.
    pub fn query<F, R>(&self, key: &K, callback: F) -> TreeResult<()>
    where
        F: FnMut(&K) -> R,
        R: QueryFlow,
    {
        let mut stack = self.take_scratch();
        let result = self.query_with(&mut stack, key, callback);
        self.scratch.set(Some(stack));
        result
    }

    /// Like [`query`](Self::query), appending matches to `out`.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub fn query_into(&self, key: &K, out: &mut Vec<K>) -> TreeResult<()> {
        self.query(key, |k| out.push(k.clone()))
    }

    /// Like [`query`](Self::query), traversing with a caller-provided stack.
    ///
    /// # Errors
    ///
    /// [`TreeError::QueryStackExhausted`] if `stack` is too small for the tree.
    pub fn query_with<F, R>(&self, stack: &mut QueryStack, key: &K, mut callback: F) -> TreeResult<()>
    where
        F: FnMut(&K) -> R,
        R: QueryFlow,
    {
        let Some(&source) = self.lookup.get(key) else {
            return Ok(());
        };
        let target = self.pool[source].bounds.aabb;
        self.traverse(stack, &target, |idx, other| {
            idx != source && callback(other).should_stop()
        })
    }

    /// Report every leaf whose stored box overlaps `aabb`.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub fn query_aabb<F, R>(&self, aabb: Aabb2D<T>, mut callback: F) -> TreeResult<()>
    where
        F: FnMut(&K) -> R,
        R: QueryFlow,
    {
        let mut stack = self.take_scratch();
        let result = self.traverse(&mut stack, &aabb, |_, k| callback(k).should_stop());
        self.scratch.set(Some(stack));
        result
    }

    /// Report every unordered pair of overlapping leaves exactly once.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub fn query_pairs<F, R>(&self, mut callback: F) -> TreeResult<()>
    where
        F: FnMut(&K, &K) -> R,
        R: QueryFlow,
    {
        let mut stack = self.take_scratch();
        let mut result = Ok(());
        for (a, node) in self.pool.iter() {
            let Kind::Leaf { key: first, .. } = &node.kind else {
                continue;
            };
            let mut stop = false;
            result = self.traverse(&mut stack, &node.bounds.aabb, |b, second| {
                if b.get() <= a.get() {
                    return false;
                }
                stop = callback(first, second).should_stop();
                stop
            });
            if stop || result.is_err() {
                break;
            }
        }
        self.scratch.set(Some(stack));
        result
    }

    /// The shared stack, or a fresh one when a query runs inside another query's callback.
    fn take_scratch(&self) -> QueryStack {
        self.scratch
            .take()
            .unwrap_or_else(|| QueryStack::with_capacity(self.stack_capacity))
    }
}

impl<K, T: Scalar> DynamicTree<K, T> {
    /// Depth-first walk over leaves overlapping `target`. `visit` returns true to stop.
    fn traverse<F>(&self, stack: &mut QueryStack, target: &Aabb2D<T>, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(NodeIdx, &K) -> bool,
    {
        let Some(root) = self.root else {
            return Ok(());
        };
        stack.reset();
        let result = self.walk(stack, root, target, &mut visit);
        stack.reset();
        result
    }

    fn walk<F>(
        &self,
        stack: &mut QueryStack,
        root: NodeIdx,
        target: &Aabb2D<T>,
        visit: &mut F,
    ) -> TreeResult<()>
    where
        F: FnMut(NodeIdx, &K) -> bool,
    {
        stack.push(root)?;
        while let Some(idx) = stack.pop() {
            let node = &self.pool[idx];
            if !node.bounds.aabb.overlaps(target, self.touch_is_overlap) {
                continue;
            }
            match &node.kind {
                Kind::Leaf { key, .. } => {
                    if visit(idx, key) {
                        return Ok(());
                    }
                }
                Kind::Internal { left, right } => {
                    stack.push(*left)?;
                    stack.push(*right)?;
                }
                Kind::Free { .. } => {
                    debug_assert!(false, "free slot {} reachable from the root", idx.get());
                }
            }
        }
        Ok(())
    }
}
