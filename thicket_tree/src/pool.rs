// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena with an intrusive free list.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use log::debug;

use crate::types::{Aabb2D, Bounds, Scalar};

/// Index of a node slot in the pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Kind<K, T> {
    /// Holds a user key and the caller's exact box; `Node::bounds` is the fattened box.
    Leaf { key: K, tight: Aabb2D<T> },
    Internal { left: NodeIdx, right: NodeIdx },
    Free { next: Option<NodeIdx> },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, T: Scalar> {
    pub(crate) bounds: Bounds<T>,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) height: u32,
    pub(crate) kind: Kind<K, T>,
}

impl<K, T: Scalar> Node<K, T> {
    fn free(next: Option<NodeIdx>) -> Self {
        Self {
            bounds: Bounds::zero(),
            parent: None,
            height: 0,
            kind: Kind::Free { next },
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, Kind::Leaf { .. })
    }

    pub(crate) fn is_free(&self) -> bool {
        matches!(self.kind, Kind::Free { .. })
    }

    pub(crate) fn children(&self) -> Option<(NodeIdx, NodeIdx)> {
        match self.kind {
            Kind::Internal { left, right } => Some((left, right)),
            _ => None,
        }
    }
}

/// Growable node storage. Slots are never shrunk; freed slots are threaded
/// through `Kind::Free` and reused before the pool grows again.
#[derive(Clone, Debug)]
pub(crate) struct NodePool<K, T: Scalar> {
    nodes: Vec<Node<K, T>>,
    free_head: Option<NodeIdx>,
    count: usize,
}

impl<K, T: Scalar> NodePool<K, T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut nodes = Vec::with_capacity(capacity);
        for i in 0..capacity {
            let next = (i + 1 < capacity).then(|| NodeIdx::new(i + 1));
            nodes.push(Node::free(next));
        }
        Self {
            nodes,
            free_head: Some(NodeIdx::new(0)),
            count: 0,
        }
    }

    /// Active (leaf and internal) nodes.
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Double the slot count and return the first new slot, which becomes the free head.
    fn grow(&mut self) -> NodeIdx {
        debug_assert!(self.free_head.is_none(), "pool grows only when exhausted");
        let old = self.nodes.len();
        let new = (old * 2).max(1);
        self.nodes.reserve_exact(new - old);
        for i in old..new {
            let next = (i + 1 < new).then(|| NodeIdx::new(i + 1));
            self.nodes.push(Node::free(next));
        }
        debug!("node pool grew from {old} to {new} slots");
        let first = NodeIdx::new(old);
        self.free_head = Some(first);
        first
    }

    /// Take a slot off the free list and initialize it as a root-less node of height 0.
    pub(crate) fn allocate(&mut self, bounds: Bounds<T>, kind: Kind<K, T>) -> NodeIdx {
        let idx = match self.free_head {
            Some(idx) => idx,
            None => self.grow(),
        };
        let slot = &mut self.nodes[idx.get()];
        debug_assert!(slot.is_free(), "free list must only thread free slots");
        self.free_head = match slot.kind {
            Kind::Free { next } => next,
            _ => None,
        };
        *slot = Node {
            bounds,
            parent: None,
            height: 0,
            kind,
        };
        self.count += 1;
        idx
    }

    /// Return a slot to the free list, handing back what it held.
    pub(crate) fn free(&mut self, idx: NodeIdx) -> Kind<K, T> {
        let slot = &mut self.nodes[idx.get()];
        debug_assert!(!slot.is_free(), "slot {} freed twice", idx.get());
        let old = core::mem::replace(slot, Node::free(self.free_head));
        self.free_head = Some(idx);
        self.count -= 1;
        old.kind
    }

    /// Number of slots currently on the free list.
    #[cfg_attr(
        not(any(test, debug_assertions)),
        expect(dead_code, reason = "Only used by debug validation.")
    )]
    pub(crate) fn free_len(&self) -> usize {
        let mut n = 0;
        let mut cursor = self.free_head;
        while let Some(idx) = cursor {
            n += 1;
            cursor = match self.nodes[idx.get()].kind {
                Kind::Free { next } => next,
                _ => None,
            };
        }
        n
    }

    /// Active nodes with their indices, in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeIdx, &Node<K, T>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_free())
            .map(|(i, n)| (NodeIdx::new(i), n))
    }
}

impl<K, T: Scalar> Index<NodeIdx> for NodePool<K, T> {
    type Output = Node<K, T>;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.nodes[idx.get()]
    }
}

impl<K, T: Scalar> IndexMut<NodeIdx> for NodePool<K, T> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[idx.get()]
    }
}
