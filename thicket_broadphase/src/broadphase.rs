// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broadphase container: the dynamic tree plus per-body collision filters.

use alloc::vec::Vec;
use core::hash::Hash;

use fxhash::FxHashMap;
use kurbo::{Point, Rect, Vec2};
use log::debug;
use thicket_tree::{Aabb2D, DynamicTree, TreeResult};

use crate::types::{Body, BroadphaseConfig, CollisionLayers, aabb_to_rect, rect_to_aabb};

/// Candidate-pair generator for bodies keyed by `E`.
///
/// Positions are kurbo rectangles in world space. Queries report candidates
/// whose fattened boxes overlap and whose [`Body`] filters accept each other;
/// exact shape tests are left to the caller.
#[derive(Debug)]
pub struct Broadphase<E> {
    tree: DynamicTree<E, f64>,
    bodies: FxHashMap<E, Body>,
    max_surface_area_ratio: f64,
}

impl<E: Eq + Hash + Clone> Default for Broadphase<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Eq + Hash + Clone> Broadphase<E> {
    /// Create an empty broadphase with default settings.
    pub fn new() -> Self {
        let config = BroadphaseConfig::default();
        Self {
            tree: DynamicTree::new(),
            bodies: FxHashMap::default(),
            max_surface_area_ratio: config.max_surface_area_ratio,
        }
    }

    /// Create an empty broadphase with explicit settings.
    ///
    /// # Errors
    ///
    /// Propagates [`TreeError::InvalidThickness`](thicket_tree::TreeError::InvalidThickness) from the tree settings.
    pub fn with_config(config: BroadphaseConfig) -> TreeResult<Self> {
        Ok(Self {
            tree: DynamicTree::with_config(config.tree)?,
            bodies: FxHashMap::default(),
            max_surface_area_ratio: config.max_surface_area_ratio,
        })
    }

    /// Add `entity` covering `rect`.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`](thicket_tree::TreeError::DuplicateKey) if the entity is already present and
    /// [`TreeError::InvalidBounds`](thicket_tree::TreeError::InvalidBounds) for empty or non-finite rectangles.
    pub fn insert(&mut self, entity: E, rect: Rect, body: Body) -> TreeResult<()> {
        self.tree.insert(entity.clone(), rect_to_aabb(rect))?;
        let _ = self.bodies.insert(entity, body);
        Ok(())
    }

    /// Remove `entity`. Returns `false` if it was not present.
    pub fn remove(&mut self, entity: &E) -> bool {
        let _ = self.bodies.remove(entity);
        self.tree.erase(entity)
    }

    /// Remove every body.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.bodies.clear();
    }

    /// Move `entity` to cover `rect`. Returns `Ok(false)` if it is unknown.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`](thicket_tree::TreeError::InvalidBounds) for empty or non-finite rectangles.
    pub fn set_rect(&mut self, entity: &E, rect: Rect) -> TreeResult<bool> {
        self.tree.update(entity, rect_to_aabb(rect), false)
    }

    /// Shift `entity` by `delta`. Returns `Ok(false)` if it is unknown.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`](thicket_tree::TreeError::InvalidBounds) if the shifted rectangle is not finite.
    pub fn translate(&mut self, entity: &E, delta: Vec2) -> TreeResult<bool> {
        let Some(tight) = self.tree.tight(entity) else {
            return Ok(false);
        };
        self.tree.set_position(
            entity,
            tight.min_x + delta.x,
            tight.min_y + delta.y,
            false,
        )
    }

    /// Move the top-left corner of `entity` to `origin`, keeping its size.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBounds`](thicket_tree::TreeError::InvalidBounds) if the moved rectangle is not finite.
    pub fn set_origin(&mut self, entity: &E, origin: Point) -> TreeResult<bool> {
        self.tree.set_position(entity, origin.x, origin.y, false)
    }

    /// Replace the collision filter of `entity`. Returns `false` if it is unknown.
    pub fn set_body(&mut self, entity: &E, body: Body) -> bool {
        match self.bodies.get_mut(entity) {
            Some(slot) => {
                *slot = body;
                true
            }
            None => false,
        }
    }

    /// Exact rectangle last supplied for `entity`.
    pub fn rect(&self, entity: &E) -> Option<Rect> {
        self.tree.tight(entity).map(aabb_to_rect)
    }

    /// Collision filter of `entity`.
    pub fn body(&self, entity: &E) -> Option<Body> {
        self.bodies.get(entity).copied()
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if there are no bodies.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The underlying tree, for diagnostics.
    pub fn tree(&self) -> &DynamicTree<E, f64> {
        &self.tree
    }

    /// Append to `out` every body that may touch `entity`.
    ///
    /// # Errors
    ///
    /// [`TreeError::QueryStackExhausted`](thicket_tree::TreeError::QueryStackExhausted) if the tree outgrew its query stack.
    pub fn candidates(&self, entity: &E, out: &mut Vec<E>) -> TreeResult<()> {
        let Some(body) = self.bodies.get(entity) else {
            return Ok(());
        };
        self.tree.query(entity, |other| {
            if self.accepts(body, other) {
                out.push(other.clone());
            }
        })
    }

    /// Append every pair of bodies that may touch. Each pair appears once.
    ///
    /// # Errors
    ///
    /// [`TreeError::QueryStackExhausted`](thicket_tree::TreeError::QueryStackExhausted) if the tree outgrew its query stack.
    pub fn candidate_pairs(&self, out: &mut Vec<(E, E)>) -> TreeResult<()> {
        self.tree.query_pairs(|a, b| {
            if let Some(body) = self.bodies.get(a)
                && self.accepts(body, b)
            {
                out.push((a.clone(), b.clone()));
            }
        })
    }

    /// Append every body on one of `layers` whose exact rectangle contains `pt`.
    ///
    /// # Errors
    ///
    /// [`TreeError::QueryStackExhausted`](thicket_tree::TreeError::QueryStackExhausted) if the tree outgrew its query stack.
    pub fn hit_point(&self, pt: Point, layers: CollisionLayers, out: &mut Vec<E>) -> TreeResult<()> {
        let probe = Aabb2D::new(pt.x, pt.y, pt.x, pt.y);
        self.tree.query_aabb(probe, |entity| {
            let on_layer = self
                .bodies
                .get(entity)
                .is_some_and(|b| b.layers.intersects(layers));
            let inside = self
                .tree
                .tight(entity)
                .is_some_and(|t| aabb_to_rect(t).contains(pt));
            if on_layer && inside {
                out.push(entity.clone());
            }
        })
    }

    /// Rebuild the tree if its surface-area ratio passed the configured
    /// threshold. Returns whether a rebuild happened.
    pub fn maintain(&mut self) -> bool {
        let rebuilt = self.tree.rebuild_if_degraded(self.max_surface_area_ratio);
        if rebuilt {
            debug!(
                "broadphase rebuilt {} bodies, height now {}",
                self.tree.len(),
                self.tree.height()
            );
        }
        rebuilt
    }

    fn accepts(&self, body: &Body, other: &E) -> bool {
        self.bodies
            .get(other)
            .is_some_and(|o| body.interacts_with(o))
    }
}
