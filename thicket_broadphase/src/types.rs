// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the broadphase: collision layers, per-body filters, and settings.

use kurbo::Rect;
use thicket_tree::{Aabb2D, TreeConfig};

bitflags::bitflags! {
    /// Collision layers a body belongs to or collides with.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Static level geometry.
        const WORLD      = 0b0000_0001;
        /// Player-controlled bodies.
        const PLAYER     = 0b0000_0010;
        /// Non-player actors.
        const ENEMY      = 0b0000_0100;
        /// Short-lived bodies such as bullets.
        const PROJECTILE = 0b0000_1000;
        /// Trigger volumes that only report overlaps.
        const SENSOR     = 0b0001_0000;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

/// Layer membership and collision mask of a body.
///
/// Two bodies are candidates only if each one's mask includes a layer of the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Body {
    /// Layers this body belongs to.
    pub layers: CollisionLayers,
    /// Layers this body collides with.
    pub mask: CollisionLayers,
}

impl Body {
    /// A body on `layers` that collides with everything in `mask`.
    pub const fn new(layers: CollisionLayers, mask: CollisionLayers) -> Self {
        Self { layers, mask }
    }

    /// Whether the two bodies accept each other.
    pub fn interacts_with(&self, other: &Self) -> bool {
        self.mask.intersects(other.layers) && other.mask.intersects(self.layers)
    }
}

/// Default surface-area ratio above which [`Broadphase::maintain`](crate::Broadphase::maintain) rebuilds.
pub const DEFAULT_MAX_SURFACE_AREA_RATIO: f64 = 16.0;

/// Settings for a [`Broadphase`](crate::Broadphase).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BroadphaseConfig {
    /// Settings of the underlying tree.
    pub tree: TreeConfig<f64>,
    /// Threshold used by [`Broadphase::maintain`](crate::Broadphase::maintain).
    pub max_surface_area_ratio: f64,
}

impl Default for BroadphaseConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            max_surface_area_ratio: DEFAULT_MAX_SURFACE_AREA_RATIO,
        }
    }
}

impl BroadphaseConfig {
    /// Replace the tree settings.
    #[must_use]
    pub fn with_tree(mut self, tree: TreeConfig<f64>) -> Self {
        self.tree = tree;
        self
    }

    /// Rebuild during maintenance once the surface-area ratio passes `ratio`.
    #[must_use]
    pub fn with_max_surface_area_ratio(mut self, ratio: f64) -> Self {
        self.max_surface_area_ratio = ratio;
        self
    }
}

pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    let r = r.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn aabb_to_rect(a: Aabb2D<f64>) -> Rect {
    Rect::new(a.min_x, a.min_y, a.max_x, a.max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_filter_both_ways() {
        let player = Body::new(
            CollisionLayers::PLAYER,
            CollisionLayers::WORLD | CollisionLayers::ENEMY,
        );
        let enemy = Body::new(CollisionLayers::ENEMY, CollisionLayers::all());
        let bullet = Body::new(CollisionLayers::PROJECTILE, CollisionLayers::ENEMY);
        assert!(player.interacts_with(&enemy));
        assert!(enemy.interacts_with(&bullet));
        // Neither mask covers the other body's layer.
        assert!(!player.interacts_with(&bullet));
        assert!(Body::default().interacts_with(&Body::default()));
    }

    #[test]
    fn rects_are_normalized() {
        let a = rect_to_aabb(Rect::new(10.0, 20.0, 0.0, 5.0));
        assert_eq!(a, Aabb2D::new(0.0, 5.0, 10.0, 20.0));
        assert_eq!(aabb_to_rect(a), Rect::new(0.0, 5.0, 10.0, 20.0));
    }
}
