// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Broadphase: kurbo-native broad-phase collision candidates over a dynamic AABB tree.
//!
//! - Bodies are keyed by any hashable entity handle and positioned with [`kurbo::Rect`].
//! - [`CollisionLayers`] membership and masks filter candidates before they reach the caller.
//! - Movement goes through [`Broadphase::set_rect`], [`Broadphase::translate`], or
//!   [`Broadphase::set_origin`]; small moves stay inside the fattened box and cost nothing.
//!
//! Only candidate overlaps are reported. Exact shape tests belong to the caller.
//!
//! ## API overview
//!
//! - [`Broadphase`]: container of bodies and their filters.
//! - [`Body`]: layer membership and collision mask.
//! - [`BroadphaseConfig`]: tree settings plus the maintenance threshold.
//!
//! Key operations:
//! - [`Broadphase::candidates`] and [`Broadphase::candidate_pairs`].
//! - [`Broadphase::hit_point`] for picking against exact rectangles.
//! - [`Broadphase::maintain`] rebuilds the tree once it has degraded.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use thicket_broadphase::{Body, Broadphase, CollisionLayers};
//!
//! let mut bp: Broadphase<u32> = Broadphase::new();
//! let player = Body::new(CollisionLayers::PLAYER, CollisionLayers::all());
//! let wall = Body::new(CollisionLayers::WORLD, CollisionLayers::PLAYER);
//!
//! bp.insert(1, Rect::new(0.0, 0.0, 10.0, 10.0), player).unwrap();
//! bp.insert(2, Rect::new(30.0, 0.0, 40.0, 100.0), wall).unwrap();
//! bp.insert(3, Rect::new(50.0, 0.0, 60.0, 100.0), wall).unwrap();
//!
//! let mut hits = Vec::new();
//! bp.candidates(&1, &mut hits).unwrap();
//! assert!(hits.is_empty());
//!
//! // Walk into the first wall.
//! bp.translate(&1, Vec2::new(25.0, 0.0)).unwrap();
//! bp.candidates(&1, &mut hits).unwrap();
//! assert_eq!(hits, [2]);
//!
//! bp.maintain();
//! ```

extern crate alloc;

mod broadphase;
mod types;

pub use broadphase::Broadphase;
pub use thicket_tree::{TreeConfig, TreeError, TreeResult};
pub use types::{Body, BroadphaseConfig, CollisionLayers, DEFAULT_MAX_SURFACE_AREA_RATIO};
