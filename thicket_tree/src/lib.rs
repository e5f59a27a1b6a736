// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Tree: a dynamic bounding-volume tree for 2D broad-phase collision detection.
//!
//! - Insert, move, and erase axis-aligned bounding boxes (AABBs) keyed by any hashable key.
//! - Leaves store a fattened copy of each box, so small movements are free.
//! - Internal nodes are kept height balanced with rotations; insertion picks the
//!   sibling with the lowest surface-area cost.
//! - Overlap queries walk a fixed-capacity, reusable stack and never allocate.
//!
//! It is generic over the scalar type `T` (`f32` or `f64`) and does not depend on
//! any geometry crate. Area heuristics use a widened accumulator (f32→f64).
//!
//! # Example
//!
//! ```rust
//! use thicket_tree::{Aabb2D, DynamicTree, TreeConfig};
//!
//! // Store exact boxes so the overlaps below are easy to reason about.
//! let mut tree: DynamicTree<u32> =
//!     DynamicTree::with_config(TreeConfig::default().without_thickness()).unwrap();
//! tree.insert(1, Aabb2D::new(10.0, 10.0, 110.0, 110.0)).unwrap();
//! tree.insert(2, Aabb2D::new(90.0, 10.0, 160.0, 60.0)).unwrap();
//! tree.insert(3, Aabb2D::new(10.0, 90.0, 35.0, 115.0)).unwrap();
//! tree.insert(4, Aabb2D::new(1000.0, 1000.0, 1100.0, 1100.0)).unwrap();
//!
//! let mut hits = Vec::new();
//! tree.query_into(&1, &mut hits).unwrap();
//! hits.sort();
//! assert_eq!(hits, [2, 3]);
//!
//! // Move the far box next to the first one.
//! tree.set_position(&4, 100.0, 100.0, false).unwrap();
//! hits.clear();
//! tree.query_into(&1, &mut hits).unwrap();
//! assert_eq!(hits.len(), 3);
//! ```
//!
//! Callbacks can stop a query early by returning `true` or
//! [`ControlFlow::Break`](core::ops::ControlFlow::Break):
//!
//! ```rust
//! use thicket_tree::{Aabb2D, DynamicTree};
//!
//! let mut tree: DynamicTree<&str> = DynamicTree::new();
//! tree.insert("a", Aabb2D::new(0.0, 0.0, 10.0, 10.0)).unwrap();
//! tree.insert("b", Aabb2D::new(5.0, 5.0, 15.0, 15.0)).unwrap();
//! tree.insert("c", Aabb2D::new(6.0, 6.0, 16.0, 16.0)).unwrap();
//!
//! let mut first = None;
//! tree.query(&"a", |k| {
//!     first = Some(*k);
//!     true
//! })
//! .unwrap();
//! assert!(first.is_some());
//! ```
//!
//! ## Tuning
//!
//! - `thickness`: larger factors mean fewer reinsertions for moving objects but
//!   more false positives in queries. `None` stores exact boxes.
//! - `query_stack_capacity`: a query needs `height + 1` slots. Queries on
//!   deeper trees fail with [`TreeError::QueryStackExhausted`] rather than
//!   truncate their results.
//! - [`DynamicTree::rebuild_if_degraded`] rebuilds the hierarchy when
//!   [`DynamicTree::surface_area_ratio`] grows past a threshold. Rebuilds are
//!   quadratic in the leaf count.
//!
//! ### Float semantics
//!
//! Boxes with NaN or infinite coordinates, or with `min >= max` on either axis,
//! are rejected at insertion and update.

extern crate alloc;

mod config;
mod diagnostics;
mod error;
mod pool;
mod query;
mod rebuild;
mod tree;
mod types;

pub use config::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_QUERY_STACK_CAPACITY, DEFAULT_THICKNESS, TreeConfig,
};
pub use error::{TreeError, TreeResult};
pub use query::{QueryFlow, QueryStack};
pub use rebuild::REBUILD_WARN_LEAVES;
pub use tree::DynamicTree;
pub use types::{Aabb2D, Scalar, ScalarAcc, surface_area};
