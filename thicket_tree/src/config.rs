// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time tree settings.

use crate::error::{TreeError, TreeResult};
use crate::types::Scalar;

/// Default fraction of a leaf's extent added on each side when fattening.
pub const DEFAULT_THICKNESS: f64 = 0.05;

/// Default number of node slots allocated up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default bound on the query traversal stack.
///
/// A query needs at most `height + 1` slots, so this covers any tree whose
/// height stays below 255.
pub const DEFAULT_QUERY_STACK_CAPACITY: usize = 256;

/// Settings for a [`DynamicTree`](crate::DynamicTree).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeConfig<T> {
    /// Fattening factor for leaf boxes; `None` stores exact boxes.
    pub thickness: Option<T>,
    /// Whether boxes that only share a boundary count as overlapping.
    pub touch_is_overlap: bool,
    /// Node slots reserved at construction.
    pub initial_capacity: usize,
    /// Fixed capacity of the reusable query stack.
    pub query_stack_capacity: usize,
}

impl<T: Scalar> Default for TreeConfig<T> {
    fn default() -> Self {
        Self {
            thickness: Some(T::from_f64(DEFAULT_THICKNESS)),
            touch_is_overlap: true,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            query_stack_capacity: DEFAULT_QUERY_STACK_CAPACITY,
        }
    }
}

impl<T: Scalar> TreeConfig<T> {
    /// Fatten leaves by `thickness` times their extent on each axis.
    #[must_use]
    pub fn with_thickness(mut self, thickness: T) -> Self {
        self.thickness = Some(thickness);
        self
    }

    /// Store exact leaf boxes; every movement then reinserts.
    #[must_use]
    pub fn without_thickness(mut self) -> Self {
        self.thickness = None;
        self
    }

    /// Set whether touching boxes overlap.
    #[must_use]
    pub fn with_touch_is_overlap(mut self, touch_is_overlap: bool) -> Self {
        self.touch_is_overlap = touch_is_overlap;
        self
    }

    /// Reserve `capacity` node slots at construction.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Bound the query traversal stack to `capacity` entries.
    #[must_use]
    pub fn with_query_stack_capacity(mut self, capacity: usize) -> Self {
        self.query_stack_capacity = capacity;
        self
    }

    pub(crate) fn validate(&self) -> TreeResult<()> {
        if let Some(t) = self.thickness
            && !(T::is_finite(t) && t > T::zero())
        {
            return Err(TreeError::InvalidThickness {
                thickness: T::to_f64(t),
            });
        }
        Ok(())
    }
}
