// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by tree operations.

use thiserror::Error;

/// Errors reported by [`DynamicTree`](crate::DynamicTree) operations.
///
/// Every error is raised before the tree is modified.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TreeError {
    /// The key passed to `insert` is already stored in the tree.
    #[error("key is already present in the tree")]
    DuplicateKey,
    /// The key passed to a throwing accessor is not stored in the tree.
    #[error("key is not present in the tree")]
    KeyNotFound,
    /// A leaf box is degenerate, inverted, or not finite.
    #[error(
        "bounds must be finite with min < max on both axes (min_x: {min_x}, min_y: {min_y}, max_x: {max_x}, max_y: {max_y})"
    )]
    InvalidBounds {
        /// Offending minimum x.
        min_x: f64,
        /// Offending minimum y.
        min_y: f64,
        /// Offending maximum x.
        max_x: f64,
        /// Offending maximum y.
        max_y: f64,
    },
    /// The configured thickness factor is not a positive finite number.
    #[error("thickness factor must be finite and positive (thickness: {thickness})")]
    InvalidThickness {
        /// Offending thickness factor.
        thickness: f64,
    },
    /// A query needed more traversal slots than its stack provides.
    #[error("query stack exhausted at capacity {capacity}; size the stack for the tree height")]
    QueryStackExhausted {
        /// Capacity of the exhausted stack.
        capacity: usize,
    },
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = TreeError::QueryStackExhausted { capacity: 4 };
        assert!(e.to_string().contains("capacity 4"));
        let e = TreeError::InvalidThickness { thickness: -1.0 };
        assert!(e.to_string().contains("-1"));
    }
}
