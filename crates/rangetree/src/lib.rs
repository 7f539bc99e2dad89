//! rangetree is a small library of array-backed range-query trees
//!
//! The centrepiece is [LazySegmentTree], a sum segment tree with lazy propagation that
//! supports both range-add ([LazySegmentTree::update]) and range-assign
//! ([LazySegmentTree::assign]) in `O(log n)` together with range-sum queries.
//!
//! [SegmentTree] is the simpler sibling: point updates and range queries over any
//! [Aggregator] (e.g., SUM, MIN, MAX).
//!
//! ## Example
//!
//! ```
//! use rangetree::{aggregator::sum::I64SumAggregator, LazySegmentTree};
//!
//! let mut tree: LazySegmentTree<I64SumAggregator> =
//!     LazySegmentTree::new(vec![5, 8, 6, 3, 2, 7, 2, 6]).unwrap();
//! assert_eq!(tree.query(1, 7), Ok(34));
//! tree.update(1, 7, 2).unwrap();
//! assert_eq!(tree.query(1, 7), Ok(48));
//! tree.assign(1, 7, 2).unwrap();
//! assert_eq!(tree.query(1, 7), Ok(14));
//! assert_eq!(tree.query(0, 1), Ok(7));
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(nonstandard_style, missing_docs)]
#![forbid(unsafe_code)]

extern crate alloc;

use core::{fmt, fmt::Display};

#[macro_use]
mod macros;

/// Numeric aggregation interface the trees are generic over
///
/// Contains pre-defined SUM, MIN, and MAX aggregators for the primitive number types.
pub mod aggregator;
/// Lock-wrapped tree handle for shared access
pub mod shared;
/// Range-query trees
pub mod tree;

/// Per-operation latency and work profiles recorded with the `profiler` feature
#[cfg(feature = "profiler")]
pub mod stats;

pub use aggregator::{Aggregator, RangeSumAggregator};
pub use shared::SharedTree;
pub use tree::{
    lazy::{LazySegmentTree, PendingOp},
    point::SegmentTree,
};

/// Error variants returned by the trees when a caller breaks a precondition
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A tree was built from zero elements
    EmptyInput,
    /// The inclusive range `[left, right]` is reversed or reaches past the last element
    InvalidRange {
        /// Left bound given by the caller
        left: usize,
        /// Right bound given by the caller
        right: usize,
        /// Number of elements in the tree
        len: usize,
    },
    /// A point operation addressed an index past the last element
    OutOfBounds {
        /// Index given by the caller
        index: usize,
        /// Number of elements in the tree
        len: usize,
    },
    /// A deserialized tree does not have the width and node count its length requires
    InvalidLayout {
        /// Number of elements
        len: usize,
        /// Stored width of the tree
        size: usize,
        /// Stored number of node slots
        nodes: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "cannot build a tree from an empty input"),
            Error::InvalidRange { left, right, len } => {
                write!(
                    f,
                    "invalid range [{left}, {right}] for tree of length {len}"
                )
            }
            Error::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for tree of length {len}")
            }
            Error::InvalidLayout { len, size, nodes } => {
                write!(
                    f,
                    "tree of length {len} cannot have width {size} and {nodes} node slots"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Returns `true` if the error represents [Error::EmptyInput]
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
    /// Returns `true` if the error represents [Error::InvalidRange]
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Error::InvalidRange { .. })
    }
    /// Returns `true` if the error represents [Error::OutOfBounds]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::OutOfBounds { .. })
    }
    /// Returns `true` if the error represents [Error::InvalidLayout]
    pub fn is_invalid_layout(&self) -> bool {
        matches!(self, Error::InvalidLayout { .. })
    }
}

/// Validates the inclusive range `[left, right]` against a tree of `len` elements
#[inline]
pub(crate) fn check_range(left: usize, right: usize, len: usize) -> Result<(), Error> {
    if left > right || right >= len {
        log::warn!("rejected range [{left}, {right}] for length {len}");
        return Err(Error::InvalidRange { left, right, len });
    }
    Ok(())
}

/// Validates a single index against a tree of `len` elements
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Error> {
    if index >= len {
        log::warn!("rejected index {index} for length {len}");
        return Err(Error::OutOfBounds { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks() {
        assert!(check_range(0, 0, 1).is_ok());
        assert!(check_range(2, 7, 8).is_ok());
        assert_eq!(
            check_range(3, 2, 8),
            Err(Error::InvalidRange {
                left: 3,
                right: 2,
                len: 8
            })
        );
        assert!(check_range(0, 8, 8).unwrap_err().is_invalid_range());
        assert!(check_index(8, 8).unwrap_err().is_out_of_bounds());
        assert!(check_index(7, 8).is_ok());
    }

    #[test]
    fn error_display() {
        let err = Error::InvalidRange {
            left: 4,
            right: 1,
            len: 3,
        };
        assert_eq!(
            alloc::format!("{err}"),
            "invalid range [4, 1] for tree of length 3"
        );
        assert!(Error::EmptyInput.is_empty_input());
        let err = Error::InvalidLayout {
            len: 5,
            size: 8,
            nodes: 2,
        };
        assert!(err.is_invalid_layout());
        assert_eq!(
            alloc::format!("{err}"),
            "tree of length 5 cannot have width 8 and 2 node slots"
        );
    }
}
