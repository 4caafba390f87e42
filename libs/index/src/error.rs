//! Structural invariant violations reported by the tree validator.

use thiserror::Error;

/// A broken red-black or search-tree invariant.
///
/// Only produced by [`OrderedIndex::check_invariants`](crate::OrderedIndex::check_invariants);
/// seeing one means the tree itself is corrupt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,

    /// The nil sentinel was recoloured red.
    #[error("nil sentinel is red")]
    RedSentinel,

    /// A red node has a red child.
    #[error("red node has a red child")]
    RedRed,

    /// Two paths from the same node cross a different number of black nodes.
    #[error("black height mismatch: left {left}, right {right}")]
    BlackHeight { left: usize, right: usize },

    /// In-order traversal is not strictly ascending.
    #[error("keys out of order")]
    KeyOrder,

    /// A child does not point back at its parent.
    #[error("child does not link back to its parent")]
    ParentLink,

    /// The recorded length disagrees with the reachable node count.
    #[error("length mismatch: recorded {recorded}, reachable {reachable}")]
    Length { recorded: usize, reachable: usize },
}
