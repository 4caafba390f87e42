//! # seatline-index
//!
//! Ordered index of active reservations.
//!
//! [`OrderedIndex`] is a red-black tree keyed by holder with the assigned
//! seat as payload. Nodes live in an arena and link to each other by index;
//! slot 0 is a permanently black sentinel standing in for every nil leaf, so
//! the rotation and fix-up code never has to special-case a missing child.
//!
//! # Invariants
//!
//! - The root is black
//! - A red node never has a red child
//! - Every root-to-leaf path crosses the same number of black nodes
//! - In-order traversal yields strictly ascending keys
//!
//! All operations keyed on a single entry are O(log n); full traversal is O(n).

mod error;
mod tree;

pub use error::InvariantViolation;
pub use tree::{Iter, OrderedIndex};
