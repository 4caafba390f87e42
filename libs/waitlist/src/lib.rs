//! # seatline-waitlist
//!
//! Priority queue of pending requests.
//!
//! [`IndexedHeap`] is an array-backed binary max-heap that also tracks where
//! every key sits in the array. Besides the usual push/pop it can remove or
//! re-prioritise an arbitrary member in O(log n).
//!
//! ## Ordering
//!
//! Entries are ranked by priority (higher first) and then by sequence number
//! (lower, i.e. earlier, first). Changing an entry's priority keeps its
//! sequence number, so an updated entry that ties with an older one still
//! yields to it. Sequence numbers are supplied by the caller and are expected
//! to be unique, which makes the ordering total and pop order independent of
//! the array layout.

mod error;
mod heap;

pub use error::WaitlistError;
pub use heap::{Entry, IndexedHeap};
