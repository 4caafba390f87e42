//! # seatline-allocator
//!
//! First-come seat allocation with a priority waitlist.
//!
//! [`SeatAllocator`] owns three structures:
//!
//! - a free pool of unassigned seats (smallest id handed out first)
//! - an [`OrderedIndex`](seatline_index::OrderedIndex) of active reservations
//!   keyed by holder
//! - an [`IndexedHeap`](seatline_waitlist::IndexedHeap) of waitlisted holders
//!   ordered by priority, then arrival
//!
//! and moves holders and seats between them as requests come in.
//!
//! # Invariants
//!
//! - Every seat ever created is either free or reserved, never both
//! - A holder is reserved, waitlisted, or neither; never both
//! - Whenever a seat is assigned it is the smallest eligible id
//! - A failed operation leaves the state untouched
//!
//! Operations return structured outcomes; each outcome's `Display` renders the
//! line-oriented text used by the command runner.

mod allocator;
mod error;
mod outcome;
mod pool;

pub use allocator::SeatAllocator;
pub use error::AllocError;
pub use outcome::*;

pub use seatline_id::{Arrival, HolderId, Priority, SeatId};
