//! Error types for allocator operations.

use seatline_id::HolderId;
use thiserror::Error;

/// Errors that reject an allocator operation before it changes any state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// Seat count for initialize or expansion is not positive.
    #[error("Invalid input. Please provide a valid number of seats.")]
    InvalidSeatCount { count: i64 },

    /// Holder range has its bounds reversed.
    #[error("Invalid input. Please provide a valid range of users.")]
    InvalidRange { lo: HolderId, hi: HolderId },

    /// The holder already has a seat or a waitlist entry.
    #[error("User {holder} already has a reservation or is on the waiting list")]
    HolderAlreadyActive { holder: HolderId },

    /// Adding seats would push seat ids past `u64::MAX`.
    #[error("seat id space exhausted")]
    SeatSpaceExhausted,
}
