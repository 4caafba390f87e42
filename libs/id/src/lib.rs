//! # seatline-id
//!
//! Typed identifiers for the seat allocator.
//!
//! ## Design Principles
//!
//! - Holders, seats and priorities are plain integers on the wire but distinct
//!   types in code, so a seat can never be passed where a holder is expected
//! - Every type has a strict `FromStr` that trims surrounding whitespace and
//!   rejects anything that is not a single integer
//! - Serialization is transparent (the bare integer)
//!
//! ## Value Ranges
//!
//! - `HolderId`: any `i64` (holder ids are opaque to the allocator)
//! - `SeatId`: `u64`, seat numbering starts at 1
//! - `Priority`: any `i64`, larger is more urgent

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
