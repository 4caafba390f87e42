//! Structured results of allocator operations.
//!
//! Each type's `Display` renders the text lines written by the command
//! runner; multi-line outcomes separate lines with `\n` and carry no trailing
//! newline.

use std::fmt;

use serde::Serialize;

use seatline_id::{Arrival, HolderId, Priority, SeatId};

/// An active reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub seat: SeatId,
    pub holder: HolderId,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seat {}, User {}", self.seat, self.holder)
    }
}

/// A waitlisted holder moved onto a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Promotion {
    pub holder: HolderId,
    pub seat: SeatId,
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {} reserved seat {}", self.holder, self.seat)
    }
}

/// A pending waitlist entry, as reported by [`SeatAllocator::waitlist`](crate::SeatAllocator::waitlist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitlistedRequest {
    pub holder: HolderId,
    pub priority: Priority,
    pub arrival: Arrival,
}

/// Result of `initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Initialized {
    pub seats: u64,
}

impl fmt::Display for Initialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Seats are made available for reservation", self.seats)
    }
}

/// Snapshot of pool and queue sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub free_seats: u64,
    pub waitlisted: usize,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Seats Available : {}, Waitlist : {}",
            self.free_seats, self.waitlisted
        )
    }
}

/// Result of `reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Reservation {
    /// A seat was free and is now held.
    Assigned { holder: HolderId, seat: SeatId },

    /// The pool was empty; the holder joined the waitlist.
    Waitlisted { holder: HolderId, arrival: Arrival },
}

impl Reservation {
    /// The seat assigned, if any.
    pub fn seat(&self) -> Option<SeatId> {
        match self {
            Reservation::Assigned { seat, .. } => Some(*seat),
            Reservation::Waitlisted { .. } => None,
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reservation::Assigned { holder, seat } => {
                write!(f, "User {holder} reserved seat {seat}")
            }
            Reservation::Waitlisted { holder, .. } => {
                write!(f, "User {holder} is added to the waiting list")
            }
        }
    }
}

/// Result of `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Cancellation {
    /// The reservation was dropped; the seat went to `promoted` or back to the pool.
    Cancelled {
        holder: HolderId,
        seat: SeatId,
        promoted: Option<Promotion>,
    },

    /// The holder does not hold that seat. Nothing changed.
    NoMatch { holder: HolderId, seat: SeatId },
}

impl fmt::Display for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cancellation::Cancelled {
                holder, promoted, ..
            } => {
                write!(f, "User {holder} canceled their reservation")?;
                if let Some(promotion) = promoted {
                    write!(f, "\n{promotion}")?;
                }
                Ok(())
            }
            Cancellation::NoMatch { holder, seat } => {
                write!(f, "User {holder} has no reservation for seat {seat} to cancel")
            }
        }
    }
}

/// Result of `exit_waitlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WaitlistExit {
    Removed { holder: HolderId },
    NotWaitlisted { holder: HolderId },
}

impl fmt::Display for WaitlistExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistExit::Removed { holder } => {
                write!(f, "User {holder} is removed from the waiting list")
            }
            WaitlistExit::NotWaitlisted { holder } => {
                write!(f, "User {holder} is not in waitlist")
            }
        }
    }
}

/// Result of `update_priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PriorityUpdate {
    Updated {
        holder: HolderId,
        previous: Priority,
        priority: Priority,
    },
    NotWaitlisted {
        holder: HolderId,
    },
}

impl fmt::Display for PriorityUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityUpdate::Updated {
                holder, priority, ..
            } => write!(f, "User {holder} priority has been updated to {priority}"),
            PriorityUpdate::NotWaitlisted { holder } => {
                write!(f, "User {holder} priority is not updated")
            }
        }
    }
}

/// Result of `add_seats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub added: u64,
    pub first_seat: SeatId,
    /// Promotions in processing order (best waitlist entry first).
    pub promotions: Vec<Promotion>,
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Additional {} Seats are made available for reservation",
            self.added
        )?;
        for promotion in &self.promotions {
            write!(f, "\n{promotion}")?;
        }
        Ok(())
    }
}

/// Result of `release_range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeRelease {
    pub lo: HolderId,
    pub hi: HolderId,
    /// Seats freed by the release, ascending.
    pub released: Vec<SeatId>,
    /// Waitlisted holders in range that were dropped, ascending.
    pub dropped: Vec<HolderId>,
    pub promotions: Vec<Promotion>,
}

impl fmt::Display for RangeRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.released.is_empty() {
            return write!(
                f,
                "Reservations/waitlist of the users in the range [{}, {}] have been released",
                self.lo, self.hi
            );
        }

        write!(
            f,
            "Reservations of the Users in the range [{}, {}] are released",
            self.lo, self.hi
        )?;
        for promotion in &self.promotions {
            write!(f, "\n{promotion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(id: i64) -> HolderId {
        HolderId::new(id)
    }

    fn seat(id: u64) -> SeatId {
        SeatId::new(id)
    }

    #[test]
    fn test_cancel_with_promotion_renders_two_lines() {
        let outcome = Cancellation::Cancelled {
            holder: holder(4),
            seat: seat(2),
            promoted: Some(Promotion {
                holder: holder(9),
                seat: seat(2),
            }),
        };
        assert_eq!(
            outcome.to_string(),
            "User 4 canceled their reservation\nUser 9 reserved seat 2"
        );
    }

    #[test]
    fn test_range_release_variants() {
        let empty = RangeRelease {
            lo: holder(1),
            hi: holder(5),
            released: vec![],
            dropped: vec![holder(3)],
            promotions: vec![],
        };
        assert_eq!(
            empty.to_string(),
            "Reservations/waitlist of the users in the range [1, 5] have been released"
        );

        let freed = RangeRelease {
            released: vec![seat(1)],
            ..empty
        };
        assert_eq!(
            freed.to_string(),
            "Reservations of the Users in the range [1, 5] are released"
        );
    }

    #[test]
    fn test_reservation_json_is_tagged() {
        let json = serde_json::to_value(Reservation::Waitlisted {
            holder: holder(3),
            arrival: Arrival::new(2),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "waitlisted", "holder": 3, "arrival": 2})
        );
    }
}
