//! The seat allocation engine.

use std::ops::RangeInclusive;

use seatline_id::{Arrival, HolderId, Priority, SeatId};
use seatline_index::OrderedIndex;
use seatline_waitlist::{Entry, IndexedHeap};
use tracing::{debug, info, instrument, warn};

use crate::pool::SeatPool;
use crate::{
    AllocError, Availability, Booking, Cancellation, Expansion, Initialized, PriorityUpdate,
    Promotion, RangeRelease, Reservation, WaitlistExit, WaitlistedRequest,
};

/// Seat allocator state.
///
/// Constructed empty: until [`initialize`](Self::initialize) is called there
/// are no seats and every reservation lands on the waitlist.
#[derive(Debug, Clone, Default)]
pub struct SeatAllocator {
    /// Unassigned seats.
    free: SeatPool,

    /// Active reservations, holder -> seat.
    reserved: OrderedIndex<HolderId, SeatId>,

    /// Holders waiting for a seat.
    waitlist: IndexedHeap<HolderId, Priority>,

    /// Last arrival sequence handed out. Never reset.
    arrivals: Arrival,
}

fn positive_count(count: i64) -> Result<u64, AllocError> {
    u64::try_from(count)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(AllocError::InvalidSeatCount { count })
}

impl SeatAllocator {
    /// Create an allocator with no seats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the pool to seats `1..=count`.
    ///
    /// Drops every reservation and waitlist entry. The arrival counter keeps
    /// running so sequence numbers are never reused.
    pub fn initialize(&mut self, count: i64) -> Result<Initialized, AllocError> {
        let seats = positive_count(count).inspect_err(|_| {
            warn!(count, "rejected initialize with non-positive seat count");
        })?;

        self.free.reset(seats);
        self.reserved.clear();
        self.waitlist.clear();

        info!(seats, "seat pool initialized");
        Ok(Initialized { seats })
    }

    /// Free seat count and waitlist length.
    pub fn availability(&self) -> Availability {
        Availability {
            free_seats: self.free.len(),
            waitlisted: self.waitlist.len(),
        }
    }

    /// Give `holder` the smallest free seat, or waitlist them if none is free.
    pub fn reserve(
        &mut self,
        holder: HolderId,
        priority: Priority,
    ) -> Result<Reservation, AllocError> {
        if self.reserved.contains_key(&holder) || self.waitlist.contains(&holder) {
            warn!(holder = %holder, "rejected reserve for already active holder");
            return Err(AllocError::HolderAlreadyActive { holder });
        }

        if let Some(seat) = self.free.pop_first() {
            self.reserved.insert(holder, seat);
            debug!(holder = %holder, seat = %seat, "seat reserved");
            return Ok(Reservation::Assigned { holder, seat });
        }

        let arrival = self.arrivals.next();
        self.waitlist
            .push(holder, priority, arrival.value())
            .map_err(|_| AllocError::HolderAlreadyActive { holder })?;
        self.arrivals = arrival;

        debug!(
            holder = %holder,
            priority = %priority,
            arrival = %arrival,
            "holder waitlisted"
        );
        Ok(Reservation::Waitlisted { holder, arrival })
    }

    /// Cancel `holder`'s reservation of `seat`.
    ///
    /// The freed seat goes straight to the best waitlisted holder if there is
    /// one, otherwise back to the pool.
    pub fn cancel(&mut self, seat: SeatId, holder: HolderId) -> Cancellation {
        if self.reserved.get(&holder) != Some(&seat) {
            debug!(holder = %holder, seat = %seat, "no matching reservation to cancel");
            return Cancellation::NoMatch { holder, seat };
        }

        self.reserved.remove(&holder);
        debug!(holder = %holder, seat = %seat, "reservation canceled");

        let promoted = match self.waitlist.pop() {
            Some(entry) => Some(self.promote(entry, seat)),
            None => {
                self.free.insert(seat);
                None
            }
        };

        Cancellation::Cancelled {
            holder,
            seat,
            promoted,
        }
    }

    /// Take `holder` off the waitlist.
    pub fn exit_waitlist(&mut self, holder: HolderId) -> WaitlistExit {
        match self.waitlist.remove(&holder) {
            Some(_) => {
                debug!(holder = %holder, "holder left the waitlist");
                WaitlistExit::Removed { holder }
            }
            None => WaitlistExit::NotWaitlisted { holder },
        }
    }

    /// Change a waitlisted holder's priority, keeping their arrival order.
    pub fn update_priority(&mut self, holder: HolderId, priority: Priority) -> PriorityUpdate {
        match self.waitlist.update_priority(&holder, priority) {
            Some(previous) => {
                debug!(
                    holder = %holder,
                    previous = %previous,
                    priority = %priority,
                    "waitlist priority updated"
                );
                PriorityUpdate::Updated {
                    holder,
                    previous,
                    priority,
                }
            }
            None => PriorityUpdate::NotWaitlisted { holder },
        }
    }

    /// Append `count` seats after the highest existing seat id.
    ///
    /// The waitlist is served in priority order, each promoted holder taking
    /// the smallest new seat left; unclaimed new seats join the pool.
    #[instrument(skip(self), level = "debug")]
    pub fn add_seats(&mut self, count: i64) -> Result<Expansion, AllocError> {
        let added = positive_count(count).inspect_err(|_| {
            warn!(count, "rejected add_seats with non-positive seat count");
        })?;

        let first_seat = match self.highest_seat() {
            Some(highest) => highest.checked_add(1),
            None => Some(SeatId::FIRST),
        }
        .ok_or(AllocError::SeatSpaceExhausted)?;
        let last_seat = first_seat
            .checked_add(added - 1)
            .ok_or(AllocError::SeatSpaceExhausted)?;

        let mut block = first_seat.value()..=last_seat.value();
        let mut promotions = Vec::new();
        let mut unserved = Vec::new();

        for entry in self.waitlist.drain_sorted() {
            match block.next() {
                Some(seat) => promotions.push(self.promote(entry, SeatId::new(seat))),
                None => unserved.push(entry),
            }
        }
        if !block.is_empty() {
            self.free
                .insert_range(SeatId::new(*block.start()), SeatId::new(*block.end()));
        }

        for entry in unserved {
            let holder = entry.key;
            if let Err(error) = self.waitlist.push(holder, entry.priority, entry.sequence) {
                warn!(holder = %holder, %error, "failed to requeue waitlisted holder");
            }
        }

        info!(
            added,
            first_seat = %first_seat,
            promoted = promotions.len(),
            "seat pool expanded"
        );
        Ok(Expansion {
            added,
            first_seat,
            promotions,
        })
    }

    /// Release every reservation and waitlist entry for holders in `lo..=hi`.
    ///
    /// Freed seats are offered, smallest first, to the best remaining
    /// waitlisted holders. Only seats freed by this call are redistributed;
    /// whatever is left over joins the pool.
    #[instrument(skip(self), level = "debug")]
    pub fn release_range(
        &mut self,
        lo: HolderId,
        hi: HolderId,
    ) -> Result<RangeRelease, AllocError> {
        if lo > hi {
            warn!(lo = %lo, hi = %hi, "rejected release with reversed range");
            return Err(AllocError::InvalidRange { lo, hi });
        }
        let range: RangeInclusive<HolderId> = lo..=hi;

        let in_range: Vec<(HolderId, SeatId)> = self
            .reserved
            .iter()
            .filter(|(holder, _)| range.contains(*holder))
            .map(|(holder, seat)| (*holder, *seat))
            .collect();

        let mut released = Vec::with_capacity(in_range.len());
        for (holder, seat) in in_range {
            self.reserved.remove(&holder);
            released.push(seat);
        }
        released.sort_unstable();

        let mut dropped: Vec<HolderId> = self
            .waitlist
            .retain(|entry| !range.contains(&entry.key))
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        dropped.sort_unstable();

        let mut promotions = Vec::new();
        for &seat in &released {
            match self.waitlist.pop() {
                Some(entry) => promotions.push(self.promote(entry, seat)),
                None => {
                    self.free.insert(seat);
                }
            }
        }

        info!(
            lo = %lo,
            hi = %hi,
            released = released.len(),
            dropped = dropped.len(),
            promoted = promotions.len(),
            "holder range released"
        );
        Ok(RangeRelease {
            lo,
            hi,
            released,
            dropped,
            promotions,
        })
    }

    /// Active reservations, ascending by seat.
    pub fn reservations(&self) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .reserved
            .iter()
            .map(|(&holder, &seat)| Booking { seat, holder })
            .collect();
        bookings.sort_unstable_by_key(|booking| booking.seat);
        bookings
    }

    /// Waitlisted holders in the order they would be promoted.
    pub fn waitlist(&self) -> Vec<WaitlistedRequest> {
        self.waitlist
            .sorted()
            .into_iter()
            .map(|entry| WaitlistedRequest {
                holder: entry.key,
                priority: entry.priority,
                arrival: Arrival::new(entry.sequence),
            })
            .collect()
    }

    /// Unassigned seats, ascending.
    pub fn free_seats(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.free.iter()
    }

    /// The seat held by `holder`, if any.
    pub fn seat_of(&self, holder: HolderId) -> Option<SeatId> {
        self.reserved.get(&holder).copied()
    }

    /// Returns true if `holder` is on the waitlist.
    pub fn is_waitlisted(&self, holder: HolderId) -> bool {
        self.waitlist.contains(&holder)
    }

    /// Number of seats in existence (free plus reserved).
    pub fn total_seats(&self) -> u64 {
        self.free.len() + self.reserved.len() as u64
    }

    fn highest_seat(&self) -> Option<SeatId> {
        let reserved = self.reserved.iter().map(|(_, seat)| *seat).max();
        let free = self.free.last();
        reserved.max(free)
    }

    fn promote(&mut self, entry: Entry<HolderId, Priority>, seat: SeatId) -> Promotion {
        let holder = entry.key;
        self.reserved.insert(holder, seat);
        debug!(
            holder = %holder,
            seat = %seat,
            priority = %entry.priority,
            arrival = entry.sequence,
            "waitlisted holder promoted"
        );
        Promotion { holder, seat }
    }
}
