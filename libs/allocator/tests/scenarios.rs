//! End-to-end allocation scenarios.
//!
//! Each test drives a fresh allocator through a short command sequence and
//! checks who ends up on which seat.

use seatline_allocator::{
    Arrival, Booking, Cancellation, HolderId, Priority, Promotion, Reservation, SeatAllocator,
    SeatId,
};

fn holder(id: i64) -> HolderId {
    HolderId::new(id)
}

fn seat(id: u64) -> SeatId {
    SeatId::new(id)
}

fn prio(p: i64) -> Priority {
    Priority::new(p)
}

fn booking(seat_id: u64, holder_id: i64) -> Booking {
    Booking {
        seat: seat(seat_id),
        holder: holder(holder_id),
    }
}

#[test]
fn test_cancel_promotes_only_waitlisted_holder() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(2).unwrap();

    let first = allocator.reserve(holder(101), prio(1)).unwrap();
    allocator.reserve(holder(102), prio(1)).unwrap();
    assert!(matches!(
        allocator.reserve(holder(103), prio(2)).unwrap(),
        Reservation::Waitlisted { .. }
    ));

    let seat_of_101 = first.seat().unwrap();
    let outcome = allocator.cancel(seat_of_101, holder(101));

    assert_eq!(
        outcome,
        Cancellation::Cancelled {
            holder: holder(101),
            seat: seat_of_101,
            promoted: Some(Promotion {
                holder: holder(103),
                seat: seat_of_101
            }),
        }
    );
    assert_eq!(allocator.seat_of(holder(103)), Some(seat_of_101));
    assert_eq!(allocator.availability().waitlisted, 0);
}

#[test]
fn test_expansion_promotes_higher_priority_first() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(1).unwrap();

    assert_eq!(
        allocator.reserve(holder(1), prio(5)).unwrap().seat(),
        Some(seat(1))
    );
    assert_eq!(
        allocator.reserve(holder(2), prio(5)).unwrap(),
        Reservation::Waitlisted {
            holder: holder(2),
            arrival: Arrival::new(1)
        }
    );
    assert_eq!(
        allocator.reserve(holder(3), prio(7)).unwrap(),
        Reservation::Waitlisted {
            holder: holder(3),
            arrival: Arrival::new(2)
        }
    );

    let expansion = allocator.add_seats(1).unwrap();
    assert_eq!(expansion.first_seat, seat(2));
    assert_eq!(
        expansion.promotions,
        vec![Promotion {
            holder: holder(3),
            seat: seat(2)
        }]
    );
    assert!(allocator.is_waitlisted(holder(2)));
    assert_eq!(
        expansion.to_string(),
        "Additional 1 Seats are made available for reservation\nUser 3 reserved seat 2"
    );
}

#[test]
fn test_expansion_assigns_smallest_new_seats_in_priority_order() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(2).unwrap();
    allocator.reserve(holder(1), prio(1)).unwrap();
    allocator.reserve(holder(2), prio(1)).unwrap();

    allocator.reserve(holder(10), prio(1)).unwrap();
    allocator.reserve(holder(11), prio(4)).unwrap();
    allocator.reserve(holder(12), prio(4)).unwrap();

    let expansion = allocator.add_seats(5).unwrap();
    assert_eq!(
        expansion.promotions,
        vec![
            Promotion {
                holder: holder(11),
                seat: seat(3)
            },
            Promotion {
                holder: holder(12),
                seat: seat(4)
            },
            Promotion {
                holder: holder(10),
                seat: seat(5)
            },
        ]
    );
    assert_eq!(
        allocator.free_seats().collect::<Vec<_>>(),
        vec![seat(6), seat(7)]
    );
}

#[test]
fn test_range_release_drops_in_range_waitlist_and_promotes_the_rest() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(3).unwrap();

    allocator.reserve(holder(10), prio(1)).unwrap(); // seat 1
    allocator.reserve(holder(20), prio(1)).unwrap(); // seat 2
    allocator.reserve(holder(50), prio(1)).unwrap(); // seat 3

    allocator.reserve(holder(15), prio(9)).unwrap(); // in range, dropped
    allocator.reserve(holder(60), prio(2)).unwrap();
    allocator.reserve(holder(70), prio(6)).unwrap();
    allocator.reserve(holder(80), prio(4)).unwrap();

    let outcome = allocator.release_range(holder(10), holder(20)).unwrap();

    assert_eq!(outcome.released, vec![seat(1), seat(2)]);
    assert_eq!(outcome.dropped, vec![holder(15)]);
    assert_eq!(
        outcome.promotions,
        vec![
            Promotion {
                holder: holder(70),
                seat: seat(1)
            },
            Promotion {
                holder: holder(80),
                seat: seat(2)
            },
        ]
    );
    assert!(!allocator.is_waitlisted(holder(15)));
    assert_eq!(allocator.seat_of(holder(15)), None);
    assert!(allocator.is_waitlisted(holder(60)));
    assert_eq!(
        outcome.to_string(),
        "Reservations of the Users in the range [10, 20] are released\n\
         User 70 reserved seat 1\n\
         User 80 reserved seat 2"
    );
}

#[test]
fn test_range_release_leftover_seats_join_pool() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(3).unwrap();
    for id in 1..=3 {
        allocator.reserve(holder(id), prio(1)).unwrap();
    }
    allocator.reserve(holder(9), prio(1)).unwrap();

    let outcome = allocator.release_range(holder(1), holder(3)).unwrap();
    assert_eq!(
        outcome.promotions,
        vec![Promotion {
            holder: holder(9),
            seat: seat(1)
        }]
    );
    assert_eq!(
        allocator.free_seats().collect::<Vec<_>>(),
        vec![seat(2), seat(3)]
    );
}

#[test]
fn test_priority_update_tie_keeps_arrival_order() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(1).unwrap();
    allocator.reserve(holder(1), prio(1)).unwrap();

    allocator.reserve(holder(2), prio(3)).unwrap(); // arrival 1
    allocator.reserve(holder(3), prio(1)).unwrap(); // arrival 2

    // Raise 3 to tie with 2: 2 arrived first and still wins.
    allocator.update_priority(holder(3), prio(3));
    let outcome = allocator.cancel(seat(1), holder(1));
    assert!(matches!(
        outcome,
        Cancellation::Cancelled {
            promoted: Some(Promotion { holder: h, .. }),
            ..
        } if h == holder(2)
    ));

    // Raising above the tie does reorder.
    allocator.reserve(holder(4), prio(3)).unwrap(); // arrival 3
    allocator.update_priority(holder(4), prio(5));
    let order: Vec<HolderId> = allocator.waitlist().iter().map(|r| r.holder).collect();
    assert_eq!(order, vec![holder(4), holder(3)]);
}

#[test]
fn test_reserve_cancel_round_trip() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(4).unwrap();
    let before = allocator.availability();

    let seat_id = allocator.reserve(holder(7), prio(1)).unwrap().seat().unwrap();
    allocator.cancel(seat_id, holder(7));

    assert_eq!(allocator.availability(), before);
    assert_eq!(allocator.free_seats().count(), 4);
}

#[test]
fn test_reservations_listing_is_stable() {
    let mut allocator = SeatAllocator::new();
    allocator.initialize(4).unwrap();
    for id in [40, 10, 30, 20] {
        allocator.reserve(holder(id), prio(1)).unwrap();
    }
    allocator.cancel(seat(2), holder(10));
    allocator.reserve(holder(5), prio(1)).unwrap();

    let first = allocator.reservations();
    let second = allocator.reservations();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![booking(1, 40), booking(2, 5), booking(3, 30), booking(4, 20)]
    );
}
