//! Typed identifier definitions.

use crate::define_id;

// =============================================================================
// Allocation Model
// =============================================================================

define_id!(HolderId, i64, "holder id");
define_id!(SeatId, u64, "seat id");
define_id!(Priority, i64, "priority");

impl SeatId {
    /// The first seat of a freshly initialized pool.
    pub const FIRST: Self = Self(1);

    /// Returns the seat `offset` places after this one, or `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

// =============================================================================
// Arrival Sequence
// =============================================================================

/// Arrival sequence number assigned to a waitlist entry.
///
/// Strictly increasing for the lifetime of an allocator; earlier arrivals win
/// priority ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Arrival(u64);

impl Arrival {
    /// The counter value before any entry has been queued.
    pub const ZERO: Self = Self(0);

    /// Creates a new Arrival from a u64.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for Arrival {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Arrival {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdError;
    use proptest::prelude::*;

    #[test]
    fn test_holder_id_parse() {
        let id: HolderId = "101".parse().unwrap();
        assert_eq!(id.value(), 101);
    }

    #[test]
    fn test_holder_id_trims_whitespace() {
        let id: HolderId = "  -7 ".parse().unwrap();
        assert_eq!(id, HolderId::new(-7));
    }

    #[test]
    fn test_empty_input() {
        let result: Result<HolderId, _> = "   ".parse();
        assert!(result.unwrap_err().is_empty());
    }

    #[test]
    fn test_not_a_number() {
        let result: Result<Priority, _> = "high".parse();
        assert!(matches!(
            result.unwrap_err(),
            IdError::NotANumber { kind: "priority", .. }
        ));
    }

    #[test]
    fn test_negative_seat_is_out_of_range() {
        let result: Result<SeatId, _> = "-3".parse();
        assert!(matches!(
            result.unwrap_err(),
            IdError::OutOfRange { kind: "seat id", .. }
        ));
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        let result: Result<HolderId, _> = "99999999999999999999".parse();
        assert!(matches!(result.unwrap_err(), IdError::OutOfRange { .. }));
    }

    #[test]
    fn test_error_message_names_kind() {
        let err = "x1".parse::<SeatId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid seat id: 'x1' is not an integer");
    }

    #[test]
    fn test_seat_checked_add() {
        assert_eq!(SeatId::FIRST.checked_add(4), Some(SeatId::new(5)));
        assert_eq!(SeatId::new(u64::MAX).checked_add(1), None);
    }

    #[test]
    fn test_json_is_transparent() {
        let json = serde_json::to_string(&SeatId::new(12)).unwrap();
        assert_eq!(json, "12");
        let parsed: HolderId = serde_json::from_str("-4").unwrap();
        assert_eq!(parsed, HolderId::new(-4));
    }

    #[test]
    fn test_arrival_next() {
        let seq = Arrival::ZERO;
        assert_eq!(seq.next().value(), 1);
        assert!(seq < seq.next());
    }

    proptest! {
        #[test]
        fn prop_holder_display_parse(raw in any::<i64>()) {
            let id = HolderId::new(raw);
            prop_assert_eq!(id.to_string().parse::<HolderId>().unwrap(), id);
        }
    }
}
