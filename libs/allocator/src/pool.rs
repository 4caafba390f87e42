//! Free seat pool.

use std::collections::BTreeMap;

use seatline_id::SeatId;

/// Unassigned seats, stored as disjoint inclusive runs keyed by their first id.
///
/// A freshly initialized or expanded block is a single run no matter how many
/// seats it holds. Adjacent runs are merged on insert.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeatPool {
    runs: BTreeMap<u64, u64>,
    len: u64,
}

impl SeatPool {
    /// Number of free seats.
    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Replace the contents with seats `1..=count`.
    pub(crate) fn reset(&mut self, count: u64) {
        self.runs.clear();
        self.len = 0;
        if count > 0 {
            self.insert_range(SeatId::FIRST, SeatId::new(count));
        }
    }

    /// Return one seat to the pool. The seat must not already be free.
    pub(crate) fn insert(&mut self, seat: SeatId) {
        self.insert_range(seat, seat);
    }

    /// Add the seats `lo..=hi`. None of them may already be free.
    pub(crate) fn insert_range(&mut self, lo: SeatId, hi: SeatId) {
        let (mut start, mut end) = (lo.value(), hi.value());
        if start > end {
            return;
        }
        self.len += end - start + 1;

        if let Some((&prev_start, &prev_end)) = self.runs.range(..start).next_back() {
            if prev_end.checked_add(1) == Some(start) {
                self.runs.remove(&prev_start);
                start = prev_start;
            }
        }
        if let Some(next_start) = end.checked_add(1) {
            if let Some(next_end) = self.runs.remove(&next_start) {
                end = next_end;
            }
        }
        self.runs.insert(start, end);
    }

    /// Take the smallest free seat.
    pub(crate) fn pop_first(&mut self) -> Option<SeatId> {
        let (start, end) = self.runs.pop_first()?;
        if start < end {
            self.runs.insert(start + 1, end);
        }
        self.len -= 1;
        Some(SeatId::new(start))
    }

    /// Largest free seat.
    pub(crate) fn last(&self) -> Option<SeatId> {
        self.runs
            .last_key_value()
            .map(|(_, &end)| SeatId::new(end))
    }

    /// Free seats, ascending.
    pub(crate) fn iter(&self) -> impl Iterator<Item = SeatId> + '_ {
        self.runs
            .iter()
            .flat_map(|(&start, &end)| (start..=end).map(SeatId::new))
    }
}
