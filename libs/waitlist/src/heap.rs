//! Binary max-heap with a key -> position map.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use crate::WaitlistError;

/// A queued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, P> {
    /// Identity of the request; unique within a heap.
    pub key: K,

    /// Current priority. Higher is served first.
    pub priority: P,

    /// Arrival order. Lower is served first among equal priorities.
    pub sequence: u64,
}

impl<K, P: Ord> Entry<K, P> {
    /// Compare by service order: `Greater` means `self` is served first.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Max-heap of [`Entry`] values addressable by key.
#[derive(Debug, Clone)]
pub struct IndexedHeap<K, P> {
    entries: Vec<Entry<K, P>>,
    positions: HashMap<K, usize>,
}

impl<K, P> Default for IndexedHeap<K, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K, P> IndexedHeap<K, P>
where
    K: Eq + Hash + Clone,
    P: Ord,
{
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is queued.
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// The entry queued under `key`.
    pub fn get(&self, key: &K) -> Option<&Entry<K, P>> {
        self.positions.get(key).map(|&i| &self.entries[i])
    }

    /// The entry that [`pop`](Self::pop) would return.
    pub fn peek(&self) -> Option<&Entry<K, P>> {
        self.entries.first()
    }

    /// Entries in heap-array order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, P>> {
        self.entries.iter()
    }

    /// Entries in service order, without modifying the heap.
    pub fn sorted(&self) -> Vec<&Entry<K, P>> {
        let mut view: Vec<&Entry<K, P>> = self.entries.iter().collect();
        view.sort_by(|a, b| b.rank(a));
        view
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Queue a new entry.
    pub fn push(&mut self, key: K, priority: P, sequence: u64) -> Result<(), WaitlistError> {
        if self.positions.contains_key(&key) {
            return Err(WaitlistError::AlreadyQueued);
        }

        let i = self.entries.len();
        self.positions.insert(key.clone(), i);
        self.entries.push(Entry {
            key,
            priority,
            sequence,
        });
        self.sift_up(i);
        Ok(())
    }

    /// Remove and return the highest-ranked entry.
    pub fn pop(&mut self) -> Option<Entry<K, P>> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.take(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry)
    }

    /// Remove the entry queued under `key`.
    pub fn remove(&mut self, key: &K) -> Option<Entry<K, P>> {
        let i = *self.positions.get(key)?;
        let entry = self.take(i);
        if i < self.entries.len() {
            // The element moved into `i` came from the bottom of the heap;
            // it may belong above or below its new slot.
            let i = self.sift_up(i);
            self.sift_down(i);
        }
        Some(entry)
    }

    /// Change the priority of the entry queued under `key`.
    ///
    /// The sequence number is preserved. Returns the previous priority, or
    /// `None` if the key is not queued.
    pub fn update_priority(&mut self, key: &K, priority: P) -> Option<P> {
        let i = *self.positions.get(key)?;
        let previous = std::mem::replace(&mut self.entries[i].priority, priority);
        let i = self.sift_up(i);
        self.sift_down(i);
        Some(previous)
    }

    /// Keep only the entries for which `keep` returns true.
    ///
    /// Returns the dropped entries (in heap-array order) and restores heap
    /// order over the survivors.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Entry<K, P>>
    where
        F: FnMut(&Entry<K, P>) -> bool,
    {
        let (kept, dropped): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| keep(e));

        self.entries = kept;
        self.positions.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.positions.insert(entry.key.clone(), i);
        }
        for i in (0..self.entries.len() / 2).rev() {
            self.sift_down(i);
        }

        dropped
    }

    /// Empty the heap, returning every entry in service order.
    pub fn drain_sorted(&mut self) -> Vec<Entry<K, P>> {
        self.positions.clear();
        let mut all = std::mem::take(&mut self.entries);
        all.sort_by(|a, b| b.rank(a));
        all
    }

    /// Detach the element at `i` by swapping it with the last slot.
    fn take(&mut self, i: usize) -> Entry<K, P> {
        let last = self.entries.len() - 1;
        self.swap(i, last);
        let entry = self.entries.swap_remove(last);
        self.positions.remove(&entry.key);
        entry
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(pos) = self.positions.get_mut(&self.entries[a].key) {
            *pos = a;
        }
        if let Some(pos) = self.positions.get_mut(&self.entries[b].key) {
            *pos = b;
        }
    }

    fn outranks(&self, a: usize, b: usize) -> bool {
        self.entries[a].rank(&self.entries[b]) == Ordering::Greater
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.outranks(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) -> usize {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;

            if left < len && self.outranks(left, best) {
                best = left;
            }
            if right < len && self.outranks(right, best) {
                best = right;
            }
            if best == i {
                return i;
            }

            self.swap(i, best);
            i = best;
        }
    }

    #[cfg(test)]
    fn assert_heap(&self) {
        for i in 1..self.entries.len() {
            let parent = (i - 1) / 2;
            assert!(!self.outranks(i, parent), "heap order broken at {i}");
        }
        assert_eq!(self.positions.len(), self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            assert_eq!(self.positions.get(&entry.key), Some(&i));
        }
    }
}
