//! Bounded snapshot history for charts and rate calculations.

use std::sync::Arc;

use crate::source::Snapshot;

/// Maximum number of historical snapshots to keep.
pub const MAX_HISTORY_SIZE: usize = 60;

/// Fixed-capacity ring of snapshots in chronological order.
///
/// Once full, each append overwrites the oldest slot in place, so the
/// backing storage is never reallocated after the first `capacity` appends.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: Vec<Arc<Snapshot>>,
    /// Index of the oldest entry once the ring has wrapped.
    head: usize,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Create an empty history holding up to [`MAX_HISTORY_SIZE`] snapshots.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// Create an empty history with a custom bound.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Record a new snapshot, evicting the oldest one if full.
    pub fn append(&mut self, snapshot: Arc<Snapshot>) {
        if self.slots.len() < self.capacity {
            self.slots.push(snapshot);
        } else {
            self.slots[self.head] = snapshot;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// The most recently appended snapshot.
    pub fn latest(&self) -> Option<&Arc<Snapshot>> {
        self.get(self.len().checked_sub(1)?)
    }

    /// The snapshot appended immediately before [`latest`](Self::latest).
    pub fn previous(&self) -> Option<&Arc<Snapshot>> {
        self.get(self.len().checked_sub(2)?)
    }

    /// Snapshot at chronological position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Arc<Snapshot>> {
        if index >= self.slots.len() {
            return None;
        }
        self.slots.get((self.head + index) % self.slots.len())
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<Snapshot>> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Chronological copy for publishing; clones only the `Arc`s.
    pub fn to_vec(&self) -> Vec<Arc<Snapshot>> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
