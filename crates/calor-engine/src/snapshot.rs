//! Captured fields, in the order they were taken.
//!
//! [`SnapshotStore`] is append-only. Captures only ever happen forward in
//! time, so insertion order is chronological order. A step index can be
//! recorded once: when the initial, a periodic, and the final capture
//! coincide, the first one taken is kept and the rest are dropped.

use indexmap::map::Entry;
use indexmap::IndexMap;

use calor_core::Field;

/// One captured spatial field.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Step index at capture.
    pub step: u64,
    /// Simulated time at capture, `step · dt`.
    pub time: f64,
    /// The temperature field.
    pub field: Field,
}

/// Ordered, step-deduplicated snapshot sequence.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    entries: IndexMap<u64, Snapshot>,
}

impl SnapshotStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `snapshot` unless its step is already present.
    ///
    /// Returns `true` if it was stored.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        match self.entries.entry(snapshot.step) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
                true
            }
        }
    }

    /// Whether a snapshot at `step` has been recorded.
    pub fn contains_step(&self, step: u64) -> bool {
        self.entries.contains_key(&step)
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots in capture order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.values()
    }

    /// The snapshot taken at `step`, if any.
    pub fn get_step(&self, step: u64) -> Option<&Snapshot> {
        self.entries.get(&step)
    }

    /// Earliest snapshot.
    pub fn first(&self) -> Option<&Snapshot> {
        self.entries.first().map(|(_, s)| s)
    }

    /// Latest snapshot.
    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last().map(|(_, s)| s)
    }

    /// Capture times in order.
    pub fn times(&self) -> Vec<f64> {
        self.iter().map(|s| s.time).collect()
    }

    /// Step indices in order.
    pub fn steps(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }

    /// Consume the store, yielding snapshots in capture order.
    pub fn into_vec(self) -> Vec<Snapshot> {
        self.entries.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a SnapshotStore {
    type Item = &'a Snapshot;
    type IntoIter = indexmap::map::Values<'a, u64, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
