//! ValueIndex: ordered map from live values to their slot positions.
//!
//! Entries are keyed by the same `Rc<V>` handle that the slot store holds,
//! never by a reference into the slot vector, so moving that vector cannot
//! leave the index dangling. Equality is the one induced by `V: Ord`: two
//! values are the same entry iff neither compares less than the other.

use crate::slot_store::SlotStore;
use log::debug;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Why the index was rebuilt; reported in logs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RebuildReason {
    /// The slot store's backing allocation moved.
    Reallocated,
    /// A deep copy was made from another container.
    Cloned,
}

#[derive(Debug)]
pub struct ValueIndex<V> {
    map: BTreeMap<Rc<V>, usize>,
    rebuilds: usize,
}

impl<V> Default for ValueIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ValueIndex<V> {
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            rebuilds: 0,
        }
    }

    /// Number of indexed values, i.e. the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// How many times [`rebuild`](Self::rebuild) has run.
    #[cfg(any(test, feature = "bench_internal"))]
    #[inline]
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<V: Ord> ValueIndex<V> {
    #[inline]
    pub fn lookup(&self, value: &V) -> Option<usize> {
        self.map.get(value).copied()
    }

    /// Map `value` to `index`, returning the position it previously had.
    pub fn upsert(&mut self, value: Rc<V>, index: usize) -> Option<usize> {
        self.map.insert(value, index)
    }

    pub fn remove(&mut self, value: &V) -> Option<usize> {
        self.map.remove(value)
    }

    /// Discard every entry and re-derive the index from the live slots.
    ///
    /// The new map replaces the old one only once it is complete, so a
    /// panicking `Ord` leaves the previous index in place.
    pub fn rebuild(&mut self, slots: &SlotStore<V>, reason: RebuildReason) {
        let mut map = BTreeMap::new();
        for (index, value) in slots.live() {
            map.insert(Rc::clone(value), index);
        }
        self.map = map;
        self.rebuilds += 1;
        debug!(
            "value index rebuilt ({:?}): {} live entries over {} slots",
            reason,
            self.map.len(),
            slots.len()
        );
    }

    /// Indexed `(value, position)` pairs in value order.
    #[cfg(any(test, feature = "bench_internal"))]
    pub fn iter(&self) -> impl Iterator<Item = (&V, usize)> + '_ {
        self.map.iter().map(|(v, &i)| (&**v, i))
    }
}
