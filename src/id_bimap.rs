//! IdBimap: public container tying the slot store, free list and value
//! index together, plus capacity bookkeeping.
//!
//! Insertion updates the value index first and then claims the slot;
//! removal unindexes first and then vacates the slot. User `Ord` code thus
//! only runs while all layers agree. Queries only read the slot store and
//! the value index.

use crate::error::{InsertError, LookupError};
use crate::free_list::FreeList;
use crate::iter::{Iter, Keys, Values};
use crate::key::Key;
use crate::reentrancy::DebugReentrancy;
use crate::slot_store::SlotStore;
use crate::value_index::{RebuildReason, ValueIndex};
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Index;
use log::{debug, trace};
use std::rc::Rc;

/// Storage layers, kept apart from the guard so a guarded section can
/// mutate them while the guard borrows the tracker.
struct Inner<V> {
    slots: SlotStore<V>,
    free: FreeList,
    index: ValueIndex<V>,
    // Slots promised by `reserve` beyond the materialized length.
    reserved: usize,
}

impl<V> Inner<V> {
    const fn new() -> Self {
        Self {
            slots: SlotStore::new(),
            free: FreeList::new(),
            index: ValueIndex::new(),
            reserved: 0,
        }
    }

    #[inline]
    fn next_position(&self) -> usize {
        self.free.peek(self.slots.len())
    }

    fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.reserved = 0;
    }
}

impl<V: Ord> Inner<V> {
    // Store a value known to be absent at the next free position. The
    // index is updated first: `BTreeMap` only compares while searching, so
    // a panicking `Ord` there leaves every layer as it was. A panic in the
    // rebuild after growth keeps the old index, which already holds the
    // new value.
    fn place(&mut self, value: V) -> usize {
        let len = self.slots.len();
        let value = Rc::new(value);
        let position = self.free.peek(len);
        self.index.upsert(Rc::clone(&value), position);
        let claimed = self.free.pop(len);
        debug_assert_eq!(claimed, position);
        if position < len {
            self.slots.set(position, value);
        } else {
            let growth = self.slots.append(value);
            debug_assert_eq!(growth.index, position);
            if growth.moved {
                self.reserved = 0;
                self.index.rebuild(&self.slots, RebuildReason::Reallocated);
            } else {
                self.reserved = self.reserved.saturating_sub(1);
            }
        }
        trace!("allocated slot {position} (len {})", self.slots.len());
        position
    }

    // Tombstone a live slot: unindex it and return its position to the
    // free list. Unindexing runs first for the same reason as in `place`.
    fn detach(&mut self, position: usize) -> Option<Rc<V>> {
        let value = Rc::clone(self.slots.get(position)?);
        let unindexed = self.index.remove(&value);
        debug_assert_eq!(unindexed, Some(position));
        let vacated = self.slots.vacate(position);
        debug_assert!(vacated.is_some());
        self.free.release(position);
        Some(value)
    }

    fn reserve(&mut self, total: usize) {
        let len = self.slots.len();
        match total.cmp(&len) {
            Ordering::Greater => {
                self.reserved = total - len;
                if self.slots.reserve_total(total) {
                    self.index.rebuild(&self.slots, RebuildReason::Reallocated);
                }
            }
            Ordering::Less => {
                let excess = len - total;
                let trailing = self.slots.trailing_vacant();
                if excess > trailing {
                    debug!(
                        "reserve({total}) ignored: {excess} slots to trim but only {trailing} vacant at the tail"
                    );
                    return;
                }
                self.free.drop_highest(excess);
                self.reserved = 0;
                if self.slots.truncate_vacant(total) {
                    self.index.rebuild(&self.slots, RebuildReason::Reallocated);
                }
                debug!("reserve({total}) trimmed {excess} vacant tail slots");
            }
            Ordering::Equal => self.reserved = 0,
        }
    }
}

/// Bidirectional map from compact integer keys to ordered values.
///
/// Each distinct value (by `V: Ord`) gets the lowest key not held by a
/// live entry. Erasing an entry leaves a hole that the next insertion
/// fills; surviving entries never change key.
///
/// Values are shared between the slot vector and the ordered index through
/// `Rc`, so the container is `!Send` and `!Sync`.
pub struct IdBimap<V, K = usize> {
    inner: Inner<V>,
    reentrancy: DebugReentrancy,
    _key: PhantomData<K>,
}

impl<V, K: Key> IdBimap<V, K> {
    pub fn new() -> Self {
        Self {
            inner: Inner::new(),
            reentrancy: DebugReentrancy::new(),
            _key: PhantomData,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.index.is_empty()
    }

    /// Materialized slots plus reserved room. Never less than `len()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.slots.len() + self.inner.reserved
    }

    /// Key the next insertion would receive, or `None` if the key type
    /// cannot represent it.
    pub fn next_index(&self) -> Option<K> {
        K::from_index(self.inner.next_position())
    }

    /// True if every hole lies after the last live entry.
    pub fn is_contiguous(&self) -> bool {
        self.inner.slots.is_contiguous()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: K) -> Result<&V, LookupError> {
        let index = key.to_index();
        index
            .and_then(|i| self.inner.slots.get(i))
            .map(|v| &**v)
            .ok_or(LookupError::KeyNotFound { index })
    }

    pub fn contains_key(&self, key: K) -> bool {
        key.to_index()
            .is_some_and(|i| self.inner.slots.is_live(i))
    }

    /// First entry, in key order, whose value satisfies `pred`.
    pub fn find_if<P>(&self, mut pred: P) -> Option<(K, &V)>
    where
        P: FnMut(&V) -> bool,
    {
        self.iter().find(|&(_, v)| pred(v))
    }

    pub fn iter(&self) -> Iter<'_, V, K> {
        Iter::new(self.inner.slots.as_slice(), self.len())
    }

    pub fn keys(&self) -> Keys<'_, V, K> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V, K> {
        Values { inner: self.iter() }
    }

    /// Remove every entry, hole and reservation.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        self.inner.clear();
    }

    // Live positions were produced by `K::from_index`, so they convert back.
    fn key_at(position: usize) -> K {
        K::from_index(position).expect("live position is representable by the key type")
    }

    fn room_for_one(&self) -> Result<(), InsertError> {
        let position = self.inner.next_position();
        match K::from_index(position) {
            Some(_) => Ok(()),
            None => Err(InsertError::KeySpaceExhausted { limit: position }),
        }
    }
}

impl<V: Ord, K: Key> IdBimap<V, K> {
    /// Empty map with room for `capacity` entries before any reallocation.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.reserve(capacity);
        map
    }

    /// Insert `value` unless an equal value is already present.
    ///
    /// Returns the key of the entry holding the value and whether it was
    /// newly inserted.
    ///
    /// # Panics
    ///
    /// Panics if the key type cannot address another slot. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    pub fn insert(&mut self, value: V) -> (K, bool) {
        match self.try_insert(value) {
            Ok(done) => done,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_insert(&mut self, value: V) -> Result<(K, bool), InsertError> {
        let _g = self.reentrancy.enter("insert");
        if let Some(position) = self.inner.index.lookup(&value) {
            return Ok((Self::key_at(position), false));
        }
        self.room_for_one()?;
        let position = self.inner.place(value);
        Ok((Self::key_at(position), true))
    }

    /// Insert a value built by `make`. The closure runs once, and only if
    /// a key is available for the new entry.
    ///
    /// Deduplicates exactly like [`insert`](Self::insert): if an equal
    /// value is already in the map, the built value is dropped and the
    /// existing entry's key is returned with `false`. Two equal values
    /// never occupy separate keys.
    ///
    /// ```
    /// use id_bimap::IdBimap;
    ///
    /// let mut m: IdBimap<String> = IdBimap::new();
    /// assert_eq!(m.emplace(|| "a".to_string()), (0, true));
    /// assert_eq!(m.emplace(|| "a".to_string()), (0, false));
    /// assert_eq!(m.len(), 1);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the key type cannot address another slot.
    pub fn emplace<F>(&mut self, make: F) -> (K, bool)
    where
        F: FnOnce() -> V,
    {
        match self.try_emplace(make) {
            Ok(done) => done,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_emplace<F>(&mut self, make: F) -> Result<(K, bool), InsertError>
    where
        F: FnOnce() -> V,
    {
        self.room_for_one()?;
        self.try_insert(make())
    }

    /// Key of the entry equal to `value`.
    pub fn key_of(&self, value: &V) -> Result<K, LookupError> {
        let _g = self.reentrancy.enter("key_of");
        self.inner
            .index
            .lookup(value)
            .map(Self::key_at)
            .ok_or(LookupError::ValueNotFound)
    }

    pub fn contains(&self, value: &V) -> bool {
        let _g = self.reentrancy.enter("contains");
        self.inner.index.lookup(value).is_some()
    }

    /// Entry equal to `value`, if any.
    pub fn find(&self, value: &V) -> Option<(K, &V)> {
        let _g = self.reentrancy.enter("find");
        let position = self.inner.index.lookup(value)?;
        let stored = self.inner.slots.get(position)?;
        Some((Self::key_at(position), &**stored))
    }

    /// Remove the entry under `key` and hand its value back. Absent keys
    /// are a no-op.
    pub fn erase(&mut self, key: K) -> Option<V> {
        let removed = {
            let _g = self.reentrancy.enter("erase");
            self.inner.detach(key.to_index()?)?
        };
        Rc::try_unwrap(removed).ok()
    }

    /// Remove the entry equal to `value`. Absent values are a no-op.
    pub fn erase_value(&mut self, value: &V) -> Option<V> {
        let removed = {
            let _g = self.reentrancy.enter("erase_value");
            let position = self.inner.index.lookup(value)?;
            self.inner.detach(position)?
        };
        Rc::try_unwrap(removed).ok()
    }

    /// Remove every entry whose value satisfies `pred`, visiting keys in
    /// ascending order. Survivors keep their keys. Returns how many
    /// entries were removed.
    pub fn delete_all<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&V) -> bool,
    {
        let mut removed = Vec::new();
        {
            let _g = self.reentrancy.enter("delete_all");
            for position in 0..self.inner.slots.len() {
                let hit = self.inner.slots.get(position).is_some_and(|v| pred(&**v));
                if hit {
                    removed.extend(self.inner.detach(position));
                }
            }
        }
        // Values are dropped only once the structure is consistent again.
        removed.len()
    }

    /// Adjust capacity to `total` slots.
    ///
    /// Growing reserves room ahead of demand. Shrinking only trims vacant
    /// slots at the tail and is ignored if a live entry sits at or past
    /// `total`. Live entries never move and never change key.
    pub fn reserve(&mut self, total: usize) {
        let _g = self.reentrancy.enter("reserve");
        self.inner.reserve(total);
    }

    #[cfg(test)]
    pub(crate) fn index_rebuilds(&self) -> usize {
        self.inner.index.rebuilds()
    }

    #[cfg(test)]
    pub(crate) fn allocation(&self) -> usize {
        self.inner.slots.allocation()
    }

    /// Check every structural invariant; panics with a description of the
    /// first violation.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let Inner {
            slots,
            free,
            index,
            reserved,
        } = &self.inner;
        let len = slots.len();
        let live: Vec<usize> = slots.live().map(|(i, _)| i).collect();
        assert_eq!(live.len(), index.len(), "index size != live slots");
        assert!(self.capacity() >= self.len(), "capacity below size");
        assert!(self.capacity() >= len, "capacity below materialized length");
        assert!(
            slots.allocation() >= len + reserved,
            "reservation not backed by the allocation"
        );
        for position in 0..len {
            assert_eq!(
                free.contains(position),
                !slots.is_live(position),
                "free list disagrees with slot {position}"
            );
        }
        assert!(free.iter().all(|p| p < len), "free position past the tail");
        for (position, value) in slots.live() {
            assert_eq!(
                index.lookup(value),
                Some(position),
                "index does not map slot {position} back to itself"
            );
        }
    }
}

impl<V, K: Key> Default for IdBimap<V, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Ord + Clone, K: Key> Clone for IdBimap<V, K> {
    /// Deep copy: values are cloned into new storage and indexed afresh.
    fn clone(&self) -> Self {
        let slots = self.inner.slots.deep_clone();
        let mut index = ValueIndex::new();
        index.rebuild(&slots, RebuildReason::Cloned);
        Self {
            inner: Inner {
                slots,
                free: self.inner.free.clone(),
                index,
                reserved: self.inner.reserved,
            },
            reentrancy: DebugReentrancy::new(),
            _key: PhantomData,
        }
    }
}

impl<V: fmt::Debug, K: Key> fmt::Debug for IdBimap<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq, K: Key> PartialEq for IdBimap<V, K> {
    /// Maps are equal when they hold the same values under the same keys;
    /// holes and reservations are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq, K: Key> Eq for IdBimap<V, K> {}

impl<V, K: Key> Index<K> for IdBimap<V, K> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if no live entry has this key.
    fn index(&self, key: K) -> &V {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<V: Ord, K: Key> Extend<V> for IdBimap<V, K> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<V: Ord, K: Key> FromIterator<V> for IdBimap<V, K> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V: Ord, K: Key, const N: usize> From<[V; N]> for IdBimap<V, K> {
    fn from(values: [V; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, V, K: Key> IntoIterator for &'a IdBimap<V, K> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, V, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    thread_local! {
        // Comparisons left until `Flaky::cmp` panics; zero disarms it.
        static FUSE: Cell<u32> = Cell::new(0);
    }

    fn arm(comparisons: u32) {
        FUSE.with(|f| f.set(comparisons));
    }

    fn disarm() {
        FUSE.with(|f| f.set(0));
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Flaky(u32);

    impl PartialOrd for Flaky {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Flaky {
        fn cmp(&self, other: &Self) -> Ordering {
            FUSE.with(|f| match f.get() {
                0 => {}
                1 => {
                    f.set(0);
                    panic!("comparison failed");
                }
                left => f.set(left - 1),
            });
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn insert_grows_rebuild_only_when_allocation_moves() {
        let mut m: IdBimap<u64> = IdBimap::new();
        let mut expected = m.index_rebuilds();
        for v in 0..200u64 {
            let before = m.allocation();
            m.insert(v);
            if m.allocation() != before {
                expected += 1;
            }
            assert_eq!(m.index_rebuilds(), expected, "after inserting {v}");
        }
        m.assert_invariants();
    }

    #[test]
    fn reserved_room_absorbs_inserts_without_rebuild() {
        let mut m: IdBimap<u32> = IdBimap::with_capacity(64);
        assert_eq!(m.capacity(), 64);
        let after_reserve = m.index_rebuilds();
        assert_eq!(after_reserve, 1, "reserving from empty allocates");
        for v in 0..64 {
            m.insert(v);
        }
        assert_eq!(m.index_rebuilds(), after_reserve);
        assert_eq!(m.capacity(), 64);
        m.assert_invariants();
    }

    #[test]
    fn refilling_holes_never_rebuilds() {
        let mut m: IdBimap<i32> = (0..10).collect();
        let base = m.index_rebuilds();
        for k in [1usize, 4, 7] {
            m.erase(k);
        }
        for v in 100..103 {
            m.insert(v);
        }
        assert_eq!(m.index_rebuilds(), base);
        assert_eq!(m.key_of(&100), Ok(1));
        assert_eq!(m.key_of(&102), Ok(7));
    }

    #[test]
    fn shrinking_reserve_truncates_vacant_tail() {
        let mut m: IdBimap<&str> = IdBimap::from(["a", "b", "c", "d", "e"]);
        m.erase(4);
        m.erase(3);
        m.erase(1);
        m.reserve(3);
        assert_eq!(m.capacity(), 3);
        assert_eq!(m.len(), 2);
        assert_eq!(m.next_index(), Some(1));
        m.assert_invariants();

        // Hole at 1 is used first, then the trimmed tail is re-materialized.
        assert_eq!(m.insert("x"), (1, true));
        assert_eq!(m.insert("y"), (3, true));
        assert_eq!(m.capacity(), 4);
        m.assert_invariants();
    }

    #[test]
    fn shrinking_reserve_refuses_to_drop_live_entries() {
        let mut m: IdBimap<i32> = IdBimap::from([0, 1, 2, 3]);
        m.erase(3);
        m.erase(1);
        m.reserve(1); // would need three vacant tail slots, only one exists
        assert_eq!(m.capacity(), 4);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(2), Ok(&2));
        m.assert_invariants();
    }

    #[test]
    fn emplace_is_lazy_when_keys_are_exhausted() {
        let mut m: IdBimap<u16, u8> = (0..=255u16).collect();
        assert_eq!(m.len(), 256);
        assert_eq!(m.next_index(), None);

        let calls = Cell::new(0);
        let r = m.try_emplace(|| {
            calls.set(calls.get() + 1);
            999
        });
        assert_eq!(r, Err(InsertError::KeySpaceExhausted { limit: 256 }));
        assert_eq!(calls.get(), 0);

        // A freed key makes room again.
        m.erase(17u8);
        assert_eq!(m.try_emplace(|| 999), Ok((17u8, true)));
    }

    #[test]
    fn emplace_of_existing_value_keeps_the_original_entry() {
        let mut m: IdBimap<String> = IdBimap::new();
        m.insert("gsd".to_string());
        let calls = Cell::new(0);
        let r = m.emplace(|| {
            calls.set(calls.get() + 1);
            "gsd".to_string()
        });
        assert_eq!(r, (0, false));
        assert_eq!(calls.get(), 1);
        assert_eq!(m.len(), 1);
        m.assert_invariants();
    }

    #[test]
    fn clone_rebuilds_its_own_index() {
        let m: IdBimap<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let c = m.clone();
        assert_eq!(c.index_rebuilds(), 1);
        c.assert_invariants();
        assert_eq!(m, c);
    }

    #[test]
    fn clear_drops_reservation_and_holes() {
        let mut m: IdBimap<i32> = IdBimap::with_capacity(10);
        m.extend([1, 2, 3]);
        m.erase(0);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), 0);
        assert_eq!(m.next_index(), Some(0));
        assert!(m.is_contiguous());
        m.assert_invariants();
    }

    #[test]
    fn panicking_ord_during_insert_leaves_map_unchanged() {
        let mut m: IdBimap<Flaky> = (0..3).map(Flaky).collect();
        m.erase(1);
        let mut inserted = None;
        for fuse in 1..64 {
            arm(fuse);
            let res = catch_unwind(AssertUnwindSafe(|| m.insert(Flaky(10))));
            disarm();
            m.assert_invariants();
            match res {
                Ok(done) => {
                    inserted = Some(done);
                    break;
                }
                Err(_) => {
                    assert_eq!(m.len(), 2);
                    assert_eq!(m.iter().count(), 2);
                    assert_eq!(m.next_index(), Some(1));
                    assert!(!m.contains(&Flaky(10)));
                }
            }
        }
        assert_eq!(inserted, Some((1, true)));
        assert_eq!(m.iter().count(), 3);
    }

    #[test]
    fn panicking_ord_during_growth_keeps_layers_consistent() {
        let mut m: IdBimap<Flaky> = IdBimap::new();
        let mut next = 0;
        while m.len() < 3 || m.allocation() != m.len() {
            m.insert(Flaky(next));
            next += 1;
        }
        let len = m.len();
        let rebuilds = m.index_rebuilds();
        let mut failed_rebuild = false;
        let mut outcome = None;
        for fuse in 1..256 {
            arm(fuse);
            let res = catch_unwind(AssertUnwindSafe(|| m.insert(Flaky(1000))));
            disarm();
            m.assert_invariants();
            assert_eq!(m.iter().count(), m.len());
            match res {
                Ok((key, _)) => {
                    outcome = Some(key);
                    break;
                }
                Err(_) if m.len() == len => assert!(!m.contains(&Flaky(1000))),
                // Stored and indexed; only the rebuild for the new allocation failed.
                Err(_) => {
                    assert_eq!(m.len(), len + 1);
                    assert_eq!(m.key_of(&Flaky(1000)), Ok(len));
                    assert_eq!(m.index_rebuilds(), rebuilds);
                    failed_rebuild = true;
                }
            }
        }
        assert!(failed_rebuild);
        assert_eq!(outcome, Some(len));
    }

    #[test]
    fn panicking_ord_during_erase_leaves_entry_in_place() {
        let mut m: IdBimap<Flaky> = (0..5).map(Flaky).collect();
        let mut erased = None;
        for fuse in 1..64 {
            arm(fuse);
            let res = catch_unwind(AssertUnwindSafe(|| m.erase(2)));
            disarm();
            m.assert_invariants();
            match res {
                Ok(value) => {
                    erased = value;
                    break;
                }
                Err(_) => {
                    assert_eq!(m.get(2), Ok(&Flaky(2)));
                    assert_eq!(m.next_index(), Some(5));
                }
            }
        }
        assert_eq!(erased, Some(Flaky(2)));
        assert_eq!(m.next_index(), Some(2));
        assert_eq!(m.iter().count(), 4);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn reentrant_lookup_from_ord_panics() {
        use std::cmp::Ordering;

        struct Sneaky {
            id: u32,
            map: *const IdBimap<Sneaky>,
        }
        impl PartialEq for Sneaky {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }
        impl Eq for Sneaky {}
        impl PartialOrd for Sneaky {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Sneaky {
            fn cmp(&self, other: &Self) -> Ordering {
                let p = if self.map.is_null() { other.map } else { self.map };
                if !p.is_null() {
                    // Re-enter the map that is currently probing.
                    unsafe {
                        let _ = (*p).len();
                        let _ = (*p).contains(self);
                    }
                }
                self.id.cmp(&other.id)
            }
        }

        let mut m: IdBimap<Sneaky> = IdBimap::new();
        m.insert(Sneaky {
            id: 1,
            map: core::ptr::null(),
        });
        let probe = Sneaky {
            id: 2,
            map: &m as *const _,
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = m.contains(&probe);
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
    }
}
