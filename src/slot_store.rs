//! SlotStore: growable vector of optional slots addressed by position.
//!
//! A slot is either live (holds an `Rc<V>` shared with the value index) or
//! vacant (a tombstone left behind by removal). Operations that may move
//! the backing allocation report whether it moved, so the owner can decide
//! when the value index must be rebuilt.

use std::rc::Rc;

/// Outcome of an operation that may reallocate the backing vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Growth {
    /// Position affected by the operation (the appended slot for `append`).
    pub index: usize,
    /// True if the backing allocation changed.
    pub moved: bool,
}

#[derive(Debug)]
pub struct SlotStore<V> {
    slots: Vec<Option<Rc<V>>>,
}

impl<V> Default for SlotStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SlotStore<V> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of materialized slots, live or vacant.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Capacity of the backing allocation.
    #[cfg(any(test, feature = "bench_internal"))]
    #[inline]
    pub fn allocation(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Rc<V>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Fill a vacant slot inside the materialized range.
    pub fn set(&mut self, index: usize, value: Rc<V>) {
        let slot = &mut self.slots[index];
        debug_assert!(slot.is_none(), "set() on a live slot {index}");
        *slot = Some(value);
    }

    /// Turn a live slot into a tombstone, handing back its value.
    pub fn vacate(&mut self, index: usize) -> Option<Rc<V>> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Materialize one more slot at the tail holding `value`.
    pub fn append(&mut self, value: Rc<V>) -> Growth {
        let before = self.slots.capacity();
        let index = self.slots.len();
        self.slots.push(Some(value));
        Growth {
            index,
            moved: before != self.slots.capacity(),
        }
    }

    /// Make sure the allocation can hold `total` slots without moving.
    /// Returns true if the allocation moved.
    pub fn reserve_total(&mut self, total: usize) -> bool {
        let before = self.slots.capacity();
        if let Some(additional) = total.checked_sub(self.slots.len()) {
            self.slots.reserve_exact(additional);
        }
        before != self.slots.capacity()
    }

    /// Drop every slot at or past `len` and shrink the allocation towards
    /// `len`. Only vacant slots may be dropped. Returns true if the
    /// allocation moved.
    pub fn truncate_vacant(&mut self, len: usize) -> bool {
        debug_assert!(
            self.slots.iter().skip(len).all(Option::is_none),
            "truncate_vacant() would drop live slots"
        );
        let before = self.slots.capacity();
        self.slots.truncate(len);
        self.slots.shrink_to(len);
        before != self.slots.capacity()
    }

    /// Length of the run of vacant slots at the tail.
    pub fn trailing_vacant(&self) -> usize {
        self.slots.iter().rev().take_while(|s| s.is_none()).count()
    }

    /// True if no vacant slot precedes a live one.
    pub fn is_contiguous(&self) -> bool {
        let mut seen_live = false;
        for slot in self.slots.iter().rev() {
            if slot.is_some() {
                seen_live = true;
            } else if seen_live {
                return false;
            }
        }
        true
    }

    /// Live slots in ascending position.
    pub fn live(&self) -> impl Iterator<Item = (usize, &Rc<V>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[Option<Rc<V>>] {
        &self.slots
    }

    /// Remove every slot. The allocation is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<V: Clone> SlotStore<V> {
    /// Deep copy: every live value is cloned into a fresh `Rc`.
    pub fn deep_clone(&self) -> Self {
        let mut slots = Vec::with_capacity(self.slots.capacity());
        slots.extend(
            self.slots
                .iter()
                .map(|s| s.as_ref().map(|v| Rc::new(V::clone(v)))),
        );
        Self { slots }
    }
}
