//! Iterators over live entries in ascending key order.
//!
//! All iterators borrow the container, so any mutation while one is alive
//! is rejected at compile time.

use crate::key::Key;
use core::iter::{Enumerate, FusedIterator};
use core::marker::PhantomData;
use core::slice;
use std::rc::Rc;

/// Iterator over `(key, &value)` pairs, skipping vacant slots.
pub struct Iter<'a, V, K> {
    slots: Enumerate<slice::Iter<'a, Option<Rc<V>>>>,
    remaining: usize,
    _k: PhantomData<K>,
}

impl<'a, V, K> Iter<'a, V, K> {
    pub(crate) fn new(slots: &'a [Option<Rc<V>>], live: usize) -> Self {
        Self {
            slots: slots.iter().enumerate(),
            remaining: live,
            _k: PhantomData,
        }
    }
}

impl<V, K> Clone for Iter<'_, V, K> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
            _k: PhantomData,
        }
    }
}

#[inline]
fn live_entry<'a, V, K: Key>((i, slot): (usize, &'a Option<Rc<V>>)) -> Option<(K, &'a V)> {
    let value = slot.as_deref()?;
    Some((K::from_index(i)?, value))
}

impl<'a, V, K: Key> Iterator for Iter<'a, V, K> {
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.slots.by_ref().find_map(live_entry::<V, K>)?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, K: Key> DoubleEndedIterator for Iter<'_, V, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.slots.by_ref().rev().find_map(live_entry::<V, K>)?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<V, K: Key> ExactSizeIterator for Iter<'_, V, K> {}
impl<V, K: Key> FusedIterator for Iter<'_, V, K> {}

/// Iterator over live keys in ascending order.
pub struct Keys<'a, V, K> {
    pub(crate) inner: Iter<'a, V, K>,
}

impl<V, K: Key> Iterator for Keys<'_, V, K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V, K: Key> ExactSizeIterator for Keys<'_, V, K> {}
impl<V, K: Key> FusedIterator for Keys<'_, V, K> {}

/// Iterator over live values in ascending key order.
pub struct Values<'a, V, K> {
    pub(crate) inner: Iter<'a, V, K>,
}

impl<'a, V, K: Key> Iterator for Values<'a, V, K> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V, K: Key> ExactSizeIterator for Values<'_, V, K> {}
impl<V, K: Key> FusedIterator for Values<'_, V, K> {}
