//! FreeList: ordered set of vacant slot positions available for reuse.
//!
//! Allocation always hands out the lowest vacant position; when none is
//! vacant the caller appends at `len` (the current slot count).

use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct FreeList {
    free: BTreeSet<usize>,
}

impl FreeList {
    pub const fn new() -> Self {
        Self {
            free: BTreeSet::new(),
        }
    }

    #[cfg(any(test, feature = "bench_internal"))]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    #[cfg(any(test, feature = "bench_internal"))]
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.free.contains(&index)
    }

    /// Position the next allocation would use: the lowest vacant one, or
    /// `len` to signal an append.
    #[inline]
    pub fn peek(&self, len: usize) -> usize {
        self.free.first().copied().unwrap_or(len)
    }

    /// Like [`peek`](Self::peek), but claims the vacant position.
    pub fn pop(&mut self, len: usize) -> usize {
        self.free.pop_first().unwrap_or(len)
    }

    /// Return a vacated position to the list.
    pub fn release(&mut self, index: usize) {
        let fresh = self.free.insert(index);
        debug_assert!(fresh, "position {index} released twice");
    }

    /// Forget the `count` highest positions.
    pub fn drop_highest(&mut self, count: usize) {
        for _ in 0..count {
            if self.free.pop_last().is_none() {
                break;
            }
        }
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.free.iter().copied()
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }
}
