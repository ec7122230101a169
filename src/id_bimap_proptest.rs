#![cfg(test)]

// Property tests for IdBimap kept inside the crate so they can call the
// internal invariant check after every step.

use crate::id_bimap::IdBimap;
use crate::{InsertError, LookupError};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8),
    Emplace(u8),
    EraseKey(usize),
    EraseValue(u8),
    DeleteAll { modulus: u8, remainder: u8 },
    Reserve(usize),
    Lookup(usize),
    KeyOf(u8),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..24).prop_map(Op::Insert),
        2 => (0u8..24).prop_map(Op::Emplace),
        3 => (0usize..32).prop_map(Op::EraseKey),
        2 => (0u8..24).prop_map(Op::EraseValue),
        1 => (2u8..5, 0u8..5).prop_map(|(modulus, remainder)| Op::DeleteAll { modulus, remainder }),
        2 => (0usize..40).prop_map(Op::Reserve),
        2 => (0usize..32).prop_map(Op::Lookup),
        2 => (0u8..24).prop_map(Op::KeyOf),
        1 => Just(Op::Clear),
    ]
}

/// Naive reference: a vector of optional values scanned linearly, plus the
/// reservation counter.
#[derive(Default, Debug)]
struct Model {
    slots: Vec<Option<u8>>,
    reserved: usize,
}

impl Model {
    fn key_of(&self, v: u8) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(v))
    }

    fn next(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len())
    }

    fn insert(&mut self, v: u8) -> (usize, bool) {
        if let Some(k) = self.key_of(v) {
            return (k, false);
        }
        let k = self.next();
        if k == self.slots.len() {
            self.slots.push(Some(v));
            self.reserved = self.reserved.saturating_sub(1);
        } else {
            self.slots[k] = Some(v);
        }
        (k, true)
    }

    fn erase(&mut self, k: usize) -> Option<u8> {
        self.slots.get_mut(k).and_then(Option::take)
    }

    fn reserve(&mut self, n: usize) {
        let len = self.slots.len();
        if n > len {
            self.reserved = n - len;
        } else if n < len {
            let trailing = self.slots.iter().rev().take_while(|s| s.is_none()).count();
            if len - n <= trailing {
                self.slots.truncate(n);
                self.reserved = 0;
            }
        } else {
            self.reserved = 0;
        }
    }

    fn live(&self) -> Vec<(usize, u8)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(k, s)| s.map(|v| (k, v)))
            .collect()
    }

    fn is_contiguous(&self) -> bool {
        let live = self.live();
        live.last().map_or(true, |&(k, _)| live.len() == k + 1)
    }
}

// Property: State-machine equivalence against a naive vector model.
// Invariants exercised across random operation sequences:
// - Dedup by equality; lowest free key wins on every insertion.
// - Surviving keys never move across erase/delete_all/reserve.
// - capacity()/next_index()/is_contiguous() agree with the model.
// - Lookups by key and by value fail exactly when the model says absent.
// - Slot store, free list and value index stay mutually consistent.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: IdBimap<u8> = IdBimap::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    prop_assert_eq!(sut.insert(v), model.insert(v));
                }
                Op::Emplace(v) => {
                    prop_assert_eq!(sut.try_emplace(|| v), Ok::<_, InsertError>(model.insert(v)));
                }
                Op::EraseKey(k) => {
                    prop_assert_eq!(sut.erase(k), model.erase(k));
                }
                Op::EraseValue(v) => {
                    let expected = model.key_of(v).and_then(|k| model.erase(k));
                    prop_assert_eq!(sut.erase_value(&v), expected);
                }
                Op::DeleteAll { modulus, remainder } => {
                    let doomed: Vec<usize> = model
                        .live()
                        .into_iter()
                        .filter(|&(_, v)| v % modulus == remainder)
                        .map(|(k, _)| k)
                        .collect();
                    for &k in &doomed {
                        model.erase(k);
                    }
                    let n = sut.delete_all(|v| v % modulus == remainder);
                    prop_assert_eq!(n, doomed.len());
                }
                Op::Reserve(n) => {
                    sut.reserve(n);
                    model.reserve(n);
                }
                Op::Lookup(k) => {
                    match model.slots.get(k).copied().flatten() {
                        Some(v) => prop_assert_eq!(sut.get(k), Ok(&v)),
                        None => prop_assert_eq!(sut.get(k), Err(LookupError::KeyNotFound { index: Some(k) })),
                    }
                }
                Op::KeyOf(v) => {
                    let expected = model.key_of(v).ok_or(LookupError::ValueNotFound);
                    prop_assert_eq!(sut.key_of(&v), expected);
                    prop_assert_eq!(sut.contains(&v), expected.is_ok());
                }
                Op::Clear => {
                    sut.clear();
                    model = Model::default();
                }
            }

            sut.assert_invariants();
            let live = model.live();
            prop_assert_eq!(sut.len(), live.len());
            prop_assert_eq!(sut.is_empty(), live.is_empty());
            prop_assert_eq!(sut.capacity(), model.slots.len() + model.reserved);
            prop_assert_eq!(sut.next_index(), Some(model.next()));
            prop_assert_eq!(sut.is_contiguous(), model.is_contiguous());
            let seen: Vec<(usize, u8)> = sut.iter().map(|(k, v)| (k, *v)).collect();
            prop_assert_eq!(seen, live);
        }
    }
}

// Property: round trips between keys and values hold for every live entry,
// and a deep copy stays equal until either side is mutated.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_round_trip_and_clone(
        values in proptest::collection::vec(0u16..500, 0..60),
        erase in proptest::collection::vec(0usize..60, 0..20),
    ) {
        let mut sut: IdBimap<u16, u16> = values.iter().copied().collect();
        for k in erase {
            sut.erase(k as u16);
        }
        for (k, v) in sut.iter() {
            prop_assert_eq!(sut.key_of(v), Ok(k));
            prop_assert_eq!(sut.get(sut.key_of(v).unwrap()), Ok(v));
        }

        let mut copy = sut.clone();
        copy.assert_invariants();
        prop_assert_eq!(&copy, &sut);
        let first = copy.keys().next();
        if let Some(k) = first {
            copy.erase(k);
            prop_assert!(sut.contains_key(k));
            prop_assert!(!copy.contains_key(k));
            prop_assert_ne!(&copy, &sut);
        }
    }
}
