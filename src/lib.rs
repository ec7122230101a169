//! id-bimap: a single-threaded bidirectional map that hands out compact,
//! reusable integer keys for ordered values.
//!
//! ```
//! use id_bimap::StringIdBimap;
//!
//! let mut names = StringIdBimap::new();
//! assert_eq!(names.insert("gsd".to_string()), (0, true));
//! assert_eq!(names.insert("Whisperity".to_string()), (1, true));
//! assert_eq!(names.insert("gsd".to_string()), (0, false));
//!
//! assert_eq!(names[1], "Whisperity");
//! assert_eq!(names.key_of(&"gsd".to_string()), Ok(0));
//!
//! names.erase(0);
//! assert_eq!(names.next_index(), Some(0));
//! ```
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep allocation of keys and indexing of values as separate
//!   layers so each can be reasoned about and tested alone.
//! - Layers:
//!   - SlotStore<V>: vector of optional slots addressed by position; a
//!     removed entry leaves a tombstone so other keys stay put.
//!   - FreeList: ordered set of tombstoned positions; the lowest one is
//!     always handed out first, appending only when none is free.
//!   - ValueIndex<V>: `BTreeMap` from value to position, giving value
//!     lookups and equality-based deduplication via `V: Ord`.
//!   - IdBimap<V, K>: public API; converts positions to the key type `K`
//!     and tracks capacity reserved beyond the materialized slots.
//!
//! Constraints
//! - Single-threaded: values are shared between the slot store and the
//!   index through `Rc`, which makes the map `!Send`/`!Sync`.
//! - A key is unique among live entries only; erased keys are reused,
//!   lowest first.
//! - Equal values (by `Ord`) are one entry; `insert` of an equal value
//!   returns the existing key.
//!
//! Index rebuilds
//! - The index never stores references into the slot vector. Whenever the
//!   vector's allocation moves (growth by append or `reserve`, shrinking
//!   `reserve`) the index is rebuilt from the live slots; a deep `clone`
//!   indexes its new storage the same way. Rebuilds are logged at `debug`.
//!
//! Error semantics
//! - Lookups that require presence return [`LookupError`]: an unknown key
//!   is `KeyNotFound`, an unknown value is `ValueNotFound`.
//! - Removal of an absent key or value is a no-op returning `None`.
//! - Running out of representable keys is an [`InsertError`] from the
//!   `try_*` variants and a panic from `insert`/`emplace`.
//!
//! Reentrancy policy
//! - A debug-only guard wraps every section that calls user `Ord` code
//!   while the layers may disagree; re-entering the map from such code
//!   panics. `find_if` runs its predicate outside the guard, so the
//!   predicate may query the map.
//!
//! Panic safety
//! - User `Ord` code runs only while the layers agree. Insertion indexes
//!   the value before claiming its slot, removal unindexes before
//!   vacating, and a rebuild swaps in the new index only once complete.
//!   A panicking comparison leaves the map as it was before the call,
//!   except when the rebuild after a reallocating append fails: the new
//!   entry is then already stored and indexed, and stays.

mod error;
mod free_list;
mod id_bimap;
mod id_bimap_proptest;
mod iter;
mod key;
mod reentrancy;
mod slot_store;
mod value_index;

// Public surface
pub use error::{InsertError, LookupError};
pub use id_bimap::IdBimap;
pub use iter::{Iter, Keys, Values};
pub use key::Key;

/// Storage layers, exposed for benchmarks only.
#[cfg(feature = "bench_internal")]
pub mod layers {
    pub use crate::free_list::FreeList;
    pub use crate::slot_store::{Growth, SlotStore};
    pub use crate::value_index::{RebuildReason, ValueIndex};
}

/// Map from `String` values to `usize` keys.
pub type StringIdBimap = IdBimap<String>;

/// Map with single-byte keys; holds at most 256 live entries.
pub type ByteIdBimap<V> = IdBimap<V, u8>;
