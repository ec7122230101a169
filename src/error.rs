//! Error types for lookups and insertions.

use thiserror::Error;

/// Failure of a lookup that requires the target to exist.
///
/// Removal never reports these: erasing an absent key or value is a no-op.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The key is outside the materialized slots or addresses a vacant slot.
    #[error("key not found: no live entry at index {index:?}")]
    KeyNotFound {
        /// Slot position of the key, or `None` if the key has no position.
        index: Option<usize>,
    },

    /// No live entry compares equal to the queried value.
    #[error("value not found")]
    ValueNotFound,
}

/// Failure to allocate a key for a new entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// Every key representable by the key type is held by a live entry.
    #[error("key space exhausted: key type cannot address slot {limit}")]
    KeySpaceExhausted {
        /// The first slot position the key type cannot represent.
        limit: usize,
    },
}
