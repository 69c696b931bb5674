//! # Identifier Allocation and Lookup
//!
//! Ids are scoped to their enclosing collection: device ids are unique among
//! the document's devices, stage ids within one device's stage list. There is
//! no global id space.
//!
//! Allocation is `max + 1` with no locking. Callers that share a collection
//! across threads must serialize access themselves. Once `u64::MAX` is taken
//! the collection is full and allocation fails; ids are never reused.
//!
//! Lookups are linear scans. Collections stay in the tens of records, so no
//! index is kept.

use crate::{Device, SimuvidaError, Stage};

/// A record carrying an integer id.
pub trait Identified {
    fn id(&self) -> u64;
}

impl Identified for Device {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for Stage {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Next free id: one past the largest id present, or 1 for an empty slice.
///
/// Fails with `InvalidInput` when the largest id is already `u64::MAX`.
pub fn next_id<T: Identified>(items: &[T]) -> Result<u64, SimuvidaError> {
    match items.iter().map(Identified::id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| SimuvidaError::InvalidInput("id space exhausted".to_string())),
    }
}

/// First record whose id equals `id`.
pub fn find_by_id<T: Identified>(items: &[T], id: u64) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<T: Identified>(items: &mut [T], id: u64) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Index of the first record whose id equals `id`.
pub fn position_by_id<T: Identified>(items: &[T], id: u64) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// First id that appears more than once, if any.
pub fn first_duplicate_id<T: Identified>(items: &[T]) -> Option<u64> {
    let mut seen = std::collections::BTreeSet::new();
    items.iter().map(Identified::id).find(|id| !seen.insert(*id))
}

// =============================================================================
// TESTS
// =============================================================================
