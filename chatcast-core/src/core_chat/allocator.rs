//! Identifier allocation
//!
//! One allocator is shared by bootstrap and the mutation service so channel
//! and message ids come from a single, strictly increasing sequence.

use super::errors::{ChatError, ChatResult};
use super::types::EntityId;
use std::sync::atomic::{AtomicU64, Ordering};

/// First identifier handed out by a fresh allocator
pub const FIRST_ID: u64 = 1;

/// Sentinel marking the sequence as used up; never handed out
pub const EXHAUSTED: u64 = u64::MAX;

/// Strictly increasing identifier source
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator starting at [`FIRST_ID`]
    pub fn new() -> Self {
        Self::starting_at(FIRST_ID)
    }

    /// Create an allocator whose first id is `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(FIRST_ID)),
        }
    }

    /// Hand out the next identifier
    ///
    /// Fails once the sequence reaches [`EXHAUSTED`]; it never wraps.
    pub fn next(&self) -> ChatResult<EntityId> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .map(EntityId)
            .map_err(|_| ChatError::IdsExhausted)
    }

    /// Make sure no future call returns `id` or anything below it
    ///
    /// Used after merging seed entities that carry their own ids.
    pub fn advance_past(&self, id: EntityId) {
        let floor = id.0.checked_add(1).unwrap_or(EXHAUSTED);
        self.next.fetch_max(floor, Ordering::SeqCst);
    }

    /// Identifier the next call to [`IdAllocator::next`] will return
    pub fn peek(&self) -> EntityId {
        EntityId(self.next.load(Ordering::SeqCst))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
