//! Core chat state: channels, messages and the mutations that change them
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ MutationService  │──► BroadcastSink (EventBroadcaster)
//! └────────┬─────────┘
//!          ▼
//!     StateStore ◄── IdAllocator
//!          ▲
//!      bootstrap
//! ```
//!
//! # Modules
//!
//! - [`allocator`] - process-wide identifier sequence
//! - [`store`] - ordered channel and message collections
//! - [`service`] - validation, apply, event production
//! - [`broadcaster`] - event fan-out to connected clients
//! - [`bootstrap`] - seed channels and optional warm-start data

pub mod allocator;
pub mod bootstrap;
pub mod broadcaster;
pub mod errors;
pub mod events;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod proptests;

// Re-exports
pub use allocator::IdAllocator;
pub use bootstrap::{build_state, SeedData, SEED_CHANNEL_NAMES};
pub use broadcaster::{BroadcastSink, EventBroadcaster};
pub use errors::{ChatError, ChatResult, ErrorKind};
pub use events::ChangeEvent;
pub use service::{Applied, MutationIntent, MutationService};
pub use store::StateStore;
pub use types::{Attributes, Channel, DeletedChannel, EntityId, Message, StateSnapshot};
