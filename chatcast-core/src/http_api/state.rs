//! Shared state for the HTTP API

use crate::config::Config;
use crate::core_chat::{build_state, EventBroadcaster, IdAllocator, MutationService, SeedData};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Server state shared across requests
#[derive(Clone)]
pub struct AppState {
    /// Owner of channels and messages
    pub service: Arc<MutationService>,

    /// Event fan-out; every event stream subscribes here
    pub broadcaster: EventBroadcaster,

    /// Keep-alive interval for event streams
    pub keep_alive: Duration,
}

impl AppState {
    /// Bootstrap a store from `seed` and wire it to a fresh broadcaster
    pub fn new(seed: SeedData, capacity: usize, keep_alive: Duration) -> Result<Self> {
        let allocator = Arc::new(IdAllocator::new());
        let store = build_state(allocator, seed)?;
        let broadcaster = EventBroadcaster::new(capacity);
        let service = Arc::new(MutationService::new(store, Arc::new(broadcaster.clone())));

        Ok(Self {
            service,
            broadcaster,
            keep_alive,
        })
    }

    /// Build state from application config, loading the seed file if set
    pub fn from_config(config: &Config) -> Result<Self> {
        let seed = match &config.seed.seed_file {
            Some(path) => {
                info!(path = %path.display(), "Loading seed data");
                SeedData::from_file(path)
                    .with_context(|| format!("Failed to load seed file {}", path.display()))?
            }
            None => SeedData::default(),
        };

        Self::new(seed, config.broadcast.capacity, config.broadcast.keep_alive)
    }
}
