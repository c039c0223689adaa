//! Prints the change events a connected client would receive
//!
//! Run with:
//! ```bash
//! cargo run --example event_feed
//! ```

use chatcast_core::core_chat::{
    build_state, Attributes, EventBroadcaster, IdAllocator, MutationService, SeedData,
};
use chatcast_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging_with_config(LogConfig::new(LogLevel::Debug).with_target(true))?;

    let store = build_state(Arc::new(IdAllocator::new()), SeedData::default())?;
    let broadcaster = EventBroadcaster::new(16);
    let service = MutationService::new(store, Arc::new(broadcaster.clone()));
    let mut feed = broadcaster.subscribe();

    let dev = service.create_channel("dev").await?;
    let mut attrs = Attributes::new();
    attrs.insert("body".to_string(), json!("hello"));
    service.create_message(dev.id, attrs).await?;
    service.rename_channel(dev.id, "ops").await?;
    service.delete_channel(dev.id).await?;

    // Rejected, so nothing shows up on the feed
    let _ = service.delete_channel(1.into()).await;

    while let Ok(event) = feed.try_recv() {
        info!(event = event.wire_name(), payload = %event.envelope(), "Change event");
    }

    Ok(())
}
