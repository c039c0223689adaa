//! Initial store construction
//!
//! Every store starts with the two permanent channels, `general` and
//! `random`. Callers may merge extra channels and messages on top, e.g. to
//! warm-start a server or to set up a test.

use super::allocator::{IdAllocator, EXHAUSTED};
use super::errors::{ChatError, ChatResult};
use super::store::StateStore;
use super::types::{Channel, EntityId, Message};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Names of the permanent channels, in creation order
pub const SEED_CHANNEL_NAMES: [&str; 2] = ["general", "random"];

/// Caller-supplied initial state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub channels: Vec<Channel>,
    pub messages: Vec<Message>,
    pub current_channel_id: Option<EntityId>,
}

impl SeedData {
    /// Read seed data from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// The top of the id range is reserved by the allocator
fn check_seeded_id(id: EntityId) -> ChatResult<()> {
    if id.0 == EXHAUSTED {
        return Err(ChatError::InvalidInput(format!(
            "seeded id {} is outside the usable range",
            id
        )));
    }
    Ok(())
}

/// Build the initial store
///
/// Seed channels take the first two identifiers from `allocator`. Merged
/// entities keep their own ids and the allocator is advanced past them.
pub fn build_state(allocator: Arc<IdAllocator>, seed: SeedData) -> ChatResult<StateStore> {
    let mut channels = SEED_CHANNEL_NAMES
        .iter()
        .map(|name| Ok(Channel::new(allocator.next()?, *name, false)))
        .collect::<ChatResult<Vec<Channel>>>()?;
    let general_id = channels[0].id;

    let mut seen: HashSet<EntityId> = channels.iter().map(|c| c.id).collect();

    for channel in &seed.channels {
        check_seeded_id(channel.id)?;
        if !seen.insert(channel.id) {
            return Err(ChatError::DuplicateId(channel.id));
        }
    }
    channels.extend(seed.channels);

    let channel_ids: HashSet<EntityId> = channels.iter().map(|c| c.id).collect();
    for message in &seed.messages {
        check_seeded_id(message.id)?;
        if !seen.insert(message.id) {
            return Err(ChatError::DuplicateId(message.id));
        }
        if !channel_ids.contains(&message.channel_id) {
            return Err(ChatError::ChannelNotFound(message.channel_id));
        }
    }

    let current_channel_id = match seed.current_channel_id {
        Some(id) if channel_ids.contains(&id) => id,
        Some(id) => return Err(ChatError::ChannelNotFound(id)),
        None => general_id,
    };

    if let Some(max_id) = seen.iter().max() {
        allocator.advance_past(*max_id);
    }

    info!(
        channels = channels.len(),
        messages = seed.messages.len(),
        current_channel_id = %current_channel_id,
        "State bootstrapped"
    );

    Ok(StateStore::from_parts(
        allocator,
        channels,
        seed.messages,
        current_channel_id,
    ))
}
