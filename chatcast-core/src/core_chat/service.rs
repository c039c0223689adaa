//! Mutation Service - validates intents, applies them, announces the change
//!
//! # Flow
//!
//! ```text
//! intent ──► validate ──► StateStore ──► (result, ChangeEvent)
//!                                              │         │
//!                                           caller   BroadcastSink
//! ```
//!
//! The `apply_*` functions are pure with respect to the outside world: they
//! take the store and return the direct result together with the event.
//! [`MutationService`] runs them under the store's write lock and forwards
//! the event to the sink before releasing it, so the broadcast order always
//! matches the order mutations were applied in.

use super::broadcaster::BroadcastSink;
use super::errors::{ChatError, ChatResult};
use super::events::ChangeEvent;
use super::store::StateStore;
use super::types::{Attributes, Channel, DeletedChannel, EntityId, Message, StateSnapshot};
use crate::metrics::{MUTATIONS_APPLIED, MUTATIONS_REJECTED};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Longest accepted channel name, in characters
pub const MAX_CHANNEL_NAME_LEN: usize = 100;

/// A request to change channels or messages
#[derive(Debug, Clone, PartialEq)]
pub enum MutationIntent {
    CreateChannel { name: String },
    RenameChannel { id: EntityId, name: String },
    DeleteChannel { id: EntityId },
    CreateMessage { channel_id: EntityId, attributes: Attributes },
}

impl MutationIntent {
    pub fn label(&self) -> &'static str {
        match self {
            MutationIntent::CreateChannel { .. } => "create_channel",
            MutationIntent::RenameChannel { .. } => "rename_channel",
            MutationIntent::DeleteChannel { .. } => "delete_channel",
            MutationIntent::CreateMessage { .. } => "create_message",
        }
    }
}

/// An accepted mutation: what the caller gets back and what gets broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub result: T,
    pub event: ChangeEvent,
}

fn validate_channel_name(name: &str) -> ChatResult<()> {
    if name.trim().is_empty() {
        return Err(ChatError::InvalidChannelName("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_CHANNEL_NAME_LEN {
        return Err(ChatError::InvalidChannelName(format!(
            "name longer than {} characters",
            MAX_CHANNEL_NAME_LEN
        )));
    }
    Ok(())
}

pub fn apply_create_channel(store: &mut StateStore, name: String) -> ChatResult<Applied<Channel>> {
    validate_channel_name(&name)?;

    let channel = store.create_channel(name, true)?;
    Ok(Applied {
        event: ChangeEvent::ChannelCreated(channel.clone()),
        result: channel,
    })
}

pub fn apply_rename_channel(
    store: &mut StateStore,
    id: EntityId,
    name: String,
) -> ChatResult<Applied<Channel>> {
    if !store.contains_channel(id) {
        return Err(ChatError::ChannelNotFound(id));
    }
    validate_channel_name(&name)?;

    let channel = store.rename_channel(id, name)?;
    Ok(Applied {
        event: ChangeEvent::ChannelRenamed(channel.clone()),
        result: channel,
    })
}

pub fn apply_delete_channel(store: &mut StateStore, id: EntityId) -> ChatResult<Applied<DeletedChannel>> {
    let channel = store.get_channel(id).ok_or(ChatError::ChannelNotFound(id))?;
    if !channel.removable {
        return Err(ChatError::ChannelNotRemovable(id));
    }

    let deleted = store.delete_channel(id)?;
    Ok(Applied {
        event: ChangeEvent::ChannelDeleted(deleted.clone()),
        result: deleted,
    })
}

pub fn apply_create_message(
    store: &mut StateStore,
    channel_id: EntityId,
    attributes: Attributes,
) -> ChatResult<Applied<Message>> {
    if !store.contains_channel(channel_id) {
        return Err(ChatError::ChannelNotFound(channel_id));
    }

    let message = store.create_message(channel_id, attributes)?;
    Ok(Applied {
        event: ChangeEvent::MessageCreated(message.clone()),
        result: message,
    })
}

/// Apply any intent, returning only its event
pub fn apply(store: &mut StateStore, intent: MutationIntent) -> ChatResult<ChangeEvent> {
    let event = match intent {
        MutationIntent::CreateChannel { name } => apply_create_channel(store, name)?.event,
        MutationIntent::RenameChannel { id, name } => apply_rename_channel(store, id, name)?.event,
        MutationIntent::DeleteChannel { id } => apply_delete_channel(store, id)?.event,
        MutationIntent::CreateMessage {
            channel_id,
            attributes,
        } => apply_create_message(store, channel_id, attributes)?.event,
    };
    Ok(event)
}

/// Single owner of the state store
///
/// Mutations are serialized through one write lock held across
/// validate, apply and publish. Reads share the read lock.
pub struct MutationService {
    state: RwLock<StateStore>,
    sink: Arc<dyn BroadcastSink>,
}

impl MutationService {
    pub fn new(store: StateStore, sink: Arc<dyn BroadcastSink>) -> Self {
        Self {
            state: RwLock::new(store),
            sink,
        }
    }

    async fn commit<T>(
        &self,
        intent: &'static str,
        mutate: impl FnOnce(&mut StateStore) -> ChatResult<Applied<T>>,
    ) -> ChatResult<T> {
        let mut state = self.state.write().await;

        match mutate(&mut *state) {
            Ok(Applied { result, event }) => {
                info!(
                    intent,
                    entity_id = %event.entity_id(),
                    event = event.wire_name(),
                    "Mutation applied"
                );
                ::metrics::counter!(MUTATIONS_APPLIED, "intent" => intent).increment(1);
                self.sink.publish(event);
                Ok(result)
            }
            Err(e) => {
                warn!(intent, error = %e, "Mutation rejected");
                ::metrics::counter!(MUTATIONS_REJECTED, "intent" => intent).increment(1);
                Err(e)
            }
        }
    }

    pub async fn create_channel(&self, name: impl Into<String>) -> ChatResult<Channel> {
        let name = name.into();
        self.commit("create_channel", |store| apply_create_channel(store, name))
            .await
    }

    pub async fn rename_channel(&self, id: EntityId, name: impl Into<String>) -> ChatResult<Channel> {
        let name = name.into();
        self.commit("rename_channel", |store| apply_rename_channel(store, id, name))
            .await
    }

    pub async fn delete_channel(&self, id: EntityId) -> ChatResult<DeletedChannel> {
        self.commit("delete_channel", |store| apply_delete_channel(store, id))
            .await
    }

    pub async fn create_message(&self, channel_id: EntityId, attributes: Attributes) -> ChatResult<Message> {
        self.commit("create_message", |store| {
            apply_create_message(store, channel_id, attributes)
        })
        .await
    }

    /// Apply an arbitrary intent and return the event that was broadcast
    pub async fn submit(&self, intent: MutationIntent) -> ChatResult<ChangeEvent> {
        let label = intent.label();
        self.commit(label, |store| {
            let event = apply(store, intent)?;
            Ok(Applied {
                result: event.clone(),
                event,
            })
        })
        .await
    }

    pub async fn list_channels(&self) -> Vec<Channel> {
        self.state.read().await.list_channels().to_vec()
    }

    pub async fn list_messages(&self, channel_id: EntityId) -> Vec<Message> {
        let messages = self.state.read().await.list_messages(channel_id);
        debug!(channel_id = %channel_id, count = messages.len(), "Listed messages");
        messages
    }

    /// Everything a newly connected client needs to render
    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.read().await.snapshot()
    }
}
