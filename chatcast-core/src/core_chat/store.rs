//! Authoritative in-memory state
//!
//! `StateStore` is a plain owned structure; exclusive access (`&mut self`)
//! is what makes each mutation atomic. The mutation service keeps it behind
//! a single lock so readers never see a half-applied cascade.

use super::allocator::IdAllocator;
use super::errors::{ChatError, ChatResult};
use super::types::{Attributes, Channel, DeletedChannel, EntityId, Message, StateSnapshot};
use std::sync::Arc;
use tracing::debug;

/// Ordered channels and messages plus the initially focused channel
#[derive(Debug)]
pub struct StateStore {
    allocator: Arc<IdAllocator>,
    channels: Vec<Channel>,
    messages: Vec<Message>,
    current_channel_id: EntityId,
}

impl StateStore {
    /// Assemble a store from already validated parts
    ///
    /// Bootstrap is the only caller; it guarantees ids are unique, messages
    /// reference existing channels and the allocator is past every id used.
    pub(crate) fn from_parts(
        allocator: Arc<IdAllocator>,
        channels: Vec<Channel>,
        messages: Vec<Message>,
        current_channel_id: EntityId,
    ) -> Self {
        Self {
            allocator,
            channels,
            messages,
            current_channel_id,
        }
    }

    /// Channels in insertion order
    pub fn list_channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn get_channel(&self, id: EntityId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn contains_channel(&self, id: EntityId) -> bool {
        self.get_channel(id).is_some()
    }

    /// Messages of one channel in insertion order
    ///
    /// An unknown channel simply has no messages.
    pub fn list_messages(&self, channel_id: EntityId) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .collect()
    }

    /// Every message in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn current_channel_id(&self) -> EntityId {
        self.current_channel_id
    }

    pub fn create_channel(&mut self, name: impl Into<String>, removable: bool) -> ChatResult<Channel> {
        let channel = Channel::new(self.allocator.next()?, name, removable);
        self.channels.push(channel.clone());
        debug!(channel_id = %channel.id, "Channel stored");
        Ok(channel)
    }

    pub fn rename_channel(&mut self, id: EntityId, new_name: impl Into<String>) -> ChatResult<Channel> {
        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ChatError::ChannelNotFound(id))?;

        channel.name = new_name.into();
        Ok(channel.clone())
    }

    /// Remove a channel together with all of its messages
    pub fn delete_channel(&mut self, id: EntityId) -> ChatResult<DeletedChannel> {
        let channel = self.get_channel(id).ok_or(ChatError::ChannelNotFound(id))?;
        if !channel.removable {
            return Err(ChatError::ChannelNotRemovable(id));
        }

        let cascaded_message_ids: Vec<EntityId> = self
            .messages
            .iter()
            .filter(|m| m.channel_id == id)
            .map(|m| m.id)
            .collect();

        self.channels.retain(|c| c.id != id);
        self.messages.retain(|m| m.channel_id != id);

        debug!(
            channel_id = %id,
            cascaded = cascaded_message_ids.len(),
            "Channel removed"
        );

        Ok(DeletedChannel {
            id,
            cascaded_message_ids,
        })
    }

    pub fn create_message(&mut self, channel_id: EntityId, attributes: Attributes) -> ChatResult<Message> {
        if !self.contains_channel(channel_id) {
            return Err(ChatError::ChannelNotFound(channel_id));
        }

        let message = Message::new(self.allocator.next()?, channel_id, attributes);
        self.messages.push(message.clone());
        Ok(message)
    }

    /// Copy of the whole state for late joiners
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            channels: self.channels.clone(),
            messages: self.messages.clone(),
            current_channel_id: self.current_channel_id,
        }
    }
}
