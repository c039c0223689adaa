//! Change events
//!
//! One event is produced for every accepted mutation. Subscribers use them
//! to keep their local view of channels and messages in sync.

use super::types::{Channel, DeletedChannel, EntityId, Message};
use serde_json::{json, Value};

/// Change event type
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    /// A channel was created
    ChannelCreated(Channel),

    /// A channel was renamed; carries the post-rename channel
    ChannelRenamed(Channel),

    /// A channel and its messages were removed
    ChannelDeleted(DeletedChannel),

    /// A message was posted
    MessageCreated(Message),
}

impl ChangeEvent {
    /// Name clients listen for on the event stream
    pub fn wire_name(&self) -> &'static str {
        match self {
            ChangeEvent::ChannelCreated(_) => "newChannel",
            ChangeEvent::ChannelRenamed(_) => "renameChannel",
            ChangeEvent::ChannelDeleted(_) => "removeChannel",
            ChangeEvent::MessageCreated(_) => "newMessage",
        }
    }

    /// Identifier of the entity the event is about
    pub fn entity_id(&self) -> EntityId {
        match self {
            ChangeEvent::ChannelCreated(c) | ChangeEvent::ChannelRenamed(c) => c.id,
            ChangeEvent::ChannelDeleted(d) => d.id,
            ChangeEvent::MessageCreated(m) => m.id,
        }
    }

    /// Resource type in the `{ data: { type, id, attributes } }` envelope
    pub fn resource_type(&self) -> &'static str {
        match self {
            ChangeEvent::MessageCreated(_) => "messages",
            _ => "channels",
        }
    }

    /// Envelope sent to clients; identical to the HTTP success body
    pub fn envelope(&self) -> Value {
        let attributes = match self {
            ChangeEvent::ChannelCreated(c) | ChangeEvent::ChannelRenamed(c) => json!(c),
            ChangeEvent::ChannelDeleted(d) => json!(d),
            ChangeEvent::MessageCreated(m) => json!(m),
        };

        json!({
            "data": {
                "type": self.resource_type(),
                "id": self.entity_id(),
                "attributes": attributes,
            }
        })
    }
}
