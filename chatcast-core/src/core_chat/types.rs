//! Channel and message models held by the state store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Process-wide unique identifier shared by channels and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Free-form message attributes (author, body, ...)
pub type Attributes = Map<String, Value>;

/// A chat channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Allocated at creation, never changes
    pub id: EntityId,

    /// Display name, changed through rename
    pub name: String,

    /// `false` only for the seed channels
    pub removable: bool,
}

impl Channel {
    pub fn new(id: EntityId, name: impl Into<String>, removable: bool) -> Self {
        Self {
            id,
            name: name.into(),
            removable,
        }
    }
}

/// A message posted to a channel
///
/// The core owns `id` and `channel_id`; everything else the client sent is
/// kept verbatim in `attributes` and flattened back out on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub channel_id: EntityId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Message {
    /// Build a message, dropping any client-supplied `id`/`channelId` keys
    pub fn new(id: EntityId, channel_id: EntityId, mut attributes: Attributes) -> Self {
        attributes.remove("id");
        attributes.remove("channelId");
        Self {
            id,
            channel_id,
            attributes,
        }
    }
}

/// Result of a channel delete: the channel and every message cascaded with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedChannel {
    pub id: EntityId,
    pub cascaded_message_ids: Vec<EntityId>,
}

/// Full read model handed to newly connecting clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub channels: Vec<Channel>,
    pub messages: Vec<Message>,
    pub current_channel_id: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_flat() {
        let mut attrs = Attributes::new();
        attrs.insert("body".to_string(), json!("hi"));
        attrs.insert("author".to_string(), json!("alice"));

        let msg = Message::new(EntityId(4), EntityId(3), attrs);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            value,
            json!({ "id": 4, "channelId": 3, "body": "hi", "author": "alice" })
        );
    }

    #[test]
    fn test_message_drops_reserved_keys() {
        let mut attrs = Attributes::new();
        attrs.insert("id".to_string(), json!(999));
        attrs.insert("channelId".to_string(), json!(998));
        attrs.insert("body".to_string(), json!("hi"));

        let msg = Message::new(EntityId(4), EntityId(3), attrs);

        assert_eq!(msg.id, EntityId(4));
        assert_eq!(msg.channel_id, EntityId(3));
        assert_eq!(msg.attributes.len(), 1);
    }

    #[test]
    fn test_message_deserializes_from_flat_json() {
        let msg: Message =
            serde_json::from_value(json!({ "id": 7, "channelId": 1, "body": "seeded" })).unwrap();

        assert_eq!(msg.id, EntityId(7));
        assert_eq!(msg.channel_id, EntityId(1));
        assert_eq!(msg.attributes.get("body"), Some(&json!("seeded")));
    }

    #[test]
    fn test_deleted_channel_wire_names() {
        let deleted = DeletedChannel {
            id: EntityId(3),
            cascaded_message_ids: vec![EntityId(4)],
        };
        assert_eq!(
            serde_json::to_value(&deleted).unwrap(),
            json!({ "id": 3, "cascadedMessageIds": [4] })
        );
    }
}
