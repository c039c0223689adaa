//! Request/Response types for the HTTP API
//!
//! Bodies use the `{ "data": { "type", "id", "attributes" } }` envelope the
//! web client already speaks.

use crate::core_chat::{Attributes, EntityId, Message};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributesBody<T> {
    pub attributes: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAttributes {
    pub name: String,
}

/// POST /channels and PATCH /channels/:id
pub type ChannelRequest = DataEnvelope<AttributesBody<ChannelAttributes>>;

/// POST /channels/:id/messages; any JSON object is accepted
pub type MessageRequest = DataEnvelope<AttributesBody<Attributes>>;

// ============================================================================
// Response Types
// ============================================================================

/// One entry of GET /channels/:id/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: EntityId,
    pub attributes: Message,
}

impl From<Message> for MessageResource {
    fn from(message: Message) -> Self {
        Self {
            resource_type: "messages".to_string(),
            id: message.id,
            attributes: message,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
