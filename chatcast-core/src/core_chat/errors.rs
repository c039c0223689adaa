//! Error types for channel and message mutations

use super::types::EntityId;
use thiserror::Error;

/// Result type for chat state operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing fields
    InvalidInput,
    /// Referenced entity does not exist
    NotFound,
    /// Entity exists but the operation is not allowed on it
    Forbidden,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Forbidden => "Forbidden",
        }
    }
}

/// Errors returned by the state store and mutation service
///
/// None of these leave the store modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Channel name empty, blank or too long
    #[error("Invalid channel name: {0}")]
    InvalidChannelName(String),

    /// Request payload is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two seeded entities share one identifier
    #[error("Duplicate identifier: {0}")]
    DuplicateId(EntityId),

    /// Channel not found
    #[error("Channel not found: {0}")]
    ChannelNotFound(EntityId),

    /// Channel is one of the permanent seed channels
    #[error("Channel {0} cannot be removed")]
    ChannelNotRemovable(EntityId),

    /// Identifier sequence used up; nothing more can be created
    #[error("Identifier space exhausted")]
    IdsExhausted,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::InvalidChannelName(_)
            | ChatError::InvalidInput(_)
            | ChatError::DuplicateId(_)
            | ChatError::IdsExhausted => ErrorKind::InvalidInput,
            ChatError::ChannelNotFound(_) => ErrorKind::NotFound,
            ChatError::ChannelNotRemovable(_) => ErrorKind::Forbidden,
        }
    }
}
