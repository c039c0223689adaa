//! Configuration error types

use thiserror::Error;

/// Errors raised while loading, validating or saving [`super::Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read configuration file: {0}")]
    FileReadError(String),

    /// The config file could not be written
    #[error("Failed to write configuration file: {0}")]
    FileWriteError(String),

    /// The file is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// An environment override could not be parsed
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Values parsed but are out of range
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
