//! Configuration management for chatcast
//!
//! This module provides file and environment based configuration with
//! defaults and validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Event fan-out configuration
    pub broadcast: BroadcastConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Warm-start data
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Graceful shutdown timeout
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Broadcast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Events buffered per subscriber before it starts lagging
    pub capacity: usize,

    /// Interval between keep-alive comments on the event stream
    #[serde(with = "humantime_serde")]
    pub keep_alive: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

/// Seed configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON file with extra channels/messages merged at startup
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            keep_alive: Duration::from_secs(15),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_target: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: CHATCAST_<SECTION>_<KEY>
    /// Example: CHATCAST_SERVER_BIND_ADDRESS=0.0.0.0:3000
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `CHATCAST_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server config
        if let Ok(addr) = env::var("CHATCAST_SERVER_BIND_ADDRESS") {
            self.server.bind_address = addr
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid bind address: {}", e)))?;
        }
        if let Ok(timeout) = env::var("CHATCAST_SERVER_SHUTDOWN_TIMEOUT") {
            self.server.shutdown_timeout = humantime::parse_duration(&timeout)
                .map_err(|e| {
                    ConfigError::InvalidValue(format!("Invalid shutdown timeout: {}", e))
                })?;
        }

        // Broadcast config
        if let Ok(capacity) = env::var("CHATCAST_BROADCAST_CAPACITY") {
            self.broadcast.capacity = capacity.parse().map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid broadcast capacity: {}", e))
            })?;
        }

        // Logging config
        if let Ok(level) = env::var("CHATCAST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("CHATCAST_LOG_JSON") {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        // Seed config
        if let Ok(path) = env::var("CHATCAST_SEED_FILE") {
            self.seed.seed_file = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broadcast.capacity == 0 {
            return Err(ConfigError::ValidationFailed(
                "broadcast capacity must be greater than 0".to_string(),
            ));
        }

        if self.broadcast.keep_alive.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "keep_alive must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}
