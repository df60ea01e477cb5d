//! Configuration module for the capability tool
//!
//! Supports loading configuration from a TOML file.

use serde::Deserialize;
use std::path::Path;

use virtcaps::{CapsConfig, ConnectionContext};

/// Tool configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Parsing and labelling defaults handed to the library
    #[serde(default)]
    pub capabilities: CapsConfig,
}

/// Connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionConfig {
    /// Daemon URI the documents were taken from (default: qemu:///system)
    #[serde(default = "default_uri")]
    pub uri: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level filter (default: "virtcaps=warn,virtcaps_cli=info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_uri() -> String {
    virtcaps::connection::DEFAULT_URI.to_string()
}

fn default_log_level() -> String {
    "virtcaps=warn,virtcaps_cli=info".to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { uri: default_uri() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e.to_string()))
    }

    /// Build the connection context handed to the parsers
    pub fn context(&self) -> ConnectionContext {
        ConnectionContext::new(&self.connection.uri).with_config(self.capabilities.clone())
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    ReadError(String, String),
    ParseError(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, err) => {
                write!(f, "Failed to read config file '{}': {}", path, err)
            }
            ConfigError::ParseError(path, err) => {
                write!(f, "Failed to parse config file '{}': {}", path, err)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
