//! # Configuration Management
//!
//! Centralized configuration for packet codecs, framing limits, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`CATALYST_NET_*`)
//!
//! Both peers of a connection must agree on the codec format; nothing on the
//! wire identifies it.

use crate::core::codec::SerdeCodec;
use crate::core::frame::MAX_PAYLOAD_LENGTH;
use crate::core::serialization::SerializationFormat;
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    /// Payload codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Frame size limits
    #[serde(default)]
    pub framing: FramingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NetworkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(format) = std::env::var("CATALYST_NET_FORMAT") {
            config.codec.format = format.parse().map_err(ProtocolError::ConfigError)?;
        }

        if let Ok(size) = std::env::var("CATALYST_NET_MAX_PAYLOAD_SIZE") {
            config.framing.max_payload_size = size.parse::<usize>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid CATALYST_NET_MAX_PAYLOAD_SIZE: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("CATALYST_NET_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid CATALYST_NET_LOG_LEVEL: {level}"))
            })?;
        }

        if let Ok(json) = std::env::var("CATALYST_NET_LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.framing.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Payload codec configuration
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Serialization format for serde-backed packet bodies
    pub format: SerializationFormat,
}

impl CodecConfig {
    /// Build the serde codec described by this configuration
    pub fn serde_codec(&self) -> SerdeCodec {
        SerdeCodec::new(self.format)
    }
}

/// Frame size limits
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FramingConfig {
    /// Maximum encoded payload body in bytes; cannot exceed the 16-bit length field
    pub max_payload_size: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_LENGTH,
        }
    }
}

impl FramingConfig {
    /// Validate framing configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_payload_size == 0 {
            errors.push("Max payload size cannot be 0".to_string());
        } else if self.max_payload_size > MAX_PAYLOAD_LENGTH {
            errors.push(format!(
                "Max payload size too large: {} bytes (frame limit: {MAX_PAYLOAD_LENGTH})",
                self.max_payload_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("catalyst-net"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
