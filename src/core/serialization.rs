//! # Serialization Formats
//!
//! Serde-backed formats available to [`SerdeCodec`](crate::core::codec::SerdeCodec)
//! for packet bodies. Bincode is the default; JSON and MessagePack are
//! available for debugging and for peers written in other languages.
//!
//! ## Performance Characteristics
//! - **Bincode**: fastest, binary, not self-describing
//! - **MessagePack**: compact, binary, self-describing
//! - **JSON**: human-readable, largest
//!
//! The format is a property of the codec, not of the frame: both peers must
//! agree on it out of band (see [`CodecConfig`](crate::config::CodecConfig)).

use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format (default, fastest)
    #[default]
    Bincode,
    /// Human-readable JSON format (debugging, interop)
    Json,
    /// Compact binary format (MessagePack, efficient)
    MessagePack,
}

impl SerializationFormat {
    /// Get human-readable format name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
        }
    }

    pub fn serialize<T: Serialize>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            SerializationFormat::Bincode => {
                bincode::serialize(value).map_err(|e| CodecError::Serialize(e.to_string()))
            }
            SerializationFormat::Json => {
                serde_json::to_vec(value).map_err(|e| CodecError::Serialize(e.to_string()))
            }
            SerializationFormat::MessagePack => {
                rmp_serde::to_vec(value).map_err(|e| CodecError::Serialize(e.to_string()))
            }
        }
    }

    pub fn deserialize<T: DeserializeOwned>(self, data: &[u8]) -> Result<T, CodecError> {
        match self {
            SerializationFormat::Bincode => {
                bincode::deserialize(data).map_err(|e| CodecError::Deserialize(e.to_string()))
            }
            SerializationFormat::Json => {
                serde_json::from_slice(data).map_err(|e| CodecError::Deserialize(e.to_string()))
            }
            SerializationFormat::MessagePack => {
                rmp_serde::from_slice(data).map_err(|e| CodecError::Deserialize(e.to_string()))
            }
        }
    }
}

impl FromStr for SerializationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bincode" => Ok(SerializationFormat::Bincode),
            "json" => Ok(SerializationFormat::Json),
            "messagepack" | "msgpack" => Ok(SerializationFormat::MessagePack),
            other => Err(format!("Unknown serialization format: {other}")),
        }
    }
}
