//! # Error Types
//!
//! Error handling for packet registration, framing, and payload codecs.
//!
//! Every failure in this crate is local and synchronous: an `encode` or
//! `decode` either produces a complete result or fails without touching
//! registry state. Nothing is retried internally.
//!
//! ## Error Categories
//! - **Codec Errors**: payload body could not be (de)serialized ([`CodecError`])
//! - **Registry Errors**: unregistered types, unknown identifiers, conflicting registrations
//! - **Framing Errors**: header/payload size limits, truncated frames
//! - **Identifier Errors**: malformed identifier bytes or namespaced keys
//!
//! ## Example Usage
//! ```rust
//! use catalyst_net::error::{ProtocolError, Result};
//! use tracing::warn;
//!
//! fn check(frame: &[u8]) -> Result<()> {
//!     if frame.len() < 3 {
//!         return Err(ProtocolError::TruncatedFrame {
//!             expected: 3,
//!             actual: frame.len(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! if let Err(e) = check(&[0x04]) {
//!     warn!(error = %e, "Dropping frame");
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Lock errors
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on dispatcher";

    /// Codec errors
    pub const ERR_EMPTY_IDENTIFIER: &str = "Identifier bytes are empty";
    pub const ERR_IDENTIFIER_NOT_UTF8: &str = "Identifier bytes are not valid UTF-8";

    /// Key errors
    pub const ERR_EMPTY_NAMESPACE: &str = "Key namespace cannot be empty";
    pub const ERR_EMPTY_VALUE: &str = "Key value cannot be empty";

    /// Runtime errors
    pub const ERR_NO_RUNTIME: &str = "Scheduler must be created inside a tokio runtime";
}

/// Failure inside a [`PacketCodec`](crate::core::codec::PacketCodec) while
/// turning a payload body into bytes or back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("No schema provided for {type_name}")]
    MissingSchema { type_name: &'static str },

    #[error("Codec expected a {expected} schema but was given {found}")]
    SchemaMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Deserialize error: {0}")]
    Deserialize(String),
}

// ProtocolError is the primary error type for all registry and framing operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Packet {type_name} is not registered")]
    UnregisteredPacket { type_name: &'static str },

    #[error("Received packet with unknown ID {0}")]
    UnknownPacketId(String),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Encoded identifier too large: {0} bytes (maximum 255)")]
    HeaderTooLarge(usize),

    #[error("Encoded payload too large: {size} bytes (maximum {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("No handler registered for {0}")]
    UnhandledPacket(&'static str),

    #[error("Synchronization primitive poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("No async runtime available: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_converts() {
        let err: ProtocolError = CodecError::MissingSchema { type_name: "Ping" }.into();
        assert!(matches!(
            err,
            ProtocolError::Codec(CodecError::MissingSchema { type_name: "Ping" })
        ));
        assert_eq!(err.to_string(), "Codec error: No schema provided for Ping");
    }

    #[test]
    fn test_payload_too_large_message() {
        let err = ProtocolError::PayloadTooLarge {
            size: 70_000,
            max: 65_535,
        };
        assert_eq!(
            err.to_string(),
            "Encoded payload too large: 70000 bytes (maximum 65535)"
        );
    }
}
