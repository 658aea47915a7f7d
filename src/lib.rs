//! # catalyst-net
//!
//! Packet registry and framing codec for plugins that talk to each other (or
//! to a proxy) over plugin messaging channels.
//!
//! Payload types are registered against compact identifiers (integers,
//! strings, or namespaced keys). Encoding a packet produces one small binary
//! frame; decoding a frame gives back the typed packet.
//!
//! ## Wire Format
//! ```text
//! [HeaderLen(1)] [PayloadLen(2, BE)] [Identifier(HeaderLen)] [Body(PayloadLen)]
//! ```
//!
//! ## Modules
//! - [`core`]: identifier encoders, packet/schema types, payload codecs, frame layout
//! - [`protocol`]: the packet registry and the packet dispatcher
//! - [`transport`]: tokio-util stream framing over a registry
//! - [`config`]: TOML/env configuration
//! - [`utils`]: logging, metrics, scheduling
//!
//! ## Example
//! ```rust
//! use catalyst_net::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct SyncBalance { player: String, balance: i64 }
//! impl Packet for SyncBalance {}
//!
//! let mut registry = PacketRegistry::new(SerdeCodec::default(), KeyEncoder);
//! registry.register::<SyncBalance>(Key::parse("economy:sync_balance")?)?;
//!
//! let frame = registry.encode(&SyncBalance { player: "alex".into(), balance: 250 })?;
//! let packet = registry.decode(&frame)?;
//! assert!(packet.is::<SyncBalance>());
//! # Ok::<(), ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::core::packet::Packet;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::registry::PacketRegistry;

/// Commonly used types.
pub mod prelude {
    pub use crate::core::codec::{PacketCodec, RawCodec, SerdeCodec};
    pub use crate::core::key::Key;
    pub use crate::core::packet::{Packet, PacketType, RawPacket};
    pub use crate::core::primitive::{
        ByteEncoder, IntegerEncoder, KeyEncoder, PrimitiveEncoder, ShortEncoder, StringEncoder,
    };
    pub use crate::core::schema::PacketSchema;
    pub use crate::core::serialization::SerializationFormat;
    pub use crate::error::{CodecError, ProtocolError, Result};
    pub use crate::protocol::dispatcher::Dispatcher;
    pub use crate::protocol::registry::PacketRegistry;
    pub use crate::transport::framed::FrameCodec;
}
