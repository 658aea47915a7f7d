//! # Core Protocol Components
//!
//! Identifier encoding, payload codecs, and the binary frame layout.
//!
//! ## Components
//! - **Key**: Namespaced `namespace:value` identifiers
//! - **Primitive**: Identifier encoders for the frame header
//! - **Packet**: Type-erased payload trait and runtime packet types
//! - **Schema**: Per-type serialization descriptors
//! - **Serialization**: Bincode, JSON, and MessagePack formats
//! - **Codec**: Payload body codecs
//! - **Frame**: Header layout and size limits
//!
//! ## Wire Format
//! ```text
//! [HeaderLen(1)] [PayloadLen(2)] [Header(HeaderLen)] [Payload(PayloadLen)]
//! ```
//!
//! ## Limits
//! - Encoded identifier: at most 255 bytes
//! - Encoded payload: at most 65535 bytes

pub mod codec;
pub mod frame;
pub mod key;
pub mod packet;
pub mod primitive;
pub mod schema;
pub mod serialization;
