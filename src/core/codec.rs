//! # Packet Codecs
//!
//! A [`PacketCodec`] turns a packet *body* into bytes and back. It knows
//! nothing about identifiers or frame headers; those belong to the
//! [`PacketRegistry`](crate::protocol::registry::PacketRegistry).
//!
//! ## Implementations
//! - [`SerdeCodec`]: serde object graph in a configurable [`SerializationFormat`]
//! - [`RawCodec`]: the packet's own hand-written byte form ([`RawPacket`](crate::core::packet::RawPacket))
//!
//! Both need the [`PacketSchema`] supplied at registration; a codec called
//! without one fails with [`CodecError::MissingSchema`].

use crate::core::packet::{Packet, PacketType};
use crate::core::schema::PacketSchema;
use crate::core::serialization::SerializationFormat;
use crate::error::CodecError;

/// Strategy for serializing packet bodies.
pub trait PacketCodec: Send + Sync {
    /// Encode a packet body, using `schema` when the strategy needs one.
    fn encode(
        &self,
        packet: &dyn Packet,
        schema: Option<&PacketSchema>,
    ) -> Result<Vec<u8>, CodecError>;

    /// Decode a body into a packet of type `target`.
    fn decode(
        &self,
        bytes: &[u8],
        target: &PacketType,
        schema: Option<&PacketSchema>,
    ) -> Result<Box<dyn Packet>, CodecError>;
}

fn check_target(target: &PacketType, schema: &PacketSchema) -> Result<(), CodecError> {
    if schema.packet_type() != *target {
        return Err(CodecError::TypeMismatch {
            expected: target.name(),
            found: schema.packet_type().name(),
        });
    }
    Ok(())
}

/// Serde-based codec; bincode unless configured otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeCodec {
    format: SerializationFormat,
}

impl SerdeCodec {
    pub fn new(format: SerializationFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }
}

impl PacketCodec for SerdeCodec {
    fn encode(
        &self,
        packet: &dyn Packet,
        schema: Option<&PacketSchema>,
    ) -> Result<Vec<u8>, CodecError> {
        match schema {
            Some(PacketSchema::Serde(schema)) => schema.serialize(packet, self.format),
            Some(other) => Err(CodecError::SchemaMismatch {
                expected: "serde",
                found: other.kind(),
            }),
            None => Err(CodecError::MissingSchema {
                type_name: packet.packet_type().name(),
            }),
        }
    }

    fn decode(
        &self,
        bytes: &[u8],
        target: &PacketType,
        schema: Option<&PacketSchema>,
    ) -> Result<Box<dyn Packet>, CodecError> {
        let schema = schema.ok_or(CodecError::MissingSchema {
            type_name: target.name(),
        })?;
        check_target(target, schema)?;
        match schema {
            PacketSchema::Serde(schema) => schema.deserialize(bytes, self.format),
            other => Err(CodecError::SchemaMismatch {
                expected: "serde",
                found: other.kind(),
            }),
        }
    }
}

/// Codec for packets that write their own bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl PacketCodec for RawCodec {
    fn encode(
        &self,
        packet: &dyn Packet,
        schema: Option<&PacketSchema>,
    ) -> Result<Vec<u8>, CodecError> {
        match schema {
            Some(PacketSchema::Raw(schema)) => schema.write(packet),
            Some(other) => Err(CodecError::SchemaMismatch {
                expected: "raw",
                found: other.kind(),
            }),
            None => Err(CodecError::MissingSchema {
                type_name: packet.packet_type().name(),
            }),
        }
    }

    fn decode(
        &self,
        bytes: &[u8],
        target: &PacketType,
        schema: Option<&PacketSchema>,
    ) -> Result<Box<dyn Packet>, CodecError> {
        let schema = schema.ok_or(CodecError::MissingSchema {
            type_name: target.name(),
        })?;
        check_target(target, schema)?;
        match schema {
            PacketSchema::Raw(schema) => schema.read(bytes),
            other => Err(CodecError::SchemaMismatch {
                expected: "raw",
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::packet::RawPacket;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Teleport {
        x: i32,
        y: i32,
        z: i32,
    }
    impl Packet for Teleport {}

    #[derive(Debug, PartialEq)]
    struct Text(String);
    impl Packet for Text {}
    impl RawPacket for Text {
        fn write_bytes(&self) -> Vec<u8> {
            self.0.as_bytes().to_vec()
        }

        fn read_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
            String::from_utf8(bytes.to_vec())
                .map(Text)
                .map_err(|e| CodecError::Deserialize(e.to_string()))
        }
    }

    #[test]
    fn test_serde_codec_roundtrip() {
        let codec = SerdeCodec::default();
        let schema = PacketSchema::serde::<Teleport>();
        let packet = Teleport { x: 1, y: 64, z: -9 };

        let bytes = codec.encode(&packet, Some(&schema)).unwrap();
        let back = codec
            .decode(&bytes, &PacketType::of::<Teleport>(), Some(&schema))
            .unwrap();
        assert_eq!(back.downcast_ref::<Teleport>(), Some(&packet));
    }

    #[test]
    fn test_serde_codec_requires_schema() {
        let codec = SerdeCodec::new(SerializationFormat::MessagePack);
        let err = codec.encode(&Teleport { x: 0, y: 0, z: 0 }, None).unwrap_err();
        assert!(matches!(err, CodecError::MissingSchema { .. }));

        let err = codec
            .decode(&[], &PacketType::of::<Teleport>(), None)
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingSchema { .. }));
    }

    #[test]
    fn test_codec_rejects_other_schema_kind() {
        let raw = PacketSchema::raw::<Text>();
        let err = SerdeCodec::default()
            .encode(&Text("a".into()), Some(&raw))
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::SchemaMismatch {
                expected: "serde",
                found: "raw"
            }
        );

        let serde = PacketSchema::serde::<Teleport>();
        let err = RawCodec
            .encode(&Teleport { x: 0, y: 0, z: 0 }, Some(&serde))
            .unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { expected: "raw", .. }));
    }

    #[test]
    fn test_decode_checks_target_type() {
        let schema = PacketSchema::raw::<Text>();
        let err = RawCodec
            .decode(b"hi", &PacketType::of::<Teleport>(), Some(&schema))
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_raw_codec_writes_packet_bytes() {
        let schema = PacketSchema::raw::<Text>();
        let bytes = RawCodec.encode(&Text("hi".into()), Some(&schema)).unwrap();
        assert_eq!(bytes, vec![0x68, 0x69]);
    }

    #[test]
    fn test_malformed_body_is_deserialize_error() {
        let codec = SerdeCodec::default();
        let schema = PacketSchema::serde::<Teleport>();
        let err = codec
            .decode(&[1, 2], &PacketType::of::<Teleport>(), Some(&schema))
            .unwrap_err();
        assert!(matches!(err, CodecError::Deserialize(_)));
    }
}
