//! Per-type serialization descriptors.
//!
//! Rust has no runtime reflection, so a codec cannot build a packet from
//! bytes knowing only its [`PacketType`]. A [`PacketSchema`] captures the
//! monomorphised functions for one concrete type at registration time and
//! hands them to the codec later through the type-erased registry.

use crate::core::packet::{Packet, PacketType, RawPacket};
use crate::core::serialization::SerializationFormat;
use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

type SerializeFn = fn(&dyn Packet, SerializationFormat) -> Result<Vec<u8>, CodecError>;
type DeserializeFn = fn(&[u8], SerializationFormat) -> Result<Box<dyn Packet>, CodecError>;
type WriteFn = fn(&dyn Packet) -> Result<Vec<u8>, CodecError>;
type ReadFn = fn(&[u8]) -> Result<Box<dyn Packet>, CodecError>;

/// Serialization descriptor attached to a registration.
#[derive(Debug, Clone, Copy)]
pub enum PacketSchema {
    /// Serde derive, for [`SerdeCodec`](crate::core::codec::SerdeCodec).
    Serde(SerdeSchema),
    /// Hand-written byte form, for [`RawCodec`](crate::core::codec::RawCodec).
    Raw(RawSchema),
}

impl PacketSchema {
    pub fn serde<T>() -> Self
    where
        T: Packet + Serialize + DeserializeOwned,
    {
        PacketSchema::Serde(SerdeSchema::of::<T>())
    }

    pub fn raw<T: RawPacket>() -> Self {
        PacketSchema::Raw(RawSchema::of::<T>())
    }

    /// The concrete type this schema (de)serializes.
    pub fn packet_type(&self) -> PacketType {
        match self {
            PacketSchema::Serde(s) => s.packet_type,
            PacketSchema::Raw(s) => s.packet_type,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PacketSchema::Serde(_) => "serde",
            PacketSchema::Raw(_) => "raw",
        }
    }
}

#[derive(Clone, Copy)]
pub struct SerdeSchema {
    packet_type: PacketType,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
}

impl SerdeSchema {
    pub fn of<T>() -> Self
    where
        T: Packet + Serialize + DeserializeOwned,
    {
        Self {
            packet_type: PacketType::of::<T>(),
            serialize: serialize_erased::<T>,
            deserialize: deserialize_erased::<T>,
        }
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn serialize(
        &self,
        packet: &dyn Packet,
        format: SerializationFormat,
    ) -> Result<Vec<u8>, CodecError> {
        (self.serialize)(packet, format)
    }

    pub fn deserialize(
        &self,
        bytes: &[u8],
        format: SerializationFormat,
    ) -> Result<Box<dyn Packet>, CodecError> {
        (self.deserialize)(bytes, format)
    }
}

impl std::fmt::Debug for SerdeSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SerdeSchema").field(&self.packet_type).finish()
    }
}

#[derive(Clone, Copy)]
pub struct RawSchema {
    packet_type: PacketType,
    write: WriteFn,
    read: ReadFn,
}

impl RawSchema {
    pub fn of<T: RawPacket>() -> Self {
        Self {
            packet_type: PacketType::of::<T>(),
            write: write_erased::<T>,
            read: read_erased::<T>,
        }
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn write(&self, packet: &dyn Packet) -> Result<Vec<u8>, CodecError> {
        (self.write)(packet)
    }

    pub fn read(&self, bytes: &[u8]) -> Result<Box<dyn Packet>, CodecError> {
        (self.read)(bytes)
    }
}

impl std::fmt::Debug for RawSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RawSchema").field(&self.packet_type).finish()
    }
}

fn concrete<T: Packet>(packet: &dyn Packet) -> Result<&T, CodecError> {
    packet
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: packet.packet_type().name(),
        })
}

fn serialize_erased<T>(
    packet: &dyn Packet,
    format: SerializationFormat,
) -> Result<Vec<u8>, CodecError>
where
    T: Packet + Serialize,
{
    format.serialize(concrete::<T>(packet)?)
}

fn deserialize_erased<T>(
    bytes: &[u8],
    format: SerializationFormat,
) -> Result<Box<dyn Packet>, CodecError>
where
    T: Packet + DeserializeOwned,
{
    let packet: T = format.deserialize(bytes)?;
    Ok(Box::new(packet))
}

fn write_erased<T: RawPacket>(packet: &dyn Packet) -> Result<Vec<u8>, CodecError> {
    Ok(concrete::<T>(packet)?.write_bytes())
}

fn read_erased<T: RawPacket>(bytes: &[u8]) -> Result<Box<dyn Packet>, CodecError> {
    Ok(Box::new(T::read_bytes(bytes)?))
}
