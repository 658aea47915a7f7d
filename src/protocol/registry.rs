//! # Packet Registry
//!
//! Binds packet types to wire identifiers and performs the outer framing.
//!
//! A registry is populated once, during plugin start-up, through `&mut self`
//! registration calls. Afterwards it is shared immutably (typically behind an
//! `Arc`) and `encode`/`decode` may run from any number of threads.
//!
//! ```rust
//! use catalyst_net::core::codec::SerdeCodec;
//! use catalyst_net::core::packet::Packet;
//! use catalyst_net::core::primitive::IntegerEncoder;
//! use catalyst_net::protocol::registry::PacketRegistry;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Ping { seq: u32 }
//! impl Packet for Ping {}
//!
//! let mut registry = PacketRegistry::new(SerdeCodec::default(), IntegerEncoder);
//! registry.register::<Ping>(1)?;
//!
//! let frame = registry.encode(&Ping { seq: 7 })?;
//! let ping: Ping = registry.decode_as(&frame)?;
//! assert_eq!(ping, Ping { seq: 7 });
//! # Ok::<(), catalyst_net::error::ProtocolError>(())
//! ```

use crate::config::FramingConfig;
use crate::core::codec::PacketCodec;
use crate::core::frame::{FrameHeader, MAX_HEADER_LENGTH, MAX_PAYLOAD_LENGTH};
use crate::core::packet::{Packet, PacketType, RawPacket};
use crate::core::primitive::PrimitiveEncoder;
use crate::core::schema::PacketSchema;
use crate::error::{CodecError, ProtocolError, Result};
use crate::utils::metrics::global_metrics;
use bytes::BytesMut;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, warn};

/// One registered packet: identifier, runtime type, and optional schema.
#[derive(Debug, Clone)]
pub struct Binding<I> {
    pub id: I,
    pub packet_type: PacketType,
    pub schema: Option<PacketSchema>,
}

/// Bidirectional packet type ↔ identifier map plus frame codec.
pub struct PacketRegistry<E: PrimitiveEncoder, C: PacketCodec> {
    codec: C,
    id_encoder: E,
    max_payload_size: usize,
    bindings: HashMap<E::Primitive, Binding<E::Primitive>>,
    ids: HashMap<TypeId, E::Primitive>,
}

impl<E: PrimitiveEncoder, C: PacketCodec> PacketRegistry<E, C> {
    pub fn new(codec: C, id_encoder: E) -> Self {
        Self {
            codec,
            id_encoder,
            max_payload_size: MAX_PAYLOAD_LENGTH,
            bindings: HashMap::new(),
            ids: HashMap::new(),
        }
    }

    /// Create a registry with a configured payload limit.
    pub fn with_config(codec: C, id_encoder: E, config: &FramingConfig) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ProtocolError::ConfigError(errors.join("; ")));
        }
        let mut registry = Self::new(codec, id_encoder);
        registry.max_payload_size = config.max_payload_size;
        Ok(registry)
    }

    /// Register `T` under `id`, with an optional schema for the codec.
    ///
    /// Registering the same `(id, T)` pair again is a no-op, except that a
    /// schema may be supplied for a binding that had none. Binding an `id` or
    /// a type that is already bound to something else fails with
    /// [`ProtocolError::DuplicateRegistration`] and leaves the registry unchanged.
    #[instrument(level = "debug", skip(self, schema), fields(packet = std::any::type_name::<T>()))]
    pub fn register_with<T: Packet>(
        &mut self,
        id: E::Primitive,
        schema: Option<PacketSchema>,
    ) -> Result<()> {
        let packet_type = PacketType::of::<T>();

        if let Some(schema) = &schema {
            if schema.packet_type() != packet_type {
                return Err(CodecError::TypeMismatch {
                    expected: packet_type.name(),
                    found: schema.packet_type().name(),
                }
                .into());
            }
        }

        let header_len = self.id_encoder.encode(&id).len();
        if header_len > MAX_HEADER_LENGTH {
            return Err(ProtocolError::HeaderTooLarge(header_len));
        }

        if let Some(existing) = self.bindings.get_mut(&id) {
            if existing.packet_type != packet_type {
                return Err(ProtocolError::DuplicateRegistration(format!(
                    "ID {id:?} is already bound to {}",
                    existing.packet_type.name()
                )));
            }
            let current = existing.schema;
            return match (current, schema) {
                (None, schema) => {
                    existing.schema = schema;
                    Ok(())
                }
                (Some(current), Some(new)) if current.kind() != new.kind() => {
                    Err(ProtocolError::DuplicateRegistration(format!(
                        "{} is already registered with a {} schema",
                        packet_type.name(),
                        current.kind()
                    )))
                }
                _ => Ok(()),
            };
        }

        if let Some(other) = self.ids.get(&packet_type.type_id()) {
            return Err(ProtocolError::DuplicateRegistration(format!(
                "{} is already bound to ID {other:?}",
                packet_type.name()
            )));
        }

        debug!(
            id = ?id,
            packet = packet_type.name(),
            schema = schema.map(|s| s.kind()),
            "Registered packet"
        );
        self.ids.insert(packet_type.type_id(), id.clone());
        self.bindings.insert(
            id.clone(),
            Binding {
                id,
                packet_type,
                schema,
            },
        );
        global_metrics().registration();
        Ok(())
    }

    /// Register a serde packet, inferring its schema.
    pub fn register<T>(&mut self, id: E::Primitive) -> Result<()>
    where
        T: Packet + Serialize + DeserializeOwned,
    {
        self.register_with::<T>(id, Some(PacketSchema::serde::<T>()))
    }

    /// Register a packet with a hand-written byte form, inferring its schema.
    pub fn register_raw<T: RawPacket>(&mut self, id: E::Primitive) -> Result<()> {
        self.register_with::<T>(id, Some(PacketSchema::raw::<T>()))
    }

    /// Encode a packet into a standalone frame.
    pub fn encode(&self, packet: &dyn Packet) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        self.encode_into(packet, &mut buf)?;
        Ok(buf.to_vec())
    }

    /// Append one frame to `dst`. On error nothing is written.
    pub fn encode_into(&self, packet: &dyn Packet, dst: &mut BytesMut) -> Result<()> {
        match self.write_frame(packet, dst) {
            Ok(len) => {
                global_metrics().frame_encoded(len as u64);
                Ok(())
            }
            Err(e) => {
                global_metrics().encode_error();
                debug!(packet = packet.packet_type().name(), error = %e, "Failed to encode packet");
                Err(e)
            }
        }
    }

    fn write_frame(&self, packet: &dyn Packet, dst: &mut BytesMut) -> Result<usize> {
        let packet_type = packet.packet_type();
        let binding = self
            .ids
            .get(&packet_type.type_id())
            .and_then(|id| self.bindings.get(id))
            .ok_or(ProtocolError::UnregisteredPacket {
                type_name: packet_type.name(),
            })?;

        let body = self.codec.encode(packet, binding.schema.as_ref())?;
        let header = self.id_encoder.encode(&binding.id);
        let frame = FrameHeader::for_parts(header.len(), body.len(), self.max_payload_size)?;

        dst.reserve(frame.frame_len());
        frame.write(dst);
        dst.extend_from_slice(&header);
        dst.extend_from_slice(&body);
        Ok(frame.frame_len())
    }

    /// Decode exactly one frame. Bytes past the end of the frame are ignored.
    pub fn decode(&self, data: &[u8]) -> Result<Box<dyn Packet>> {
        match self.read_frame(data) {
            Ok((packet, frame_len)) => {
                global_metrics().frame_decoded(frame_len as u64);
                Ok(packet)
            }
            Err(e) => {
                if let ProtocolError::UnknownPacketId(id) = &e {
                    global_metrics().unknown_id();
                    warn!(id = %id, "Received packet with unknown ID");
                } else {
                    global_metrics().decode_error();
                    debug!(error = %e, len = data.len(), "Failed to decode frame");
                }
                Err(e)
            }
        }
    }

    fn read_frame(&self, data: &[u8]) -> Result<(Box<dyn Packet>, usize)> {
        let frame = FrameHeader::parse(data)?;
        if data.len() < frame.frame_len() {
            return Err(ProtocolError::TruncatedFrame {
                expected: frame.frame_len(),
                actual: data.len(),
            });
        }

        let id = self.id_encoder.decode(&data[frame.header_range()])?;
        let binding = self
            .bindings
            .get(&id)
            .ok_or_else(|| ProtocolError::UnknownPacketId(format!("{id:?}")))?;

        let packet = self.codec.decode(
            &data[frame.payload_range()],
            &binding.packet_type,
            binding.schema.as_ref(),
        )?;
        Ok((packet, frame.frame_len()))
    }

    /// Decode one frame and take the concrete packet out of it.
    pub fn decode_as<T: Packet>(&self, data: &[u8]) -> Result<T> {
        let packet = self.decode(data)?.downcast::<T>()?;
        Ok(*packet)
    }

    pub fn id_of<T: Packet>(&self) -> Option<&E::Primitive> {
        self.ids.get(&TypeId::of::<T>())
    }

    pub fn id_for(&self, packet: &dyn Packet) -> Option<&E::Primitive> {
        self.ids.get(&packet.packet_type().type_id())
    }

    pub fn packet_type(&self, id: &E::Primitive) -> Option<PacketType> {
        self.bindings.get(id).map(|b| b.packet_type)
    }

    pub fn binding(&self, id: &E::Primitive) -> Option<&Binding<E::Primitive>> {
        self.bindings.get(id)
    }

    pub fn is_registered(&self, id: &E::Primitive) -> bool {
        self.bindings.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &E::Primitive> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn id_encoder(&self) -> &E {
        &self.id_encoder
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}

impl<E: PrimitiveEncoder, C: PacketCodec> fmt::Debug for PacketRegistry<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketRegistry")
            .field("bindings", &self.bindings.values().collect::<Vec<_>>())
            .field("max_payload_size", &self.max_payload_size)
            .finish()
    }
}
