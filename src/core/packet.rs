//! # Packet Types
//!
//! A packet is any application message that can be registered with a
//! [`PacketRegistry`](crate::protocol::registry::PacketRegistry). The registry
//! works with type-erased `&dyn Packet` / `Box<dyn Packet>` values and keys
//! its bindings by the concrete runtime type ([`PacketType`]).
//!
//! ```rust
//! use catalyst_net::core::packet::{Packet, PacketType};
//!
//! #[derive(Debug, PartialEq)]
//! struct Ping(u64);
//! impl Packet for Ping {}
//!
//! let boxed: Box<dyn Packet> = Box::new(Ping(7));
//! assert_eq!(boxed.packet_type(), PacketType::of::<Ping>());
//! assert_eq!(boxed.downcast_ref::<Ping>(), Some(&Ping(7)));
//! ```

use crate::error::CodecError;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime type information for a packet; the "class" half of a binding.
#[derive(Clone, Copy)]
pub struct PacketType {
    id: TypeId,
    name: &'static str,
}

impl PacketType {
    pub fn of<T: Packet>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PacketType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PacketType {}

impl Hash for PacketType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erasure plumbing for [`Packet`]. Implemented for every sized type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn packet_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn packet_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Marker for application messages carried in frames.
///
/// Implement it with an empty `impl Packet for MyPacket {}`; the registry and
/// codecs only need the type-erasure methods from [`AsAny`].
pub trait Packet: AsAny + fmt::Debug + 'static {}

impl dyn Packet {
    /// Runtime type of the concrete packet behind this trait object.
    pub fn packet_type(&self) -> PacketType {
        PacketType {
            id: self.as_any().type_id(),
            name: self.packet_type_name(),
        }
    }

    pub fn is<T: Packet>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Packet>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Take ownership of the concrete packet.
    pub fn downcast<T: Packet>(self: Box<Self>) -> Result<Box<T>, CodecError> {
        let found = (*self).packet_type_name();
        self.into_any()
            .downcast::<T>()
            .map_err(|_| CodecError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found,
            })
    }
}

/// A packet with a hand-written byte form, for use with
/// [`RawCodec`](crate::core::codec::RawCodec).
pub trait RawPacket: Packet + Sized {
    fn write_bytes(&self) -> Vec<u8>;

    fn read_bytes(bytes: &[u8]) -> Result<Self, CodecError>;
}
