//! # Primitive Encoders
//!
//! Encoders for the identifier types that can appear in a frame header.
//!
//! The header already carries the identifier's byte length, so none of these
//! formats include their own length prefix. Fixed-width encoders require the
//! exact width on decode; anything else is rejected as an invalid identifier.
//!
//! | Encoder | Primitive | Bytes |
//! |---|---|---|
//! | [`IntegerEncoder`] | `i32` | 4, big-endian |
//! | [`ShortEncoder`] | `i16` | 2, big-endian |
//! | [`ByteEncoder`] | `u8` | 1 |
//! | [`StringEncoder`] | `String` | UTF-8 |
//! | [`KeyEncoder`] | [`Key`] | UTF-8 of `namespace:value` |

use crate::core::key::Key;
use crate::error::{constants, ProtocolError, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// Converts a single identifier value to and from bytes.
pub trait PrimitiveEncoder: Send + Sync {
    /// The identifier type this encoder handles.
    type Primitive: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    /// Encode the primitive. Deterministic and free of side effects.
    fn encode(&self, primitive: &Self::Primitive) -> Vec<u8>;

    /// Decode bytes produced by [`encode`](Self::encode).
    fn decode(&self, bytes: &[u8]) -> Result<Self::Primitive>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        ProtocolError::InvalidIdentifier(format!(
            "expected {N} bytes, got {}",
            bytes.len()
        ))
    })
}

/// 32-bit signed integer identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerEncoder;

impl PrimitiveEncoder for IntegerEncoder {
    type Primitive = i32;

    fn encode(&self, primitive: &i32) -> Vec<u8> {
        primitive.to_be_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> Result<i32> {
        Ok(i32::from_be_bytes(fixed::<4>(bytes)?))
    }
}

/// 16-bit signed integer identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortEncoder;

impl PrimitiveEncoder for ShortEncoder {
    type Primitive = i16;

    fn encode(&self, primitive: &i16) -> Vec<u8> {
        primitive.to_be_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> Result<i16> {
        Ok(i16::from_be_bytes(fixed::<2>(bytes)?))
    }
}

/// Single byte identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteEncoder;

impl PrimitiveEncoder for ByteEncoder {
    type Primitive = u8;

    fn encode(&self, primitive: &u8) -> Vec<u8> {
        vec![*primitive]
    }

    fn decode(&self, bytes: &[u8]) -> Result<u8> {
        let [b] = fixed::<1>(bytes)?;
        Ok(b)
    }
}

/// UTF-8 string identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEncoder;

impl PrimitiveEncoder for StringEncoder {
    type Primitive = String;

    fn encode(&self, primitive: &String) -> Vec<u8> {
        primitive.as_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            ProtocolError::InvalidIdentifier(constants::ERR_IDENTIFIER_NOT_UTF8.to_string())
        })
    }
}

/// Namespaced key identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEncoder;

impl PrimitiveEncoder for KeyEncoder {
    type Primitive = Key;

    fn encode(&self, primitive: &Key) -> Vec<u8> {
        primitive.to_string().into_bytes()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Key> {
        if bytes.is_empty() {
            return Err(ProtocolError::InvalidIdentifier(
                constants::ERR_EMPTY_IDENTIFIER.to_string(),
            ));
        }
        let s = std::str::from_utf8(bytes).map_err(|_| {
            ProtocolError::InvalidIdentifier(constants::ERR_IDENTIFIER_NOT_UTF8.to_string())
        })?;
        Key::parse(s).map_err(|e| ProtocolError::InvalidIdentifier(e.to_string()))
    }
}
