//! # Frame Layout
//!
//! ```text
//! byte 0     : header_length  (u8)
//! bytes 1-2  : payload_length (u16, big-endian)
//! bytes 3..  : header_length bytes of encoded identifier
//! bytes ..   : payload_length bytes of encoded payload body
//! ```
//!
//! There is no magic number, version byte, or checksum. The header makes each
//! frame self-delimiting, which is what [`FrameCodec`](crate::transport::framed::FrameCodec)
//! relies on when splitting a stream.
//!
//! Both length fields are bounds-checked before writing; an identifier or
//! body that does not fit is an error rather than a truncated length.

use crate::error::{ProtocolError, Result};
use bytes::{BufMut, BytesMut};

/// Size of the fixed part of a frame.
pub const FRAME_HEADER_SIZE: usize = 3;

/// Largest encoded identifier a frame can carry.
pub const MAX_HEADER_LENGTH: usize = u8::MAX as usize;

/// Largest encoded payload body a frame can carry.
pub const MAX_PAYLOAD_LENGTH: usize = u16::MAX as usize;

/// The fixed three-byte prefix of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub header_length: u8,
    pub payload_length: u16,
}

impl FrameHeader {
    /// Validate part sizes against the frame limits. `max_payload` may lower
    /// the payload limit below [`MAX_PAYLOAD_LENGTH`] but never raise it.
    pub fn for_parts(header_len: usize, payload_len: usize, max_payload: usize) -> Result<Self> {
        let header_length =
            u8::try_from(header_len).map_err(|_| ProtocolError::HeaderTooLarge(header_len))?;

        let max = max_payload.min(MAX_PAYLOAD_LENGTH);
        if payload_len > max {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max,
            });
        }
        let payload_length = u16::try_from(payload_len).map_err(|_| {
            ProtocolError::PayloadTooLarge {
                size: payload_len,
                max,
            }
        })?;

        Ok(Self {
            header_length,
            payload_length,
        })
    }

    /// Read the fixed prefix. Does not check that the rest of the frame is present.
    #[inline]
    pub fn parse(data: &[u8]) -> Result<Self> {
        match data {
            [h, p0, p1, ..] => Ok(Self {
                header_length: *h,
                payload_length: u16::from_be_bytes([*p0, *p1]),
            }),
            _ => Err(ProtocolError::TruncatedFrame {
                expected: FRAME_HEADER_SIZE,
                actual: data.len(),
            }),
        }
    }

    /// Total bytes in a frame with this header.
    #[inline]
    pub fn frame_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.header_length as usize + self.payload_length as usize
    }

    /// Byte range of the encoded identifier within the frame.
    #[inline]
    pub fn header_range(&self) -> std::ops::Range<usize> {
        FRAME_HEADER_SIZE..FRAME_HEADER_SIZE + self.header_length as usize
    }

    /// Byte range of the encoded payload within the frame.
    #[inline]
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        self.header_range().end..self.frame_len()
    }

    pub fn write(&self, dst: &mut BytesMut) {
        dst.put_u8(self.header_length);
        dst.put_u16(self.payload_length);
    }
}
