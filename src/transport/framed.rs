//! # Stream Framing
//!
//! [`FrameCodec`] adapts a shared [`PacketRegistry`] to `tokio_util::codec`,
//! so packets can be read from and written to any `AsyncRead`/`AsyncWrite`
//! through `Framed`, `FramedRead`, or `FramedWrite`.
//!
//! Frames are self-delimiting (`3 + header_length + payload_length` bytes),
//! so no extra length prefix is added.
//!
//! Each decoded item is itself a `Result`. A frame that fails to decode
//! (unknown identifier, malformed body) is consumed and yielded as
//! `Some(Err(..))`, and the stream carries on with the next frame. Only I/O
//! failures end a `Framed` stream; the caller decides whether a bad frame
//! should drop the connection.
//!
//! ```rust
//! use catalyst_net::prelude::*;
//! use futures::StreamExt;
//! use tokio_util::codec::FramedRead;
//! # async fn read_all<R: tokio::io::AsyncRead + Unpin>(
//! #     reader: R,
//! #     registry: std::sync::Arc<PacketRegistry<IntegerEncoder, SerdeCodec>>,
//! # ) -> Result<()> {
//! let mut frames = FramedRead::new(reader, FrameCodec::new(registry));
//! while let Some(item) = frames.next().await {
//!     match item? {
//!         Ok(packet) => tracing::debug!(?packet, "Received packet"),
//!         Err(e) => tracing::warn!(error = %e, "Dropped frame"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::codec::PacketCodec;
use crate::core::frame::{FrameHeader, FRAME_HEADER_SIZE};
use crate::core::packet::Packet;
use crate::core::primitive::PrimitiveEncoder;
use crate::error::ProtocolError;
use crate::protocol::registry::PacketRegistry;
use bytes::BytesMut;
use std::sync::Arc;
use tokio_util::codec::{Decoder, Encoder};

/// tokio-util codec for registry frames.
pub struct FrameCodec<E: PrimitiveEncoder, C: PacketCodec> {
    registry: Arc<PacketRegistry<E, C>>,
}

impl<E: PrimitiveEncoder, C: PacketCodec> FrameCodec<E, C> {
    pub fn new(registry: Arc<PacketRegistry<E, C>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PacketRegistry<E, C>> {
        &self.registry
    }
}

impl<E: PrimitiveEncoder, C: PacketCodec> Clone for FrameCodec<E, C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: PrimitiveEncoder, C: PacketCodec> Decoder for FrameCodec<E, C> {
    type Item = Result<Box<dyn Packet>, ProtocolError>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let frame_len = FrameHeader::parse(&src[..])?.frame_len();
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        Ok(Some(self.registry.decode(&frame)))
    }
}

impl<E: PrimitiveEncoder, C: PacketCodec> Encoder<Box<dyn Packet>> for FrameCodec<E, C> {
    type Error = ProtocolError;

    fn encode(&mut self, item: Box<dyn Packet>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.registry.encode_into(item.as_ref(), dst)
    }
}

