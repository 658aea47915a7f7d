#![no_main]

use bytes::BytesMut;
use catalyst_net::prelude::*;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use tokio_util::codec::Decoder;

#[derive(Debug)]
struct Opaque(Vec<u8>);
impl Packet for Opaque {}
impl RawPacket for Opaque {
    fn write_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    fn read_bytes(bytes: &[u8]) -> std::result::Result<Self, CodecError> {
        Ok(Opaque(bytes.to_vec()))
    }
}

fuzz_target!(|data: &[u8]| {
    // Split an arbitrary stream into frames; errors consume one frame each
    let mut registry = PacketRegistry::new(RawCodec, ByteEncoder);
    let _ = registry.register_raw::<Opaque>(1);
    let mut codec = FrameCodec::new(Arc::new(registry));

    let mut buf = BytesMut::from(data);
    loop {
        let before = buf.len();
        match codec.decode(&mut buf) {
            Ok(Some(_)) | Err(_) => {}
            Ok(None) => break,
        }
        if buf.len() == before {
            break;
        }
    }
});
