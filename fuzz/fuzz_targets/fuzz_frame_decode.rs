#![no_main]

use catalyst_net::prelude::*;
use libfuzzer_sys::fuzz_target;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Target {
    name: String,
    values: Vec<i64>,
}
impl Packet for Target {}

fuzz_target!(|data: &[u8]| {
    // Frame decoding must reject malformed input without panicking
    let mut keyed = PacketRegistry::new(SerdeCodec::default(), KeyEncoder);
    if let Ok(key) = Key::parse("fuzz:target") {
        let _ = keyed.register::<Target>(key);
    }
    let _ = keyed.decode(data);

    let mut numbered = PacketRegistry::new(SerdeCodec::new(SerializationFormat::MessagePack), IntegerEncoder);
    let _ = numbered.register::<Target>(0);
    if let Ok(packet) = numbered.decode(data) {
        // anything that decodes must encode again
        let _ = numbered.encode(packet.as_ref());
    }
});
