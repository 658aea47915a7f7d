use bytes::BytesMut;
use catalyst_net::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::codec::Decoder;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkData {
    world: String,
    x: i32,
    z: i32,
    blocks: Vec<u8>,
}
impl Packet for ChunkData {}

#[derive(Debug)]
struct Blob(Vec<u8>);
impl Packet for Blob {}
impl RawPacket for Blob {
    fn write_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    fn read_bytes(bytes: &[u8]) -> std::result::Result<Self, CodecError> {
        Ok(Blob(bytes.to_vec()))
    }
}

#[allow(clippy::unwrap_used)]
fn bench_serde_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("serde_registry");
    let payload_sizes = [64usize, 1024, 16 * 1024];

    for format in [
        SerializationFormat::Bincode,
        SerializationFormat::Json,
        SerializationFormat::MessagePack,
    ] {
        let mut registry = PacketRegistry::new(SerdeCodec::new(format), KeyEncoder);
        registry
            .register::<ChunkData>(Key::parse("world:chunk_data").unwrap())
            .unwrap();

        for &size in &payload_sizes {
            let packet = ChunkData {
                world: "overworld".into(),
                x: 12,
                z: -40,
                blocks: vec![3u8; size],
            };
            let frame = registry.encode(&packet).unwrap();

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_function(format!("encode_{}_{size}b", format.name()), |b| {
                b.iter(|| registry.encode(black_box(&packet)).unwrap())
            });
            group.bench_function(format!("decode_{}_{size}b", format.name()), |b| {
                b.iter(|| registry.decode(black_box(&frame)).unwrap())
            });
        }
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_raw_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_registry");
    let mut registry = PacketRegistry::new(RawCodec, IntegerEncoder);
    registry.register_raw::<Blob>(1).unwrap();

    for &size in &[64usize, 4096, 65_535] {
        let packet = Blob(vec![0u8; size]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_into_{size}b"), |b| {
            b.iter_batched(
                || BytesMut::with_capacity(size + 16),
                |mut buf| {
                    registry.encode_into(&packet, &mut buf).unwrap();
                    buf
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_stream_decode(c: &mut Criterion) {
    let mut registry = PacketRegistry::new(RawCodec, ByteEncoder);
    registry.register_raw::<Blob>(1).unwrap();
    let registry = Arc::new(registry);

    let mut stream = BytesMut::new();
    for _ in 0..100 {
        registry.encode_into(&Blob(vec![9u8; 256]), &mut stream).unwrap();
    }

    c.bench_function("frame_codec_decode_100x256b", |b| {
        b.iter_batched(
            || (FrameCodec::new(Arc::clone(&registry)), stream.clone()),
            |(mut codec, mut buf)| {
                while let Some(packet) = codec.decode(&mut buf).unwrap() {
                    black_box(packet);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_serde_formats, bench_raw_frames, bench_stream_decode);
criterion_main!(benches);
