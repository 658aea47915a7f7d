#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Stream framing over tokio-util codecs

use bytes::BytesMut;
use catalyst_net::prelude::*;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{Decoder, Encoder, FramedRead, FramedWrite};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TransferPlayer {
    player: String,
    target: String,
}
impl Packet for TransferPlayer {}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Broadcast {
    text: String,
}
impl Packet for Broadcast {}

fn shared_registry() -> Arc<PacketRegistry<ByteEncoder, SerdeCodec>> {
    let mut registry = PacketRegistry::new(SerdeCodec::default(), ByteEncoder);
    registry.register::<TransferPlayer>(1).unwrap();
    registry.register::<Broadcast>(2).unwrap();
    Arc::new(registry)
}

#[test]
fn test_decoder_waits_for_complete_frame() {
    let registry = shared_registry();
    let frame = registry
        .encode(&Broadcast {
            text: "restart in 5".into(),
        })
        .unwrap();
    let mut codec = FrameCodec::new(registry);

    let mut buf = BytesMut::new();
    for byte in &frame[..frame.len() - 1] {
        buf.extend_from_slice(&[*byte]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }
    buf.extend_from_slice(&frame[frame.len() - 1..]);

    let packet = codec.decode(&mut buf).unwrap().unwrap().unwrap();
    assert_eq!(
        packet.downcast_ref::<Broadcast>().unwrap().text,
        "restart in 5"
    );
    assert!(buf.is_empty());
}

#[test]
fn test_decoder_splits_back_to_back_frames() {
    let registry = shared_registry();
    let mut codec = FrameCodec::new(Arc::clone(&registry));

    let mut buf = BytesMut::new();
    let first = TransferPlayer {
        player: "alex".into(),
        target: "survival".into(),
    };
    let second = Broadcast { text: "hi".into() };
    registry.encode_into(&first, &mut buf).unwrap();
    codec.encode(Box::new(second) as Box<dyn Packet>, &mut buf).unwrap();

    let a = codec.decode(&mut buf).unwrap().unwrap().unwrap();
    let b = codec.decode(&mut buf).unwrap().unwrap().unwrap();
    assert!(codec.decode(&mut buf).unwrap().is_none());

    assert_eq!(a.downcast_ref::<TransferPlayer>(), Some(&first));
    assert!(b.is::<Broadcast>());
}

#[test]
fn test_bad_frame_is_consumed() {
    let registry = shared_registry();
    let mut codec = FrameCodec::new(Arc::clone(&registry));

    let mut buf = BytesMut::new();
    // identifier 9 is not registered
    buf.extend_from_slice(&[0x01, 0x00, 0x00, 0x09]);
    registry
        .encode_into(&Broadcast { text: "next".into() }, &mut buf)
        .unwrap();

    assert!(matches!(
        codec.decode(&mut buf),
        Ok(Some(Err(ProtocolError::UnknownPacketId(_))))
    ));
    let next = codec.decode(&mut buf).unwrap().unwrap().unwrap();
    assert!(next.is::<Broadcast>());
}

#[test]
fn test_encoder_rejects_unregistered_packet() {
    #[derive(Debug)]
    struct Stray;
    impl Packet for Stray {}

    let mut codec = FrameCodec::new(shared_registry());
    let mut buf = BytesMut::new();
    let err = codec
        .encode(Box::new(Stray) as Box<dyn Packet>, &mut buf)
        .unwrap_err();
    assert!(matches!(err, ProtocolError::UnregisteredPacket { .. }));
    assert!(buf.is_empty());
}

#[tokio::test]
async fn test_framed_duplex_roundtrip() {
    let registry = shared_registry();
    let (client, server) = tokio::io::duplex(64);

    let mut writer = FramedWrite::new(client, FrameCodec::new(Arc::clone(&registry)));
    let mut reader = FramedRead::new(server, FrameCodec::new(registry));

    let send = tokio::spawn(async move {
        for i in 0..20 {
            let packet: Box<dyn Packet> = Box::new(TransferPlayer {
                player: format!("player-{i}"),
                target: "hub".into(),
            });
            writer.send(packet).await.unwrap();
        }
        writer.close().await.unwrap();
    });

    let mut received = Vec::new();
    while let Some(packet) = reader.next().await {
        let packet = packet
            .unwrap()
            .unwrap()
            .downcast::<TransferPlayer>()
            .unwrap();
        received.push(packet.player);
    }
    send.await.unwrap();

    let expected: Vec<String> = (0..20).map(|i| format!("player-{i}")).collect();
    assert_eq!(received, expected);
}

#[tokio::test]
async fn test_framed_read_handles_fragmented_writes() {
    let registry = shared_registry();
    let frame = registry
        .encode(&Broadcast {
            text: "fragmented".into(),
        })
        .unwrap();

    let (mut client, server) = tokio::io::duplex(8);
    let mut reader = FramedRead::new(server, FrameCodec::new(registry));

    let send = tokio::spawn(async move {
        for chunk in frame.chunks(3) {
            client.write_all(chunk).await.unwrap();
            client.flush().await.unwrap();
        }
    });

    let packet = reader.next().await.unwrap().unwrap().unwrap();
    assert_eq!(
        packet.downcast_ref::<Broadcast>().unwrap().text,
        "fragmented"
    );
    send.await.unwrap();
    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn test_framed_read_continues_after_bad_frame() {
    let registry = shared_registry();
    let mut bytes = vec![0x01, 0x00, 0x00, 0x09];
    bytes.extend(
        registry
            .encode(&Broadcast {
                text: "still here".into(),
            })
            .unwrap(),
    );
    // body that bincode cannot read as a TransferPlayer
    bytes.extend_from_slice(&[0x01, 0x00, 0x02, 0x01, 0xFF, 0xFF]);
    bytes.extend(
        registry
            .encode(&Broadcast {
                text: "and here".into(),
            })
            .unwrap(),
    );

    let (mut client, server) = tokio::io::duplex(256);
    let mut reader = FramedRead::new(server, FrameCodec::new(registry));

    client.write_all(&bytes).await.unwrap();
    drop(client);

    assert!(matches!(
        reader.next().await,
        Some(Ok(Err(ProtocolError::UnknownPacketId(_))))
    ));
    let packet = reader.next().await.unwrap().unwrap().unwrap();
    assert_eq!(
        packet.downcast_ref::<Broadcast>().unwrap().text,
        "still here"
    );
    assert!(matches!(
        reader.next().await,
        Some(Ok(Err(ProtocolError::Codec(_))))
    ));
    let packet = reader.next().await.unwrap().unwrap().unwrap();
    assert_eq!(packet.downcast_ref::<Broadcast>().unwrap().text, "and here");
    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn test_framed_write_send_and_close() {
    let registry = shared_registry();
    let (client, server) = tokio::io::duplex(64);
    let mut writer = FramedWrite::new(client, FrameCodec::new(Arc::clone(&registry)));
    let mut reader = FramedRead::new(server, FrameCodec::new(registry));

    writer
        .send(Box::new(Broadcast { text: "bye".into() }) as Box<dyn Packet>)
        .await
        .unwrap();
    writer.flush().await.unwrap();
    writer.close().await.unwrap();

    let packet = reader.next().await.unwrap().unwrap().unwrap();
    assert!(packet.is::<Broadcast>());
    assert!(reader.next().await.is_none());
}
