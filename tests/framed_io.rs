//! Async integration of `FrameCodec` with `tokio_util::codec` transports.

use std::sync::Arc;

use bincode::{Decode, Encode};
use blinkframe::{BincodePayloadCodec, Frame, FrameCodec, Pipeline};
use futures::{SinkExt, StreamExt};
use tokio_util::codec::{FramedRead, FramedWrite};

#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
struct Note {
    id: u64,
    body: String,
}

fn frame_for(note: &Note) -> Frame {
    let pipeline = Pipeline::new(Arc::new(BincodePayloadCodec::<Note>::new()));
    pipeline.encode_message(note).expect("encodable message")
}

#[tokio::test]
async fn frames_survive_a_framed_transport() {
    let (client, server) = tokio::io::duplex(64);
    let mut writer = FramedWrite::new(client, FrameCodec::new());
    let mut reader = FramedRead::new(server, FrameCodec::new());

    let notes = [
        Note {
            id: 1,
            body: "hello".into(),
        },
        Note {
            id: 2,
            body: "world".into(),
        },
    ];
    let frames: Vec<Frame> = notes.iter().map(frame_for).collect();

    for frame in &frames {
        writer.send(frame.clone()).await.expect("send frame");
    }
    drop(writer);

    for expected in &frames {
        let frame = reader
            .next()
            .await
            .expect("stream not exhausted")
            .expect("well-framed stream");
        assert_eq!(frame, *expected);
    }
    assert!(reader.next().await.is_none());
}

#[test]
fn raw_outgoing_bytes_must_be_well_framed() {
    use blinkframe::CodecError;
    use bytes::{Bytes, BytesMut};
    use tokio_util::codec::Encoder;

    let mut codec = FrameCodec::new();
    let mut dst = BytesMut::new();
    let frame = frame_for(&Note {
        id: 3,
        body: "x".into(),
    });
    codec
        .encode(frame.as_bytes().clone(), &mut dst)
        .expect("well-framed bytes");
    assert_eq!(&dst[..], &frame.as_bytes()[..]);

    // Header declares six bytes but the span holds two.
    let err = codec
        .encode(Bytes::from_static(&[0x05, 0x01]), &mut dst)
        .expect_err("length mismatch");
    assert!(matches!(err, CodecError::PayloadEncode(_)));
}

#[tokio::test]
async fn partial_writes_are_reassembled() {
    let (mut client, server) = tokio::io::duplex(64);
    let mut reader = FramedRead::new(server, FrameCodec::new());

    let frame = frame_for(&Note {
        id: 7,
        body: "chunked".into(),
    });
    let bytes = frame.as_bytes().clone();

    let writer = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        for chunk in bytes.chunks(3) {
            client.write_all(chunk).await.expect("write chunk");
            client.flush().await.expect("flush chunk");
        }
    });

    let received = reader
        .next()
        .await
        .expect("stream not exhausted")
        .expect("well-framed stream");
    assert_eq!(received, frame);
    writer.await.expect("writer task");
}
