#![cfg(feature = "metrics")]
//! Tests for `blinkframe` metric helpers.
//!
//! These tests drive real pipelines under a
//! `metrics_util::debugging::DebuggingRecorder` and verify that frame and
//! error counters are recorded with the expected labels.

use std::sync::Arc;

use bincode::{Decode, Encode};
use blinkframe::{
    BincodePayloadCodec,
    ConnectionId,
    ERRORS_TOTAL,
    FRAME_BYTES,
    FRAMES_PROCESSED,
    PIPELINES_ACTIVE,
    Pipeline,
    PipelineRegistry,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
struct Ping {
    seq: u32,
}

type PingCodec = BincodePayloadCodec<Ping>;

fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_with_label(
    snapshotter: &Snapshotter,
    name: &str,
    label_key: &str,
    label_value: &str,
) -> Option<u64> {
    let metrics = snapshotter.snapshot().into_vec();
    metrics.iter().find_map(|(k, _, _, v)| {
        let matched = k.key().name() == name
            && k.key()
                .labels()
                .any(|l| l.key() == label_key && l.value() == label_value);
        match v {
            DebugValue::Counter(c) if matched => Some(*c),
            _ => None,
        }
    })
}

#[test]
fn frame_counters_record_direction_and_bytes() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let frame_len = metrics::with_local_recorder(&recorder, || {
        let sender = Pipeline::new(Arc::new(PingCodec::new()));
        let mut receiver = Pipeline::new(Arc::new(PingCodec::new()));
        let frame = sender
            .encode_message(&Ping { seq: 99 })
            .expect("encodable message");
        receiver.feed(frame.as_bytes());
        receiver
            .poll_message()
            .expect("well-framed stream")
            .expect("complete frame");
        u64::from(frame.total_len())
    });

    for direction in ["outbound", "inbound"] {
        assert_eq!(
            counter_with_label(&snapshotter, FRAMES_PROCESSED, "direction", direction),
            Some(1),
            "{direction} frame count not recorded"
        );
        assert_eq!(
            counter_with_label(&snapshotter, FRAME_BYTES, "direction", direction),
            Some(frame_len),
            "{direction} frame bytes not recorded"
        );
    }
}

#[test]
fn framing_violation_is_counted_under_its_category() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let mut receiver = Pipeline::new(Arc::new(PingCodec::new()));
        receiver.feed(&[0xc5, 0x00]);
        receiver.poll_message().expect_err("oversized width");
    });

    assert_eq!(
        counter_with_label(&snapshotter, ERRORS_TOTAL, "category", "framing"),
        Some(1),
        "framing error not recorded"
    );
}

#[test]
fn payload_failure_is_counted_under_its_category() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let mut receiver = Pipeline::new(Arc::new(PingCodec::new()));
        // Well-framed span whose body is not a valid Ping.
        receiver.feed(&[0x02, 0xff, 0xff]);
        receiver.poll_message().expect_err("body is not a Ping");
    });

    assert_eq!(
        counter_with_label(&snapshotter, ERRORS_TOTAL, "category", "payload-decode"),
        Some(1),
        "payload decode error not recorded"
    );
}

#[test]
fn pipeline_gauge_tracks_registry_lifecycle() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let registry = PipelineRegistry::new(Arc::new(PingCodec::new()));
        registry.open(ConnectionId::new(1));
        registry.open(ConnectionId::new(2));
        assert!(registry.close(&ConnectionId::new(1)));
    });

    let metrics = snapshotter.snapshot().into_vec();
    let gauge = metrics.iter().find_map(|(k, _, _, v)| {
        if k.key().name() != PIPELINES_ACTIVE {
            return None;
        }
        match v {
            DebugValue::Gauge(g) => Some(g.into_inner()),
            _ => None,
        }
    });
    assert_eq!(gauge, Some(1.0), "pipeline gauge not recorded");
}
