//! Unit tests for frame spans.

use bytes::{Bytes, BytesMut};
use rstest::rstest;

use super::*;
use crate::varint::encode_header_with;

const HELLO_FRAME: &[u8] = &[
    0x8e, 0x00, 0x01, 0x0c, 0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x20, 0x57, 0x6f, 0x72, 0x6c, 0x64,
    0x21,
];

#[test]
fn literal_frame_exposes_header_and_payload() {
    let frame = Frame::new(Bytes::from_static(HELLO_FRAME)).expect("well-formed frame");
    assert_eq!(frame.total_len(), 16);
    assert_eq!(frame.header_len(), 2);
    assert_eq!(frame.payload_offset(), 2);
    assert_eq!(frame.header_encoding(), HeaderEncoding::TwoByte);
    assert_eq!(frame.payload(), &HELLO_FRAME[2..]);
    assert_eq!(&frame.as_bytes()[..], HELLO_FRAME);
}

#[test]
fn reencoding_with_recorded_form_reproduces_exact_bytes() {
    let frame = Frame::new(Bytes::from_static(HELLO_FRAME)).expect("well-formed frame");
    let mut out = BytesMut::new();
    encode_header_with(frame.header_encoding(), frame.total_len(), &mut out)
        .expect("recorded form fits");
    out.extend_from_slice(frame.payload());
    assert_eq!(&out[..], HELLO_FRAME);
}

#[test]
fn header_only_frame_has_empty_payload() {
    let frame = Frame::new(Bytes::from_static(&[0x00])).expect("well-formed frame");
    assert_eq!(frame.total_len(), 1);
    assert_eq!(frame.header_len(), 1);
    assert!(frame.payload().is_empty());
}

#[rstest]
#[case(vec![], FrameError::IncompleteHeader)]
#[case(vec![0x85], FrameError::IncompleteHeader)]
#[case(
    vec![0x8e, 0x00, 0x01, 0x0c],
    FrameError::LengthMismatch { declared: 16, actual: 4 }
)]
#[case(
    vec![0xc5, 0x01, 0x02],
    FrameError::Header(FramingError::HeaderTooLarge { width: 5 })
)]
fn malformed_spans_are_rejected(#[case] bytes: Vec<u8>, #[case] expected: FrameError) {
    let err = Frame::new(Bytes::from(bytes)).expect_err("span must be rejected");
    assert_eq!(err, expected);
}

#[test]
fn total_length_always_covers_header() {
    let frame = Frame::new(Bytes::from_static(HELLO_FRAME)).expect("well-formed frame");
    assert!(frame.total_len() >= u32::from(frame.header_len()));
    assert!(frame.header_len() >= 1);
}
