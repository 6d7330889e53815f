//! `tokio-util` codec adapter for the framing layer.
//!
//! [`FrameCodec`] implements [`Decoder`] and [`Encoder`] so the frame
//! boundary detector plugs directly into `FramedRead`/`FramedWrite`. Each
//! codec instance carries its own [`DecodeState`], matching the
//! one-codec-per-connection model those wrappers impose.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{decoder::DecodeState, error::CodecError, frame::Frame};

/// Frame-level codec for `tokio_util::codec` transports.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCodec {
    state: DecodeState,
}

impl FrameCodec {
    /// Create a codec with an idle decode state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DecodeState::new(),
        }
    }

    /// Frame length cached from a partially delivered frame, if any.
    #[must_use]
    pub fn pending_length(&self) -> Option<u32> { self.state.known_length() }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, CodecError> {
        let Some(header) = self.state.poll(src)? else {
            return Ok(None);
        };
        let span = src.split_to(header.total_len() as usize).freeze();
        Ok(Some(Frame::from_parts(span, header)))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), CodecError> {
        dst.extend_from_slice(frame.as_bytes());
        Ok(())
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, bytes: Bytes, dst: &mut BytesMut) -> Result<(), CodecError> {
        let frame = Frame::new(bytes).map_err(|err| CodecError::PayloadEncode(Box::new(err)))?;
        dst.extend_from_slice(frame.as_bytes());
        Ok(())
    }
}
