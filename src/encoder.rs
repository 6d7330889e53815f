//! Outbound frame flattening.
//!
//! The payload serializer embeds its own frame-size header, so
//! [`FrameEncoder`] only manages the buffer lifecycle: acquire a growable
//! buffer, let the serializer fill it, freeze the result into a readable
//! span, and translate serializer faults. As a guard it validates that the
//! serializer's output really is one well-formed frame before handing it to
//! the transport.

use bytes::BytesMut;
use log::warn;

use crate::{error::CodecError, frame::Frame, payload::PayloadSerializer};

/// Initial capacity for outgoing frame buffers.
const ENCODE_BUFFER_CAPACITY: usize = 256;

/// Stateless outbound flattener, shareable across connections.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameEncoder;

impl FrameEncoder {
    /// Create an encoder.
    #[must_use]
    pub const fn new() -> Self { Self }

    /// Serialize `message` into one self-framed outgoing span.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PayloadEncode`] if the serializer fails or
    /// produces bytes that are not exactly one well-formed frame. The fault
    /// is terminal for this message only.
    pub fn encode<S: PayloadSerializer>(
        &self,
        serializer: &S,
        message: &S::Message,
    ) -> Result<Frame, CodecError> {
        let mut buf = BytesMut::with_capacity(ENCODE_BUFFER_CAPACITY);
        serializer.serialize_payload(message, &mut buf).map_err(|err| {
            warn!("error encoding message to output stream: {err}");
            CodecError::PayloadEncode(err)
        })?;
        Frame::new(buf.freeze()).map_err(|err| {
            warn!("serializer produced a malformed frame: {err}");
            CodecError::PayloadEncode(Box::new(err))
        })
    }
}
