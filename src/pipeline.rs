//! Bidirectional per-connection transform.
//!
//! A [`Pipeline`] binds one [`FrameDecoder`]/[`FrameEncoder`] pair, a
//! [`ReceiveCursor`], and a [`DecodeState`] to a single connection. The
//! payload codec is shared across connections behind an [`Arc`]; everything
//! mutable is owned here, so a pipeline is only ever touched by the thread
//! currently driving its connection and needs no locking.
//!
//! Decode and encode run synchronously inside whatever loop drives the
//! connection's I/O. Neither blocks: a partial frame simply waits,
//! indefinitely, for more bytes.

use std::sync::Arc;

use log::{debug, warn};

use crate::{
    cursor::ReceiveCursor,
    decoder::{DecodeState, FrameDecoder},
    encoder::FrameEncoder,
    error::CodecError,
    frame::Frame,
    payload::{PayloadDecoder, PayloadSerializer},
};

/// Per-connection composition of the framing components.
#[derive(Debug)]
pub struct Pipeline<C> {
    codec: Arc<C>,
    cursor: ReceiveCursor,
    state: DecodeState,
    decoder: FrameDecoder,
    encoder: FrameEncoder,
}

impl<C> Pipeline<C> {
    /// Bind a new pipeline to a connection, sharing `codec` with others.
    #[must_use]
    pub fn new(codec: Arc<C>) -> Self {
        Self {
            codec,
            cursor: ReceiveCursor::new(),
            state: DecodeState::new(),
            decoder: FrameDecoder::new(),
            encoder: FrameEncoder::new(),
        }
    }

    /// Append a chunk of transport bytes for later decoding.
    pub fn feed(&mut self, bytes: &[u8]) { self.cursor.extend(bytes); }

    /// Number of buffered, not yet consumed bytes.
    #[must_use]
    pub fn buffered(&self) -> usize { self.cursor.remaining() }

    /// Frame length cached from a partially delivered frame, if any.
    #[must_use]
    pub fn pending_length(&self) -> Option<u32> { self.state.known_length() }

    /// Tear down the pipeline, discarding pending decode state.
    pub fn close(mut self) {
        if !self.state.is_idle() || !self.cursor.is_empty() {
            debug!(
                "pipeline closed mid-frame: buffered={} pending={:?}",
                self.cursor.remaining(),
                self.state.known_length()
            );
        }
        self.state.clear();
    }
}

impl<C: PayloadDecoder> Pipeline<C> {
    /// Attempt to extract the next complete frame from the buffered bytes.
    ///
    /// Returns `Ok(None)` when more input is needed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Framing`] for a malformed header; terminal for
    /// the connection.
    pub fn poll_frame(&mut self) -> Result<Option<Frame>, CodecError> {
        match self.decoder.decode(&mut self.cursor, &mut self.state) {
            Ok(frame) => {
                #[cfg(feature = "metrics")]
                if let Some(frame) = &frame {
                    crate::metrics::inc_frames(
                        crate::metrics::Direction::Inbound,
                        u64::from(frame.total_len()),
                    );
                }
                Ok(frame)
            }
            Err(err) => {
                warn!("framing violation on input stream: {err}");
                let err = CodecError::from(err);
                #[cfg(feature = "metrics")]
                crate::metrics::inc_errors(err.error_type());
                Err(err)
            }
        }
    }

    /// Extract the next frame and hand its span to the payload decoder.
    ///
    /// Returns `Ok(None)` when more input is needed, otherwise the zero or
    /// more domain objects the payload decoder produced from one frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PayloadDecode`] when the payload decoder
    /// rejects a well-framed span. The offending frame has already been
    /// consumed, so the cursor stays aligned for subsequent frames.
    pub fn poll_message(&mut self) -> Result<Option<Vec<C::Message>>, CodecError> {
        let Some(frame) = self.poll_frame()? else {
            return Ok(None);
        };
        match self.codec.decode_payload(&frame) {
            Ok(messages) => Ok(Some(messages)),
            Err(err) => {
                warn!("error decoding message from input stream: {err}");
                let err = CodecError::PayloadDecode(err);
                #[cfg(feature = "metrics")]
                crate::metrics::inc_errors(err.error_type());
                Err(err)
            }
        }
    }
}

impl<C: PayloadSerializer> Pipeline<C> {
    /// Serialize `message` into one self-framed outgoing span.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PayloadEncode`] if the serializer fails;
    /// terminal for this message only.
    pub fn encode_message(&self, message: &C::Message) -> Result<Frame, CodecError> {
        match self.encoder.encode(self.codec.as_ref(), message) {
            Ok(frame) => {
                #[cfg(feature = "metrics")]
                crate::metrics::inc_frames(
                    crate::metrics::Direction::Outbound,
                    u64::from(frame.total_len()),
                );
                Ok(frame)
            }
            Err(err) => {
                #[cfg(feature = "metrics")]
                crate::metrics::inc_errors(err.error_type());
                Err(err)
            }
        }
    }
}
