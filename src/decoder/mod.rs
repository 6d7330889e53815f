//! Incremental frame-reassembly state machine.
//!
//! [`FrameDecoder`] consumes transport bytes in whatever chunk sizes they
//! arrive, discovers each frame's total length from its variable-length
//! header, and emits exactly one complete [`Frame`] span at a time. The
//! decoder itself is stateless and may be shared across connections; all
//! per-connection memory lives in [`DecodeState`], owned by the connection
//! and threaded through every call.
//!
//! The contract per invocation:
//!
//! 1. With no cached header, peek-decode one. Too few bytes is `Ok(None)`
//!    with nothing consumed; on success the header is cached.
//! 2. With a cached header but fewer buffered bytes than the frame needs,
//!    `Ok(None)` again; the cache survives arbitrarily many such returns.
//! 3. Once enough bytes are buffered, the cache is cleared and exactly the
//!    frame's span is consumed and returned, so the next call starts a
//!    fresh header discovery.
//!
//! A malformed header is terminal for the connection and consumes nothing.

use log::debug;

use crate::{
    cursor::ReceiveCursor,
    error::FramingError,
    frame::Frame,
    varint::{self, FrameHeader},
};


/// Per-connection decode cache.
///
/// Holds the frame length discovered by the last successful header decode
/// until the frame it describes has been emitted. Cleared on emit and on
/// connection close; it must never outlive the frame it describes, or the
/// second frame of a multi-frame stream would be cut at the wrong boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeState {
    pending: Option<FrameHeader>,
}

impl DecodeState {
    /// Create an idle state with no cached header.
    #[must_use]
    pub const fn new() -> Self { Self { pending: None } }

    /// Frame length cached by the last header decode, if any.
    #[must_use]
    pub fn known_length(&self) -> Option<u32> { self.pending.map(|h| h.total_len()) }

    /// Whether the state is between frames.
    #[must_use]
    pub const fn is_idle(&self) -> bool { self.pending.is_none() }

    /// Discard any cached header, e.g. on connection close.
    pub fn clear(&mut self) { self.pending = None; }

    /// Advance the state machine against the currently unread bytes.
    ///
    /// Returns the header of a fully buffered frame, clearing the cache; the
    /// caller is then responsible for consuming exactly
    /// `header.total_len()` bytes. Returns `Ok(None)` when more input is
    /// needed, caching the header if it could already be read.
    pub(crate) fn poll(&mut self, unread: &[u8]) -> Result<Option<FrameHeader>, FramingError> {
        let header = match self.pending {
            Some(header) => header,
            None => {
                let Some(header) = varint::decode_header(unread)? else {
                    return Ok(None);
                };
                debug!(
                    "frame header decoded: total_len={} header_len={}",
                    header.total_len(),
                    header.header_len()
                );
                self.pending = Some(header);
                header
            }
        };
        if unread.len() < header.total_len() as usize {
            return Ok(None);
        }
        // Cleared before the frame leaves the decoder so the next
        // invocation starts a fresh header discovery.
        self.pending = None;
        Ok(Some(header))
    }
}

/// Stateless frame boundary detector, shareable across connections.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameDecoder;

impl FrameDecoder {
    /// Create a decoder.
    #[must_use]
    pub const fn new() -> Self { Self }

    /// Attempt to extract the next complete frame from `cursor`.
    ///
    /// Returns `Ok(None)` when more input is needed; no bytes are consumed
    /// on that path and `state` retains any discovered length. On success
    /// exactly the frame's span is consumed and `state` is reset.
    ///
    /// # Errors
    ///
    /// Returns a [`FramingError`] for a malformed header. No bytes are
    /// consumed; the connection should be closed.
    pub fn decode(
        &self,
        cursor: &mut ReceiveCursor,
        state: &mut DecodeState,
    ) -> Result<Option<Frame>, FramingError> {
        debug!("decode: remaining={}", cursor.remaining());
        let Some(header) = state.poll(cursor.unread())? else {
            return Ok(None);
        };
        let span = cursor.split_frame(header.total_len() as usize);
        Ok(Some(Frame::from_parts(span, header)))
    }
}
