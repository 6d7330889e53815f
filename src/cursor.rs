//! Growable view over a connection's unconsumed transport bytes.
//!
//! [`ReceiveCursor`] accumulates whatever chunk sizes the transport
//! delivers and lets the decoder peek at header bytes without consuming
//! them. Bytes leave the cursor only through [`ReceiveCursor::split_frame`],
//! once a complete frame has been verified, so nothing is ever lost across
//! partial deliveries.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// Error returned by [`ReceiveCursor::reset`] when no mark is set.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cursor reset without a prior mark")]
pub struct ResetWithoutMark;

/// Per-connection cursor over unconsumed received bytes.
#[derive(Debug, Default)]
pub struct ReceiveCursor {
    buf: BytesMut,
    pos: usize,
    mark: Option<usize>,
    consumed: u64,
}

impl ReceiveCursor {
    /// Create an empty cursor.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create an empty cursor with `capacity` bytes preallocated.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a chunk of transport bytes.
    pub fn extend(&mut self, bytes: &[u8]) { self.buf.extend_from_slice(bytes); }

    /// Number of unread bytes available.
    #[must_use]
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// Whether no unread bytes remain.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.remaining() == 0 }

    /// Read position as a running count over the connection's lifetime.
    #[must_use]
    pub fn position(&self) -> u64 { self.consumed + self.pos as u64 }

    /// Unread bytes, without consuming them.
    #[must_use]
    pub fn unread(&self) -> &[u8] { &self.buf[self.pos..] }

    /// Remember the current read position for a later [`Self::reset`].
    pub fn mark(&mut self) { self.mark = Some(self.pos); }

    /// Rewind the read position to the last [`Self::mark`], clearing it.
    ///
    /// # Errors
    ///
    /// Returns [`ResetWithoutMark`] if no mark is set or the marked bytes
    /// were already split off.
    pub fn reset(&mut self) -> Result<(), ResetWithoutMark> {
        let mark = self.mark.take().ok_or(ResetWithoutMark)?;
        self.pos = mark;
        Ok(())
    }

    /// Advance the read position by `n` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`Self::remaining`].
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance past end of cursor");
        self.pos += n;
    }

    /// Consume exactly `len` bytes from the read position as one span.
    ///
    /// Everything before the span, including bytes skipped over with
    /// [`Self::advance`], is reclaimed and any mark is invalidated. The
    /// returned span shares the underlying allocation.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`Self::remaining`].
    pub fn split_frame(&mut self, len: usize) -> Bytes {
        assert!(len <= self.remaining(), "split past end of cursor");
        let end = self.pos + len;
        let head = self.buf.split_to(end).freeze();
        self.consumed += end as u64;
        let span = head.slice(self.pos..);
        self.pos = 0;
        self.mark = None;
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_and_remaining_track_deliveries() {
        let mut cursor = ReceiveCursor::new();
        assert!(cursor.is_empty());
        cursor.extend(&[1, 2, 3]);
        cursor.extend(&[4]);
        assert_eq!(cursor.remaining(), 4);
        assert_eq!(cursor.unread(), &[1, 2, 3, 4]);
    }

    #[test]
    fn mark_and_reset_rewind_the_read_position() {
        let mut cursor = ReceiveCursor::new();
        cursor.extend(&[1, 2, 3, 4]);
        cursor.mark();
        cursor.advance(3);
        assert_eq!(cursor.unread(), &[4]);
        cursor.reset().expect("mark was set");
        assert_eq!(cursor.unread(), &[1, 2, 3, 4]);
    }

    #[test]
    fn reset_without_mark_errors() {
        let mut cursor = ReceiveCursor::new();
        assert_eq!(cursor.reset(), Err(ResetWithoutMark));
    }

    #[test]
    fn split_frame_consumes_exactly_and_advances_position() {
        let mut cursor = ReceiveCursor::new();
        cursor.extend(&[1, 2, 3, 4, 5]);
        let span = cursor.split_frame(3);
        assert_eq!(&span[..], &[1, 2, 3]);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.unread(), &[4, 5]);
    }

    #[test]
    fn split_frame_reclaims_advanced_prefix() {
        let mut cursor = ReceiveCursor::new();
        cursor.extend(&[9, 9, 1, 2]);
        cursor.advance(2);
        let span = cursor.split_frame(2);
        assert_eq!(&span[..], &[1, 2]);
        assert_eq!(cursor.position(), 4);
        assert!(cursor.is_empty());
    }

    #[test]
    #[should_panic(expected = "split past end of cursor")]
    fn split_frame_past_end_panics() {
        let mut cursor = ReceiveCursor::new();
        cursor.extend(&[1]);
        let _ = cursor.split_frame(2);
    }
}
