//! Immutable frame spans produced by the decoder.
//!
//! A [`Frame`] is one complete header-plus-payload byte span, exactly as it
//! appeared on the wire. The span is zero-copy ([`bytes::Bytes`]), so
//! handing it to a payload decoder or echoing it back out never clones the
//! buffer.

use bytes::Bytes;
use thiserror::Error;

use crate::{
    error::FramingError,
    varint::{self, FrameHeader, HeaderEncoding},
};

#[cfg(test)]
mod tests;

/// Errors constructing a [`Frame`] from a raw byte span.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The span's leading bytes are not a valid frame-size header.
    #[error(transparent)]
    Header(#[from] FramingError),
    /// The span is too short to contain its own header.
    #[error("frame span too short to contain a header")]
    IncompleteHeader,
    /// The span's length disagrees with the length its header declares.
    #[error("frame span of {actual} bytes does not match declared length {declared}")]
    LengthMismatch {
        /// Length declared by the embedded header.
        declared: u32,
        /// Actual span length.
        actual: usize,
    },
}

/// One complete frame: header bytes followed by payload bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
    header: FrameHeader,
}

impl Frame {
    /// Validate `bytes` as exactly one self-framed span.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] if the leading bytes do not decode to a
    /// header or the declared length differs from `bytes.len()`.
    pub fn new(bytes: Bytes) -> Result<Self, FrameError> {
        let header = varint::decode_header(&bytes)?.ok_or(FrameError::IncompleteHeader)?;
        if header.total_len() as usize != bytes.len() {
            return Err(FrameError::LengthMismatch {
                declared: header.total_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, header })
    }

    /// Build a frame from a span whose header the decoder already parsed.
    pub(crate) fn from_parts(bytes: Bytes, header: FrameHeader) -> Self {
        debug_assert_eq!(bytes.len(), header.total_len() as usize);
        Self { bytes, header }
    }

    /// Header-inclusive frame length in bytes.
    #[must_use]
    pub const fn total_len(&self) -> u32 { self.header.total_len() }

    /// Number of leading header bytes.
    #[must_use]
    pub const fn header_len(&self) -> u8 { self.header.header_len() }

    /// Offset of the first payload byte, equal to the header length.
    #[must_use]
    pub const fn payload_offset(&self) -> usize { self.header.header_len() as usize }

    /// Wire form of the embedded header.
    #[must_use]
    pub const fn header_encoding(&self) -> HeaderEncoding { self.header.encoding() }

    /// Payload bytes following the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.bytes[self.payload_offset()..] }

    /// The full span, header bytes included.
    #[must_use]
    pub fn as_bytes(&self) -> &Bytes { &self.bytes }

    /// Consume the frame and return the full span.
    #[must_use]
    pub fn into_bytes(self) -> Bytes { self.bytes }
}
