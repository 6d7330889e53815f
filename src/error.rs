//! Error types for the framing layer.
//!
//! The taxonomy separates wire-level framing violations ([`FramingError`])
//! from payload codec faults and transport I/O errors, all wrapped by the
//! top-level [`CodecError`]. "Need more input" is deliberately absent: an
//! incomplete frame is the `Ok(None)` arm of every decode call, never an
//! error, and is never logged as a failure.
//!
//! Each terminal error reports a categorical code via
//! [`CodecError::error_type`] and a recommended [`ErrorDisposition`] so
//! hosts can decide between dropping a frame, dropping a message, or
//! tearing down the connection.

use std::{error::Error, io};

use thiserror::Error;

use crate::varint::HeaderEncoding;

/// Wire-level errors in the variable-length frame header.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Extended-form header declares a width beyond the supported maximum.
    #[error("extended header width {width} exceeds the maximum of 4")]
    HeaderTooLarge {
        /// Width requested by the leading byte.
        width: u8,
    },

    /// Decoded frame length does not fit the supported range.
    #[error("frame length {length} overflows the supported range")]
    LengthOverflow {
        /// Length value carried by the header.
        length: u64,
    },

    /// A zero-length frame cannot be represented by any header form.
    #[error("zero-length frame is not representable")]
    EmptyFrame,

    /// Requested header form cannot carry the given frame length.
    #[error("frame length {total_len} does not fit header form {encoding:?}")]
    FormMismatch {
        /// Header-inclusive frame length.
        total_len: u32,
        /// Header form that was requested.
        encoding: HeaderEncoding,
    },
}

impl FramingError {
    /// Recommended handling for this framing violation.
    ///
    /// Malformed headers poison the stream position and require closing the
    /// connection; encode-side form errors only lose the outgoing message.
    #[must_use]
    pub const fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::HeaderTooLarge { .. } | Self::LengthOverflow { .. } => {
                ErrorDisposition::CloseConnection
            }
            Self::EmptyFrame | Self::FormMismatch { .. } => ErrorDisposition::DropMessage,
        }
    }
}

/// Recommended handling for a terminal codec error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// The stream position can no longer be trusted; terminate the connection.
    CloseConnection,
    /// Discard the offending inbound frame and continue with the next one.
    DropFrame,
    /// Discard the offending outbound message; the connection is unaffected.
    DropMessage,
}

/// Top-level error for frame decode and encode operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Wire-level framing violation.
    #[error("framing violation: {0}")]
    Framing(#[from] FramingError),

    /// The payload decoder rejected a well-framed byte span.
    #[error("error decoding payload from input stream: {0}")]
    PayloadDecode(#[source] Box<dyn Error + Send + Sync>),

    /// The payload serializer failed to produce a framed representation.
    #[error("error encoding payload to output stream: {0}")]
    PayloadEncode(#[source] Box<dyn Error + Send + Sync>),

    /// Transport or output-buffer fault.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Categorical code for logging and metrics labels.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Framing(_) => "framing",
            Self::PayloadDecode(_) => "payload-decode",
            Self::PayloadEncode(_) => "payload-encode",
            Self::Io(_) => "io",
        }
    }

    /// Recommended handling for this error.
    ///
    /// A payload decode failure is terminal for the frame but leaves the
    /// cursor at the next frame boundary, so parsing may continue; framing
    /// and I/O failures do not.
    #[must_use]
    pub const fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::Framing(e) => e.disposition(),
            Self::PayloadDecode(_) => ErrorDisposition::DropFrame,
            Self::PayloadEncode(_) => ErrorDisposition::DropMessage,
            Self::Io(_) => ErrorDisposition::CloseConnection,
        }
    }

    /// Whether the connection should be terminated after this error.
    #[must_use]
    pub const fn should_disconnect(&self) -> bool {
        matches!(self.disposition(), ErrorDisposition::CloseConnection)
    }
}
