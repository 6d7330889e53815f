//! Public API for the `blinkframe` library.
//!
//! This crate cuts a raw byte stream into discrete, complete message
//! frames and flattens outgoing messages back into self-framed byte spans.
//! Frames are delimited by a three-form variable-length header encoding
//! the frame's total length, header included; the decoder buffers
//! arbitrarily chunked transport deliveries until a whole frame is
//! available and emits exactly that span, never blocking and never losing
//! bytes across partial deliveries.
//!
//! Payload interpretation, connection lifecycle, and transport I/O are
//! collaborators: plug a [`PayloadDecoder`]/[`PayloadSerializer`] pair into
//! a per-connection [`Pipeline`], or use [`FrameCodec`] with
//! `tokio_util::codec` wrappers for frame-level access.

pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod payload;
pub mod pipeline;
pub mod session;
pub mod varint;

pub use codec::FrameCodec;
pub use cursor::ReceiveCursor;
pub use decoder::{DecodeState, FrameDecoder};
pub use encoder::FrameEncoder;
pub use error::{CodecError, ErrorDisposition, FramingError};
pub use frame::{Frame, FrameError};
#[cfg(feature = "metrics")]
pub use metrics::{Direction, ERRORS_TOTAL, FRAME_BYTES, FRAMES_PROCESSED, PIPELINES_ACTIVE};
pub use payload::{BincodePayloadCodec, Message, PayloadDecoder, PayloadSerializer};
pub use pipeline::Pipeline;
pub use session::{ConnectionId, PipelineRegistry};
pub use varint::{FrameHeader, HeaderEncoding};
