//! Payload codec collaborator interfaces and the bincode default.
//!
//! The framing layer never interprets payload bytes itself. Inbound, a
//! [`PayloadDecoder`] receives exactly one frame's span (header included)
//! and produces zero or more domain objects; outbound, a
//! [`PayloadSerializer`] writes a complete self-framed representation into
//! the buffer the encoder supplies.
//!
//! [`BincodePayloadCodec`] is the default implementation for any
//! [`Message`] type, framing bincode bodies with the minimal header form.

use std::error::Error;

use bincode::{
    BorrowDecode,
    Encode,
    borrow_decode_from_slice,
    config,
    encode_to_vec,
    error::DecodeError,
};
use bytes::BytesMut;

use crate::{
    error::FramingError,
    frame::Frame,
    varint::{self, HeaderEncoding},
};

/// Marker trait for domain types the default codec can carry.
///
/// Any type deriving [`Encode`] and [`BorrowDecode`] automatically
/// implements `Message`.
pub trait Message: Encode + for<'de> BorrowDecode<'de, ()> {}

impl<T> Message for T where for<'de> T: Encode + BorrowDecode<'de, ()> {}

/// Decodes domain objects from one complete frame span.
pub trait PayloadDecoder {
    /// Domain object type produced from frames.
    type Message;

    /// Decode zero or more messages from exactly one frame's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the well-framed bytes cannot be interpreted.
    /// The failure is terminal for this frame only.
    fn decode_payload(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Self::Message>, Box<dyn Error + Send + Sync>>;
}

/// Serializes one domain object into a self-framed byte representation.
pub trait PayloadSerializer {
    /// Domain object type written to frames.
    type Message;

    /// Write a complete frame (header and body) for `message` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn serialize_payload(
        &self,
        message: &Self::Message,
        dst: &mut BytesMut,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Default payload codec carrying bincode-encoded messages.
///
/// On the wire a frame is the minimal varint header followed by one or more
/// bincode bodies back to back; decoding drains the payload span until it
/// is exhausted.
#[derive(Debug)]
pub struct BincodePayloadCodec<M> {
    _marker: std::marker::PhantomData<fn() -> M>,
}

impl<M> BincodePayloadCodec<M> {
    /// Create a codec for message type `M`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<M> Default for BincodePayloadCodec<M> {
    fn default() -> Self { Self::new() }
}

impl<M> Clone for BincodePayloadCodec<M> {
    fn clone(&self) -> Self { Self::new() }
}

impl<M: Message> PayloadDecoder for BincodePayloadCodec<M> {
    type Message = M;

    fn decode_payload(&self, frame: &Frame) -> Result<Vec<M>, Box<dyn Error + Send + Sync>> {
        let mut remaining = frame.payload();
        let mut messages = Vec::new();
        while !remaining.is_empty() {
            let (message, consumed) = borrow_decode_from_slice(remaining, config::standard())?;
            if consumed == 0 {
                return Err(Box::new(DecodeError::OtherString(
                    "payload decoder consumed no bytes".to_string(),
                )));
            }
            messages.push(message);
            remaining = &remaining[consumed..];
        }
        Ok(messages)
    }
}

impl<M: Message> PayloadSerializer for BincodePayloadCodec<M> {
    type Message = M;

    fn serialize_payload(
        &self,
        message: &M,
        dst: &mut BytesMut,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let body = encode_to_vec(message, config::standard())?;
        let payload_len = u32::try_from(body.len()).map_err(|_| FramingError::LengthOverflow {
            length: body.len() as u64,
        })?;
        let encoding = HeaderEncoding::minimal_for_payload(payload_len)?;
        let total_len = payload_len + u32::from(encoding.header_len());
        varint::encode_header_with(encoding, total_len, dst)?;
        dst.extend_from_slice(&body);
        Ok(())
    }
}
