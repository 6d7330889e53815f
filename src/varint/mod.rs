//! Variable-length frame-size header codec.
//!
//! Every frame begins with a self-describing header encoding the frame's
//! total byte length, header included. Three forms exist, selected by the
//! leading byte `b`:
//!
//! - one byte (`b & 0x80 == 0`): `total = b + 1`
//! - two bytes (`b & 0xC0 == 0x80`): `total = ((b2 << 6) | (b & 0x3f)) + 2`
//! - extended (`b & 0xC0 == 0xC0`): `w = b & 0x3f` little-endian value bytes
//!   follow, `total = value + 1 + w`; widths above four are rejected
//!
//! In every form the encoded value works out to the payload byte count, so
//! `total >= header_len >= 1` holds for any decodable header. Decoding is a
//! pure peek: it never consumes bytes and returns `Ok(None)` when the input
//! is too short to finish reading the header.

use bytes::{BufMut, BytesMut};

use crate::error::FramingError;


/// Widest supported extended-form header value, in bytes.
pub const MAX_EXTENDED_WIDTH: u8 = 4;

/// Largest header-inclusive length the one-byte form can carry.
pub const ONE_BYTE_MAX_TOTAL: u32 = 0x7f + 1;

/// Largest header-inclusive length the two-byte form can carry.
pub const TWO_BYTE_MAX_TOTAL: u32 = 0x3fff + 2;

/// Header form on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderEncoding {
    /// Single-byte form for frames up to [`ONE_BYTE_MAX_TOTAL`] bytes.
    OneByte,
    /// Two-byte form for frames up to [`TWO_BYTE_MAX_TOTAL`] bytes.
    TwoByte,
    /// Extended form with the given value width in `1..=4` bytes.
    Extended(u8),
}

impl HeaderEncoding {
    /// Number of header bytes this form occupies on the wire.
    #[must_use]
    pub const fn header_len(self) -> u8 {
        match self {
            Self::OneByte => 1,
            Self::TwoByte => 2,
            Self::Extended(width) => 1 + width,
        }
    }

    /// Smallest form able to carry a header-inclusive length of `total_len`.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::EmptyFrame`] for `total_len == 0`; every
    /// other `u32` length is representable.
    pub fn minimal_for_total(total_len: u32) -> Result<Self, FramingError> {
        if total_len == 0 {
            return Err(FramingError::EmptyFrame);
        }
        if total_len <= ONE_BYTE_MAX_TOTAL {
            return Ok(Self::OneByte);
        }
        if total_len <= TWO_BYTE_MAX_TOTAL {
            return Ok(Self::TwoByte);
        }
        for width in 1..=MAX_EXTENDED_WIDTH {
            let header_len = u32::from(width) + 1;
            let value = total_len - header_len;
            if width == MAX_EXTENDED_WIDTH || u64::from(value) <= width_max(width) {
                return Ok(Self::Extended(width));
            }
        }
        unreachable!("width 4 carries any u32 value")
    }

    /// Smallest form for a frame whose payload is `payload_len` bytes.
    ///
    /// Unlike [`Self::minimal_for_total`] this resolves the circularity of
    /// the total length depending on the header width: the encoded value is
    /// the payload length in every form.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::LengthOverflow`] if the payload plus its
    /// header does not fit in `u32`.
    pub fn minimal_for_payload(payload_len: u32) -> Result<Self, FramingError> {
        let encoding = if payload_len <= 0x7f {
            Self::OneByte
        } else if payload_len <= 0x3fff {
            Self::TwoByte
        } else {
            let mut width = 1;
            while u64::from(payload_len) > width_max(width) {
                width += 1;
            }
            Self::Extended(width)
        };
        let header_len = u32::from(encoding.header_len());
        payload_len
            .checked_add(header_len)
            .ok_or(FramingError::LengthOverflow {
                length: u64::from(payload_len) + u64::from(header_len),
            })?;
        Ok(encoding)
    }
}

/// Decoded frame-size header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    total_len: u32,
    encoding: HeaderEncoding,
}

impl FrameHeader {
    /// Header-inclusive frame length in bytes.
    #[must_use]
    pub const fn total_len(&self) -> u32 { self.total_len }

    /// Number of header bytes.
    #[must_use]
    pub const fn header_len(&self) -> u8 { self.encoding.header_len() }

    /// Number of payload bytes following the header.
    #[must_use]
    pub const fn payload_len(&self) -> u32 { self.total_len - self.header_len() as u32 }

    /// Wire form the header was (or will be) encoded with.
    #[must_use]
    pub const fn encoding(&self) -> HeaderEncoding { self.encoding }
}

const fn width_max(width: u8) -> u64 { (1 << (8 * width as u32)) - 1 }

/// Decode a frame-size header from the start of `bytes` without consuming.
///
/// Returns `Ok(None)` when `bytes` is too short to finish reading the
/// header. Repeated calls on the same bytes return the same header.
///
/// # Errors
///
/// Returns [`FramingError::HeaderTooLarge`] for an extended width above
/// four, or [`FramingError::LengthOverflow`] when the declared length does
/// not fit in `u32`. Neither consumes input.
pub fn decode_header(bytes: &[u8]) -> Result<Option<FrameHeader>, FramingError> {
    let Some(&first) = bytes.first() else {
        return Ok(None);
    };
    if first & 0x80 == 0 {
        return Ok(Some(FrameHeader {
            total_len: u32::from(first) + 1,
            encoding: HeaderEncoding::OneByte,
        }));
    }
    if first & 0x40 == 0 {
        let Some(&second) = bytes.get(1) else {
            return Ok(None);
        };
        let total_len = ((u32::from(second) << 6) | u32::from(first & 0x3f)) + 2;
        return Ok(Some(FrameHeader {
            total_len,
            encoding: HeaderEncoding::TwoByte,
        }));
    }
    let width = first & 0x3f;
    if width > MAX_EXTENDED_WIDTH {
        return Err(FramingError::HeaderTooLarge { width });
    }
    if bytes.len() < 1 + width as usize {
        return Ok(None);
    }
    let mut value: u64 = 0;
    for (i, &byte) in bytes[1..=width as usize].iter().enumerate() {
        value |= u64::from(byte) << (8 * i);
    }
    let header_len = u64::from(width) + 1;
    let total = value + header_len;
    let total_len =
        u32::try_from(total).map_err(|_| FramingError::LengthOverflow { length: total })?;
    Ok(Some(FrameHeader {
        total_len,
        encoding: HeaderEncoding::Extended(width),
    }))
}

/// Append the smallest header encoding `total_len` to `dst`.
///
/// Returns the number of header bytes written.
///
/// # Errors
///
/// Returns [`FramingError::EmptyFrame`] when `total_len` is zero.
pub fn encode_header(total_len: u32, dst: &mut BytesMut) -> Result<u8, FramingError> {
    let encoding = HeaderEncoding::minimal_for_total(total_len)?;
    encode_header_with(encoding, total_len, dst)
}

/// Append a header for `total_len` to `dst` using a specific form.
///
/// Producers are free to pick a wider form than strictly necessary; frames
/// re-encoded with their recorded [`HeaderEncoding`] reproduce their
/// original header bytes exactly.
///
/// # Errors
///
/// Returns [`FramingError::HeaderTooLarge`] for an extended width above
/// four, or [`FramingError::FormMismatch`] when the form cannot carry
/// `total_len`.
pub fn encode_header_with(
    encoding: HeaderEncoding,
    total_len: u32,
    dst: &mut BytesMut,
) -> Result<u8, FramingError> {
    let mismatch = FramingError::FormMismatch {
        total_len,
        encoding,
    };
    match encoding {
        HeaderEncoding::OneByte => {
            if total_len < 1 || total_len > ONE_BYTE_MAX_TOTAL {
                return Err(mismatch);
            }
            dst.put_u8((total_len - 1) as u8);
        }
        HeaderEncoding::TwoByte => {
            if total_len < 2 || total_len > TWO_BYTE_MAX_TOTAL {
                return Err(mismatch);
            }
            let value = total_len - 2;
            dst.put_u8(0x80 | (value & 0x3f) as u8);
            dst.put_u8((value >> 6) as u8);
        }
        HeaderEncoding::Extended(width) => {
            if width == 0 || width > MAX_EXTENDED_WIDTH {
                return Err(FramingError::HeaderTooLarge { width });
            }
            let header_len = u32::from(width) + 1;
            let value = total_len.checked_sub(header_len).ok_or(mismatch)?;
            if u64::from(value) > width_max(width) {
                return Err(mismatch);
            }
            dst.put_u8(0xc0 | width);
            for i in 0..width {
                dst.put_u8((value >> (8 * u32::from(i))) as u8);
            }
        }
    }
    Ok(encoding.header_len())
}
