//! Tion LT frame codec (encode/decode)
//!
//! This module provides encoding and decoding of single frames. Splitting a
//! byte stream into frames is the job of the
//! [`StreamReassembler`](super::StreamReassembler).

use bytes::Bytes;

use super::{
    CHECKSUM_SIZE, Error, Frame, FrameHeader, FrameType, HEADER_SIZE, Result, crc16_ccitt_false,
};

/// Receive-side decoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Verify the trailing checksum of received frames.
    pub rx_crc: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { rx_crc: true }
    }
}

/// Result of inspecting the front of a receive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePeek {
    /// Not enough bytes to read a header yet.
    Incomplete,
    /// The buffer does not start with a plausible frame header.
    Invalid(Error),
    /// A plausible header declaring a frame of this many bytes.
    Complete(usize),
}

/// Encode a frame to bytes
///
/// # Format
///
/// ```text
/// [HEADER (6 bytes)] [PAYLOAD (variable)] [CRC16 (2 bytes, big-endian)]
/// ```
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the payload does not fit in a frame.
pub fn encode<T: FrameType>(frame_type: T, payload: &[u8]) -> Result<Vec<u8>> {
    let header = FrameHeader::new(frame_type.into_raw(), payload.len())?;
    let mut bytes = Vec::with_capacity(header.frame_size());

    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(payload);

    // Checksum covers header + payload
    let crc = crc16_ccitt_false(&bytes);
    bytes.extend_from_slice(&crc.to_be_bytes());

    Ok(bytes)
}

/// Decode a frame from bytes containing exactly one frame.
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than a header
/// - Magic byte is invalid
/// - Declared size is out of range or differs from the buffer length
/// - Checksum doesn't match (only when `opts.rx_crc` is set)
pub fn decode<T: FrameType>(bytes: &[u8], opts: DecodeOptions) -> Result<Frame<T>> {
    decode_bytes(Bytes::copy_from_slice(bytes), opts)
}

/// Zero-copy variant of [`decode`] used by the reassembler.
pub(crate) fn decode_bytes<T: FrameType>(bytes: Bytes, opts: DecodeOptions) -> Result<Frame<T>> {
    let header = FrameHeader::from_bytes(&bytes)?;

    let total_size = header.frame_size();
    if bytes.len() != total_size {
        return Err(Error::malformed("declared size does not match frame length"));
    }

    if opts.rx_crc {
        verify_checksum(&bytes)?;
    }

    let checksum_offset = total_size - CHECKSUM_SIZE;
    let payload = bytes.slice(HEADER_SIZE..checksum_offset);
    Ok(Frame::new(T::from_raw(header.frame_type()), payload))
}

/// Check the trailing checksum of a buffer holding exactly one frame.
pub(crate) fn verify_checksum(frame: &[u8]) -> Result<()> {
    let Some(checksum_offset) = frame.len().checked_sub(CHECKSUM_SIZE) else {
        return Err(Error::malformed("buffer shorter than checksum"));
    };
    let found = u16::from_be_bytes([frame[checksum_offset], frame[checksum_offset + 1]]);
    let expected = crc16_ccitt_false(&frame[..checksum_offset]);
    if found != expected {
        return Err(Error::ChecksumMismatch { expected, found });
    }
    Ok(())
}

/// Inspect the front of `buf` for a frame boundary without consuming anything.
#[must_use]
pub fn peek_frame_len(buf: &[u8]) -> FramePeek {
    if buf.len() < HEADER_SIZE {
        return FramePeek::Incomplete;
    }
    match FrameHeader::from_bytes(&buf[..HEADER_SIZE]) {
        Ok(header) => FramePeek::Complete(header.frame_size()),
        Err(err) => FramePeek::Invalid(err),
    }
}
