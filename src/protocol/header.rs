//! Tion LT frame header
//!
//! The header is 6 bytes and precedes the payload of every frame.

use super::{
    Error, FRAME_MAGIC, FRAME_RANDOM, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE,
};

/// Tion LT frame header (6 bytes)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      Frame Size (2, LE)       |  Magic (0x3A) |    Random     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      Frame Type (2, LE)       |          Payload ...          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The frame size counts the whole frame including the trailing checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    frame_size: u16,
    magic: u8,
    random: u8,
    frame_type: u16,
}

impl FrameHeader {
    /// Create a header for a payload of the given length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if `payload_len` exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn new(frame_type: u16, payload_len: usize) -> super::Result<Self> {
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        // Bounded by MAX_FRAME_SIZE above.
        #[allow(clippy::cast_possible_truncation)]
        let frame_size = (MIN_FRAME_SIZE + payload_len) as u16;

        Ok(Self {
            frame_size,
            magic: FRAME_MAGIC,
            random: FRAME_RANDOM,
            frame_type,
        })
    }

    /// Total frame size declared by the header
    #[must_use]
    pub const fn frame_size(&self) -> usize {
        self.frame_size as usize
    }

    /// Payload length implied by the declared frame size
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.frame_size() - MIN_FRAME_SIZE
    }

    /// Raw frame type
    #[must_use]
    pub const fn frame_type(&self) -> u16 {
        self.frame_type
    }

    /// Random byte as received
    #[must_use]
    pub const fn random(&self) -> u8 {
        self.random
    }

    /// Validate magic and size bounds
    pub fn validate(&self) -> super::Result<()> {
        if self.magic != FRAME_MAGIC {
            return Err(Error::malformed("invalid magic byte"));
        }

        let size = self.frame_size();
        if size < MIN_FRAME_SIZE {
            return Err(Error::malformed("declared size below minimum frame size"));
        }
        if size > MAX_FRAME_SIZE {
            return Err(Error::malformed("declared size above maximum frame size"));
        }

        Ok(())
    }

    /// Convert to bytes
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..2].copy_from_slice(&self.frame_size.to_le_bytes());
        bytes[2] = self.magic;
        bytes[3] = self.random;
        bytes[4..6].copy_from_slice(&self.frame_type.to_le_bytes());

        bytes
    }

    /// Parse and validate from bytes.
    pub fn from_bytes(bytes: &[u8]) -> super::Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::malformed("buffer shorter than frame header"));
        }

        let header = Self {
            frame_size: u16::from_le_bytes([bytes[0], bytes[1]]),
            magic: bytes[2],
            random: bytes[3],
            frame_type: u16::from_le_bytes([bytes[4], bytes[5]]),
        };

        header.validate()?;
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = FrameHeader::new(0x3231, 4).unwrap();
        assert_eq!(header.to_bytes(), [0x0C, 0x00, 0x3A, 0xAD, 0x31, 0x32]);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = FrameHeader::new(0xABCD, 100).unwrap();
        let decoded = FrameHeader::from_bytes(&header.to_bytes()).unwrap();

        assert_eq!(decoded, header);
        assert_eq!(decoded.frame_size(), MIN_FRAME_SIZE + 100);
        assert_eq!(decoded.payload_len(), 100);
        assert_eq!(decoded.frame_type(), 0xABCD);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = FrameHeader::new(1, 0).unwrap().to_bytes();
        bytes[2] = 0x55;

        let result = FrameHeader::from_bytes(&bytes);
        assert!(matches!(result, Err(Error::MalformedFrame { .. })));
    }

    #[test]
    fn test_size_bounds() {
        let mut bytes = FrameHeader::new(1, 0).unwrap().to_bytes();
        bytes[0..2].copy_from_slice(&((MIN_FRAME_SIZE - 1) as u16).to_le_bytes());
        assert!(FrameHeader::from_bytes(&bytes).is_err());

        bytes[0..2].copy_from_slice(&((MAX_FRAME_SIZE + 1) as u16).to_le_bytes());
        assert!(FrameHeader::from_bytes(&bytes).is_err());

        bytes[0..2].copy_from_slice(&(MAX_FRAME_SIZE as u16).to_le_bytes());
        assert!(FrameHeader::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_new_rejects_oversized_payload() {
        let header = FrameHeader::new(1, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(header.frame_size(), MAX_FRAME_SIZE);

        assert_eq!(
            FrameHeader::new(1, MAX_PAYLOAD_SIZE + 1),
            Err(Error::PayloadTooLarge {
                size: MAX_PAYLOAD_SIZE + 1,
                max: MAX_PAYLOAD_SIZE,
            })
        );
        assert!(FrameHeader::new(1, usize::from(u16::MAX)).is_err());
    }

    #[test]
    fn test_short_buffer() {
        assert!(matches!(
            FrameHeader::from_bytes(&[0x08, 0x00, 0x3A]),
            Err(Error::MalformedFrame { .. })
        ));
    }
}
