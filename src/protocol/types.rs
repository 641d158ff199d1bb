//! Frame type abstraction and diagnostic formatting helpers

use std::fmt;

/// Numeric frame type carried in every frame header.
///
/// Each device family supplies its own enumeration. Conversion from the raw
/// `u16` must be total (use a catch-all variant for unknown values) so that
/// decoding never fails on an unrecognised type.
///
/// ```
/// use vport::FrameType;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Lt {
///     StateRequest,
///     Other(u16),
/// }
///
/// impl From<u16> for Lt {
///     fn from(raw: u16) -> Self {
///         match raw {
///             0x3231 => Self::StateRequest,
///             other => Self::Other(other),
///         }
///     }
/// }
///
/// impl From<Lt> for u16 {
///     fn from(t: Lt) -> Self {
///         match t {
///             Lt::StateRequest => 0x3231,
///             Lt::Other(raw) => raw,
///         }
///     }
/// }
///
/// assert_eq!(Lt::from_raw(0x3231).into_raw(), 0x3231);
/// ```
pub trait FrameType: Copy + fmt::Debug + From<u16> + Into<u16> {
    /// Convert from the wire value
    #[must_use]
    fn from_raw(raw: u16) -> Self {
        Self::from(raw)
    }

    /// Convert to the wire value
    #[must_use]
    fn into_raw(self) -> u16 {
        self.into()
    }
}

impl<T> FrameType for T where T: Copy + fmt::Debug + From<u16> + Into<u16> {}

/// Formats a byte as its eight-character bit pattern, most significant bit first.
///
/// Used when dumping device flag bytes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits(pub u8);

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_u16_is_frame_type() {
        assert_eq!(<u16 as FrameType>::from_raw(0x1234), 0x1234);
        assert_eq!(0xBEEFu16.into_raw(), 0xBEEF);
    }

    #[test]
    fn test_bits_formatting() {
        assert_eq!(Bits(0).to_string(), "00000000");
        assert_eq!(Bits(0b1000_0001).to_string(), "10000001");
        assert_eq!(Bits(0xFF).to_string(), "11111111");
        assert_eq!(Bits(0x05).to_string(), "00000101");
    }
}
