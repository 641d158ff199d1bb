//! Frame protocol error types

use thiserror::Error;

/// Frame codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Header or length inconsistency
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// What was inconsistent
        reason: &'static str,
    },

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:#06x}, got {found:#06x}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u16,
        /// Checksum carried by the frame
        found: u16,
    },

    /// Payload too large
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl Error {
    pub(crate) const fn malformed(reason: &'static str) -> Self {
        Self::MalformedFrame { reason }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
