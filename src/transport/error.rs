//! Transport-level error types covering configuration, codec and write failures.

use thiserror::Error;

use crate::protocol;

/// Failure reported by a [`PacketWriter`](super::PacketWriter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("packet write failed: {reason}")]
pub struct WriteError {
    /// Human-readable reason supplied by the transport.
    pub reason: String,
}

impl WriteError {
    /// Create a write error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Unified error type for link operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Frame encoding failure.
    #[error("codec error: {0}")]
    Codec(#[from] protocol::Error),
    /// The first packet of a frame could not be written; nothing was sent.
    #[error("transport write failed: {0}")]
    WriteFailed(WriteError),
    /// A later packet of a multi-packet frame failed; the peer holds a partial frame.
    #[error("send failed after {sent} of {total} packets: {source}")]
    PartialSendUnknownState {
        /// Packets successfully written before the failure.
        sent: usize,
        /// Packets the frame was split into.
        total: usize,
        /// Underlying write failure.
        source: WriteError,
    },
    /// The link is closed.
    #[error("link is closed")]
    Closed,
    /// Configuration rejected at construction.
    #[error("invalid link configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: &'static str,
    },
}
