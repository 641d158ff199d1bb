//! Reassembly counters.

use super::Error;

/// Counters kept by a [`StreamReassembler`](super::StreamReassembler).
///
/// Counters are owned by the reassembler instance; take a copy with
/// [`StreamReassembler::stats`](super::StreamReassembler::stats).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Frames delivered
    pub frames: u64,
    /// Complete frame candidates rejected by their checksum
    pub checksum_errors: u64,
    /// Drop runs that started at an implausible header
    pub malformed: u64,
    /// Bytes discarded by drops and resets
    pub bytes_discarded: u64,
    /// Calls to `reset`
    pub resets: u64,
}

impl ReassemblyStats {
    #[inline]
    pub(crate) fn record_frame(&mut self) {
        self.frames += 1;
    }

    #[inline]
    pub(crate) fn record_checksum_error(&mut self) {
        self.checksum_errors += 1;
    }

    /// Account for a drop run. Checksum failures are counted as they occur,
    /// so a run started by one only adds to `bytes_discarded`.
    #[inline]
    pub(crate) fn record_drop(&mut self, error: &Error, discarded: usize) {
        match error {
            Error::ChecksumMismatch { .. } => {}
            Error::MalformedFrame { .. } | Error::PayloadTooLarge { .. } => self.malformed += 1,
        }
        self.bytes_discarded += discarded as u64;
    }

    #[inline]
    pub(crate) fn record_reset(&mut self, discarded: usize) {
        self.resets += 1;
        self.bytes_discarded += discarded as u64;
    }

    /// Checksum rejections plus malformed drop runs.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.checksum_errors + self.malformed
    }
}
