//! Stream reassembly of frames from arbitrarily chunked transport data.
//!
//! Incoming bytes are appended to a single `BytesMut` buffer and frames are
//! cut from its front as soon as their declared size is available:
//!
//! - fewer bytes than needed to judge the header: wait for more data
//! - implausible header (bad magic, size out of range): drop one byte and rescan
//! - plausible header, incomplete body: wait for more data, unless a complete
//!   frame with a valid checksum already starts later in the buffer
//! - complete body with a bad checksum: drop one byte and rescan
//!
//! A plausible header is never trusted beyond its first byte until its
//! checksum holds, so a fake header in line noise cannot swallow the real
//! frame behind it. Consecutive discarded bytes are reported as one
//! [`ReassemblyEvent::Dropped`] carrying the error that started the run.
//! Drops never stop the stream.

use std::marker::PhantomData;

use bytes::{Buf, BytesMut};
use tracing::{trace, warn};

use super::codec::{decode_bytes, verify_checksum};
use super::{
    DecodeOptions, Error, FRAME_MAGIC, Frame, FrameType, MAX_FRAME_SIZE, MIN_FRAME_SIZE,
    ReassemblyStats,
};

/// Non-fatal report of bytes discarded while resynchronising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Why the first byte of the run was discarded
    pub error: Error,
    /// Number of bytes removed from the buffer
    pub discarded: usize,
}

/// Output of [`StreamReassembler::feed`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassemblyEvent<T: FrameType> {
    /// A complete, validated frame.
    Frame(Frame<T>),
    /// Bytes were discarded to regain synchronisation.
    Dropped(Diagnostic),
}

/// Verdict on a header candidate at the start of a slice.
enum Header {
    NeedMore,
    Implausible(Error),
    Plausible(usize),
}

/// Where the front of the buffer stands.
enum Scan {
    NeedMore,
    Skip(usize, Error),
    Frame(usize),
}

// Judge the header fields as soon as each one is available so garbage
// shorter than a header does not linger in the buffer.
fn judge_header(buf: &[u8]) -> Header {
    if buf.len() < 2 {
        return Header::NeedMore;
    }

    let size = usize::from(u16::from_le_bytes([buf[0], buf[1]]));
    if size < MIN_FRAME_SIZE {
        return Header::Implausible(Error::malformed("declared size below minimum frame size"));
    }
    if size > MAX_FRAME_SIZE {
        return Header::Implausible(Error::malformed("declared size above maximum frame size"));
    }

    if buf.len() < 3 {
        return Header::NeedMore;
    }
    if buf[2] != FRAME_MAGIC {
        return Header::Implausible(Error::malformed("invalid magic byte"));
    }

    Header::Plausible(size)
}

/// Accumulates transport chunks and yields complete frames.
#[derive(Debug)]
pub struct StreamReassembler<T: FrameType> {
    buffer: BytesMut,
    opts: DecodeOptions,
    stats: ReassemblyStats,
    _frame: PhantomData<fn() -> T>,
}

impl<T: FrameType> StreamReassembler<T> {
    /// Create a reassembler with the given decode policy.
    #[must_use]
    pub fn new(opts: DecodeOptions) -> Self {
        Self {
            buffer: BytesMut::with_capacity(MAX_FRAME_SIZE),
            opts,
            stats: ReassemblyStats::default(),
            _frame: PhantomData,
        }
    }

    /// Append `chunk` and extract every frame that is now complete.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ReassemblyEvent<T>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut garbage: Option<Diagnostic> = None;

        loop {
            match self.scan() {
                Scan::NeedMore => break,
                Scan::Skip(count, error) => {
                    if matches!(error, Error::ChecksumMismatch { .. }) {
                        self.stats.record_checksum_error();
                    }
                    self.buffer.advance(count);
                    garbage
                        .get_or_insert(Diagnostic {
                            error,
                            discarded: 0,
                        })
                        .discarded += count;
                }
                Scan::Frame(len) => {
                    if let Some(diag) = garbage.take() {
                        self.report_drop(diag, &mut events);
                    }

                    // The checksum, if enforced, was verified by the scan.
                    let bytes = self.buffer.split_to(len).freeze();
                    match decode_bytes::<T>(bytes, DecodeOptions { rx_crc: false }) {
                        Ok(frame) => {
                            trace!(
                                frame_type = ?frame.frame_type(),
                                len = frame.payload().len(),
                                "frame reassembled"
                            );
                            self.stats.record_frame();
                            events.push(ReassemblyEvent::Frame(frame));
                        }
                        Err(error) => {
                            self.report_drop(
                                Diagnostic {
                                    error,
                                    discarded: len,
                                },
                                &mut events,
                            );
                        }
                    }
                }
            }
        }

        if let Some(diag) = garbage.take() {
            self.report_drop(diag, &mut events);
        }

        events
    }

    /// Discard all buffered bytes and scan state.
    ///
    /// Returns the number of bytes thrown away.
    pub fn reset(&mut self) -> usize {
        let discarded = self.buffer.len();
        self.buffer.clear();
        self.stats.record_reset(discarded);
        discarded
    }

    /// Number of buffered bytes awaiting completion.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether no partial frame is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Decode policy in effect.
    #[must_use]
    pub fn options(&self) -> DecodeOptions {
        self.opts
    }

    /// Snapshot of the reassembly counters.
    #[must_use]
    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    fn scan(&self) -> Scan {
        let buf = &self.buffer[..];
        match judge_header(buf) {
            Header::NeedMore => Scan::NeedMore,
            Header::Implausible(error) => Scan::Skip(1, error),
            Header::Plausible(size) if buf.len() >= size => {
                let checked = if self.opts.rx_crc {
                    verify_checksum(&buf[..size])
                } else {
                    Ok(())
                };
                match checked {
                    Ok(()) => Scan::Frame(size),
                    Err(error) => Scan::Skip(1, error),
                }
            }
            Header::Plausible(_) => match self.next_valid_frame() {
                Some(offset) => Scan::Skip(
                    offset,
                    Error::malformed("incomplete header superseded by a later valid frame"),
                ),
                None => Scan::NeedMore,
            },
        }
    }

    /// Offset of the first complete, checksum-valid frame after the front.
    ///
    /// Without checksum enforcement a later frame cannot be told apart from
    /// payload bytes, so the front header is always given the benefit of the
    /// doubt.
    fn next_valid_frame(&self) -> Option<usize> {
        if !self.opts.rx_crc {
            return None;
        }
        let buf = &self.buffer[..];
        (1..buf.len()).find(|&offset| {
            let rest = &buf[offset..];
            match judge_header(rest) {
                Header::Plausible(size) => {
                    rest.len() >= size && verify_checksum(&rest[..size]).is_ok()
                }
                Header::NeedMore | Header::Implausible(_) => false,
            }
        })
    }

    fn report_drop(&mut self, diag: Diagnostic, events: &mut Vec<ReassemblyEvent<T>>) {
        warn!(
            error = %diag.error,
            discarded = diag.discarded,
            "dropping bytes from receive stream"
        );
        self.stats.record_drop(&diag.error, diag.discarded);
        events.push(ReassemblyEvent::Dropped(diag));
    }
}

impl<T: FrameType> Default for StreamReassembler<T> {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}
