//! Tion LT frame protocol
//!
//! This module provides the wire format, frame types, checksum, codec and
//! stream reassembly for frames exchanged with the breezer.

mod codec;
mod crc;
mod error;
mod frame;
mod header;
mod reassembler;
mod stats;
mod types;

pub use codec::{DecodeOptions, FramePeek, decode, encode, peek_frame_len};
pub use crc::crc16_ccitt_false;
pub use error::{Error, Result};
pub use frame::Frame;
pub use header::FrameHeader;
pub use reassembler::{Diagnostic, ReassemblyEvent, StreamReassembler};
pub use stats::ReassemblyStats;
pub use types::{Bits, FrameType};

/// Frame magic byte, third byte of every frame.
pub const FRAME_MAGIC: u8 = 0x3A;

/// Value written into the header's random byte on encode.
pub const FRAME_RANDOM: u8 = 0xAD;

/// Header size in bytes (size, magic, random, type).
pub const HEADER_SIZE: usize = 6;

/// Checksum size in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// Minimum frame size (header + checksum)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Maximum frame size accepted or produced by the codec.
pub const MAX_FRAME_SIZE: usize = 1024;

/// Maximum payload size
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - MIN_FRAME_SIZE;
