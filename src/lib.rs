//! vport - frame protocol plumbing for Tion breezers over BLE
//!
//! This library turns BLE notifications delivered in arbitrary chunks into
//! validated application frames, turns outgoing frames into packets that fit
//! the link, and hands decoded frames to entity logic through an
//! [`EventPort`].
//!
//! # Quick Start
//!
//! ```rust
//! use vport::{BleLink, LinkConfig};
//!
//! // Loop the link back onto itself through a capturing writer
//! let mut link = BleLink::<u16, Vec<Vec<u8>>>::new(LinkConfig::default(), Vec::new())?;
//! link.port_mut().on_frame(|frame_type, payload| {
//!     println!("frame {frame_type:#06x}: {payload:02x?}");
//! });
//!
//! link.send_frame(0x3231, b"state request")?;
//! let packets = link.writer().clone();
//! for packet in &packets {
//!     link.submit_incoming(packet)?;
//! }
//! # Ok::<(), vport::TransportError>(())
//! ```
//!
//! # Layers
//!
//! - [`protocol`] - frame codec, CRC-16 checksum and stream reassembly
//! - [`transport`] - packet prefix, fragmentation and the [`BleLink`] adapter
//! - [`port`] - single-subscriber event port

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod port;
pub mod protocol;
pub mod transport;

pub use port::EventPort;
pub use protocol::{
    Error, Frame, FrameType, MAX_PAYLOAD_SIZE, ReassemblyEvent, Result, StreamReassembler,
};
pub use transport::{BleLink, LinkConfig, PacketWriter, TransportError};
