//! BLE transport binding for the LT frame protocol

mod config;
mod error;
mod link;
mod packet;
mod writer;

pub use config::{DEFAULT_MAX_PACKET_SIZE, LT_CHAR_RX, LT_CHAR_TX, LT_SERVICE, LinkConfig};
pub use error::{TransportError, WriteError};
pub use link::{BleLink, LinkStats};
pub use packet::{Fragmenter, MIN_PACKET_SIZE, PREFIX_SIZE, PacketKind, split_packet};
pub use writer::PacketWriter;
