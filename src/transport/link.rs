//! BLE link: binds the frame codec and reassembler to a packet-limited
//! GATT transport and drives an [`EventPort`].

use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use crate::port::EventPort;
use crate::protocol::{
    DecodeOptions, Frame, FrameType, ReassemblyEvent, ReassemblyStats, StreamReassembler, encode,
};

use super::config::LinkConfig;
use super::error::TransportError;
use super::packet::{Fragmenter, split_packet};
use super::writer::PacketWriter;

/// Counters kept by a [`BleLink`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Packets passed to `submit_incoming` while open
    pub packets_received: u64,
    /// Packets accepted by the writer
    pub packets_sent: u64,
    /// Frames delivered to the port
    pub frames_received: u64,
    /// Frames fully written
    pub frames_sent: u64,
    /// Packets without a prefix byte
    pub empty_packets: u64,
    /// Continuation or end packets with no frame in progress
    pub orphan_packets: u64,
    /// Partial frames abandoned by a new frame start
    pub restarted_frames: u64,
    /// Rejected packet writes
    pub write_failures: u64,
    /// Counters of the underlying reassembler
    pub reassembly: ReassemblyStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Open,
    Closed,
}

/// Frame link over a BLE characteristic pair.
///
/// Created when a device session starts. The connection collaborator feeds
/// notifications into [`submit_incoming`](Self::submit_incoming) and supplies
/// the [`PacketWriter`] used by [`send_frame`](Self::send_frame).
#[derive(Debug)]
pub struct BleLink<T: FrameType, W: PacketWriter> {
    config: LinkConfig,
    writer: W,
    reassembler: StreamReassembler<T>,
    port: EventPort<T>,
    state: LinkState,
    in_frame: bool,
    stats: LinkStats,
}

impl<T: FrameType, W: PacketWriter> BleLink<T, W> {
    /// Create an open link.
    pub fn new(config: LinkConfig, writer: W) -> Result<Self, TransportError> {
        config.validate()?;
        let opts = DecodeOptions {
            rx_crc: config.rx_crc,
        };
        Ok(Self {
            config,
            writer,
            reassembler: StreamReassembler::new(opts),
            port: EventPort::new(),
            state: LinkState::Open,
            in_frame: false,
            stats: LinkStats::default(),
        })
    }

    /// Link configuration.
    #[must_use]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// GATT service identifier.
    #[must_use]
    pub fn service(&self) -> Uuid {
        self.config.service
    }

    /// Characteristic the host writes to.
    #[must_use]
    pub fn tx_characteristic(&self) -> Uuid {
        self.config.tx_characteristic
    }

    /// Characteristic the device notifies on.
    #[must_use]
    pub fn rx_characteristic(&self) -> Uuid {
        self.config.rx_characteristic
    }

    /// Event port fired by this link.
    #[must_use]
    pub fn port(&self) -> &EventPort<T> {
        &self.port
    }

    /// Event port, for binding callbacks.
    pub fn port_mut(&mut self) -> &mut EventPort<T> {
        &mut self.port
    }

    /// Underlying packet writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Underlying packet writer, mutably.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Whether the link accepts traffic.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    /// Snapshot of the link counters.
    #[must_use]
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            reassembly: self.reassembler.stats(),
            ..self.stats
        }
    }

    /// Mark the connection established, drop any stale receive state and
    /// fire the port's ready notification.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&mut self) {
        self.reset_receive();
        self.state = LinkState::Open;
        debug!("link opened");
        self.port.fire_ready();
    }

    /// Mark the connection lost. Later traffic is refused until [`open`](Self::open).
    #[instrument(level = "debug", skip(self))]
    pub fn close(&mut self) {
        self.reset_receive();
        self.state = LinkState::Closed;
        debug!("link closed");
    }

    /// Periodic refresh: fire the port's poll notification.
    pub fn poll(&mut self) {
        self.port.fire_poll();
    }

    /// Feed one received packet.
    ///
    /// Corrupted or orphaned data is dropped and logged; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] if the link is closed.
    #[instrument(level = "trace", skip(self, data), fields(len = data.len()))]
    pub fn submit_incoming(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }
        self.stats.packets_received += 1;

        let Some((kind, body)) = split_packet(data) else {
            warn!("ignoring empty packet");
            self.stats.empty_packets += 1;
            return Ok(());
        };
        trace!(?kind, len = body.len(), "packet received");

        if kind.starts_frame() {
            if self.in_frame || !self.reassembler.is_empty() {
                let discarded = self.reassembler.reset();
                warn!(discarded, "frame restarted before previous one completed");
                self.stats.restarted_frames += 1;
            }
        } else if !self.in_frame {
            warn!(?kind, len = body.len(), "dropping fragment without frame start");
            self.stats.orphan_packets += 1;
            return Ok(());
        }
        self.in_frame = !kind.ends_frame();

        for event in self.reassembler.feed(body) {
            // Drops are logged and counted by the reassembler.
            if let ReassemblyEvent::Frame(frame) = event {
                self.stats.frames_received += 1;
                debug!(
                    frame_type = ?frame.frame_type(),
                    len = frame.payload().len(),
                    "frame received"
                );
                self.port.fire_frame(frame.frame_type(), frame.payload());
            }
        }

        Ok(())
    }

    /// Encode a frame and write it as one or more packets, in order.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Closed`] if the link is closed
    /// - [`TransportError::Codec`] if the payload does not fit in a frame
    /// - [`TransportError::WriteFailed`] if the first packet was rejected
    /// - [`TransportError::PartialSendUnknownState`] if a later packet was rejected
    #[instrument(level = "debug", skip(self, payload), fields(len = payload.len()))]
    pub fn send_frame(&mut self, frame_type: T, payload: &[u8]) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }

        let wire = encode(frame_type, payload)?;
        let max_packet_size = self.config.max_packet_size;
        let total = Fragmenter::packet_count(wire.len(), max_packet_size);

        for (sent, packet) in Fragmenter::new(&wire, max_packet_size).enumerate() {
            if let Err(err) = self.writer.write_packet(&packet) {
                self.stats.write_failures += 1;
                warn!(error = %err, sent, total, "packet write failed");
                return Err(if sent == 0 {
                    TransportError::WriteFailed(err)
                } else {
                    TransportError::PartialSendUnknownState {
                        sent,
                        total,
                        source: err,
                    }
                });
            }
            self.stats.packets_sent += 1;
        }

        self.stats.frames_sent += 1;
        trace!(packets = total, "frame sent");
        Ok(())
    }

    /// Send a prepared frame. See [`send_frame`](Self::send_frame).
    pub fn send(&mut self, frame: &Frame<T>) -> Result<(), TransportError> {
        self.send_frame(frame.frame_type(), frame.payload())
    }

    fn reset_receive(&mut self) {
        let discarded = self.reassembler.reset();
        if discarded > 0 {
            debug!(discarded, "discarded partial frame on session change");
        }
        self.in_frame = false;
    }
}
