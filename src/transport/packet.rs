//! BLE packet prefix and fragmentation for the LT link.
//!
//! Every GATT write or notification carries one prefix byte followed by a
//! slice of frame bytes. The two top bits of the prefix say where the slice
//! sits in its frame:
//!
//! ```text
//! 0x00  single       whole frame in one packet
//! 0x40  first        first slice of a multi-packet frame
//! 0x80  continuation middle slice
//! 0xC0  end          last slice
//! ```

/// Size of the packet prefix in bytes.
pub const PREFIX_SIZE: usize = 1;

/// Smallest usable packet size: prefix plus one frame byte.
pub const MIN_PACKET_SIZE: usize = PREFIX_SIZE + 1;

const KIND_MASK: u8 = 0xC0;

/// Position of a packet within its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// Whole frame in one packet.
    Single,
    /// First slice of a multi-packet frame.
    First,
    /// Middle slice.
    Continuation,
    /// Last slice.
    End,
}

impl PacketKind {
    /// Decode from a prefix byte; only the two top bits are significant.
    #[must_use]
    pub const fn from_prefix(prefix: u8) -> Self {
        match prefix & KIND_MASK {
            0x00 => Self::Single,
            0x40 => Self::First,
            0x80 => Self::Continuation,
            _ => Self::End,
        }
    }

    /// Prefix byte for this kind.
    #[must_use]
    pub const fn prefix(self) -> u8 {
        match self {
            Self::Single => 0x00,
            Self::First => 0x40,
            Self::Continuation => 0x80,
            Self::End => 0xC0,
        }
    }

    /// Whether a packet of this kind starts a new frame.
    #[must_use]
    pub const fn starts_frame(self) -> bool {
        matches!(self, Self::Single | Self::First)
    }

    /// Whether a packet of this kind completes a frame.
    #[must_use]
    pub const fn ends_frame(self) -> bool {
        matches!(self, Self::Single | Self::End)
    }
}

/// Split a received packet into its kind and frame bytes.
///
/// Returns `None` for an empty packet.
#[must_use]
pub fn split_packet(packet: &[u8]) -> Option<(PacketKind, &[u8])> {
    let (&prefix, body) = packet.split_first()?;
    Some((PacketKind::from_prefix(prefix), body))
}

/// Iterator over the packets of one encoded frame.
///
/// Each packet is at most `max_packet_size` bytes, prefix included.
#[derive(Debug, Clone)]
pub struct Fragmenter<'a> {
    chunks: std::iter::Peekable<std::slice::Chunks<'a, u8>>,
    first: bool,
}

impl<'a> Fragmenter<'a> {
    /// Fragment `wire` into packets no larger than `max_packet_size`.
    ///
    /// `max_packet_size` must be at least [`MIN_PACKET_SIZE`]; the link
    /// configuration enforces this.
    #[must_use]
    pub fn new(wire: &'a [u8], max_packet_size: usize) -> Self {
        let body = max_packet_size.max(MIN_PACKET_SIZE) - PREFIX_SIZE;
        Self {
            chunks: wire.chunks(body).peekable(),
            first: true,
        }
    }

    /// Number of packets [`Fragmenter::new`] yields for `wire_len` bytes.
    #[must_use]
    pub fn packet_count(wire_len: usize, max_packet_size: usize) -> usize {
        let body = max_packet_size.max(MIN_PACKET_SIZE) - PREFIX_SIZE;
        wire_len.div_ceil(body)
    }
}

impl Iterator for Fragmenter<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let last = self.chunks.peek().is_none();
        let kind = match (self.first, last) {
            (true, true) => PacketKind::Single,
            (true, false) => PacketKind::First,
            (false, false) => PacketKind::Continuation,
            (false, true) => PacketKind::End,
        };
        self.first = false;

        let mut packet = Vec::with_capacity(PREFIX_SIZE + chunk.len());
        packet.push(kind.prefix());
        packet.extend_from_slice(chunk);
        Some(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_roundtrip() {
        for kind in [
            PacketKind::Single,
            PacketKind::First,
            PacketKind::Continuation,
            PacketKind::End,
        ] {
            assert_eq!(PacketKind::from_prefix(kind.prefix()), kind);
        }
    }

    #[test]
    fn test_low_prefix_bits_ignored() {
        assert_eq!(PacketKind::from_prefix(0x41), PacketKind::First);
        assert_eq!(PacketKind::from_prefix(0xFF), PacketKind::End);
        assert_eq!(PacketKind::from_prefix(0x3F), PacketKind::Single);
    }

    #[test]
    fn test_split_packet() {
        assert_eq!(split_packet(&[]), None);
        assert_eq!(
            split_packet(&[0x80, 1, 2]),
            Some((PacketKind::Continuation, &[1u8, 2][..]))
        );
    }

    #[test]
    fn test_small_frame_is_single_packet() {
        let wire = [1u8; 19];
        let packets: Vec<_> = Fragmenter::new(&wire, 20).collect();

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0][0], 0x00);
        assert_eq!(&packets[0][1..], &wire);
    }

    #[test]
    fn test_large_frame_kinds_and_sizes() {
        let wire: Vec<u8> = (0..50).collect();
        let packets: Vec<_> = Fragmenter::new(&wire, 20).collect();

        let prefixes: Vec<u8> = packets.iter().map(|p| p[0]).collect();
        assert_eq!(prefixes, vec![0x40, 0x80, 0xC0]);
        assert!(packets.iter().all(|p| p.len() <= 20));
        assert_eq!(Fragmenter::packet_count(wire.len(), 20), 3);

        let joined: Vec<u8> = packets.iter().flat_map(|p| p[1..].to_vec()).collect();
        assert_eq!(joined, wire);
    }

    #[test]
    fn test_packet_count_matches_iterator() {
        for len in [0, 1, 18, 19, 20, 37, 38, 39, 1024] {
            let wire = vec![0u8; len];
            for max in [2, 3, 20, 185] {
                assert_eq!(
                    Fragmenter::new(&wire, max).count(),
                    Fragmenter::packet_count(len, max),
                    "len {len} max {max}"
                );
            }
        }
        assert_eq!(Fragmenter::packet_count(0, 20), 0);
    }

    #[test]
    fn test_two_packet_frame() {
        let wire = [7u8; 20];
        let packets: Vec<_> = Fragmenter::new(&wire, 20).collect();

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0][0], 0x40);
        assert_eq!(packets[1][0], 0xC0);
        assert_eq!(packets[1].len(), 2);
    }
}
