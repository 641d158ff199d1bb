//! Outbound write primitive supplied by the BLE connection collaborator.

use super::WriteError;

/// Writes one packet to the device characteristic.
///
/// Implementations must accept packets up to the configured
/// `max_packet_size` and report failure instead of panicking.
pub trait PacketWriter {
    /// Write a single packet.
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), WriteError>;
}

/// Closures returning a success flag, the shape most BLE stacks expose.
impl<F> PacketWriter for F
where
    F: FnMut(&[u8]) -> bool,
{
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), WriteError> {
        if self(packet) {
            Ok(())
        } else {
            Err(WriteError::new("transport rejected packet"))
        }
    }
}

/// Captures every packet, for loopback wiring and tests.
impl PacketWriter for Vec<Vec<u8>> {
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), WriteError> {
        self.push(packet.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_writer_maps_flag() {
        let mut accept = |_: &[u8]| true;
        let mut reject = |_: &[u8]| false;

        assert!(accept.write_packet(&[1]).is_ok());
        assert_eq!(
            reject.write_packet(&[1]),
            Err(WriteError::new("transport rejected packet"))
        );
    }

    #[test]
    fn test_vec_writer_captures() {
        let mut captured: Vec<Vec<u8>> = Vec::new();
        captured.write_packet(&[1, 2]).unwrap();
        captured.write_packet(&[3]).unwrap();

        assert_eq!(captured, vec![vec![1, 2], vec![3]]);
    }
}
