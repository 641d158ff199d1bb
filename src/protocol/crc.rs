//! CRC-16/CCITT-FALSE as computed by the breezer firmware.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Compute CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection, no xorout).
#[must_use]
pub fn crc16_ccitt_false(bytes: &[u8]) -> u16 {
    let mut crc = INIT;
    for &b in bytes {
        crc ^= u16::from(b) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16_ccitt_false(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(crc16_ccitt_false(&[]), 0xFFFF);
    }

    #[test]
    fn test_single_bit_flip_changes_crc() {
        let data = [0x10u8, 0x00, 0x3A, 0xAD, 0x31, 0x12];
        let base = crc16_ccitt_false(&data);
        for i in 0..data.len() * 8 {
            let mut flipped = data;
            flipped[i / 8] ^= 1 << (i % 8);
            assert_ne!(crc16_ccitt_false(&flipped), base, "bit {i}");
        }
    }
}
