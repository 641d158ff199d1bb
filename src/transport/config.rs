//! Link configuration.

use uuid::Uuid;

use super::TransportError;
use super::packet::MIN_PACKET_SIZE;

/// GATT service exposed by LT-family breezers.
pub const LT_SERVICE: Uuid = Uuid::from_u128(0x98f0_0001_3788_83ea_453e_f522_4470_9ddb);
/// Characteristic the host writes frames to.
pub const LT_CHAR_TX: Uuid = Uuid::from_u128(0x98f0_0002_3788_83ea_453e_f522_4470_9ddb);
/// Characteristic the device notifies frames on.
pub const LT_CHAR_RX: Uuid = Uuid::from_u128(0x98f0_0003_3788_83ea_453e_f522_4470_9ddb);

/// Default maximum packet size (BLE 4.x ATT payload).
pub const DEFAULT_MAX_PACKET_SIZE: usize = 20;

/// Link configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Verify checksums of received frames.
    pub rx_crc: bool,
    /// Largest packet the transport accepts per write, prefix included.
    pub max_packet_size: usize,
    /// GATT service identifier.
    pub service: Uuid,
    /// Characteristic written by the host.
    pub tx_characteristic: Uuid,
    /// Characteristic notified by the device.
    pub rx_characteristic: Uuid,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            rx_crc: true,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            service: LT_SERVICE,
            tx_characteristic: LT_CHAR_TX,
            rx_characteristic: LT_CHAR_RX,
        }
    }
}

impl LinkConfig {
    /// Set checksum verification of received frames.
    #[must_use]
    pub fn with_rx_crc(mut self, rx_crc: bool) -> Self {
        self.rx_crc = rx_crc;
        self
    }

    /// Set the maximum packet size, e.g. after MTU negotiation.
    #[must_use]
    pub fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    /// Check the configuration can drive a link.
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.max_packet_size < MIN_PACKET_SIZE {
            return Err(TransportError::InvalidConfig {
                reason: "max_packet_size must leave room for the prefix and one frame byte",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert!(config.rx_crc);
        assert_eq!(config.max_packet_size, 20);
        assert_eq!(
            config.service.to_string(),
            "98f00001-3788-83ea-453e-f52244709ddb"
        );
        assert_eq!(
            config.tx_characteristic.to_string(),
            "98f00002-3788-83ea-453e-f52244709ddb"
        );
        assert_eq!(
            config.rx_characteristic.to_string(),
            "98f00003-3788-83ea-453e-f52244709ddb"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_packet_size_validation() {
        let config = LinkConfig::default().with_max_packet_size(1);
        assert!(matches!(
            config.validate(),
            Err(TransportError::InvalidConfig { .. })
        ));
        assert!(LinkConfig::default().with_max_packet_size(2).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_partial_config() {
        let config: LinkConfig =
            serde_json::from_str(r#"{ "rx_crc": false, "max_packet_size": 244 }"#).unwrap();
        assert!(!config.rx_crc);
        assert_eq!(config.max_packet_size, 244);
        assert_eq!(config.service, LT_SERVICE);
    }
}
