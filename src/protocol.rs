//! Protocol definitions for BTHome v2
//!
//! This module defines the wire-level constants of a BTHome advertisement:
//! - AD structure types and the fixed flags field
//! - The service UUID and the device information byte
//! - The byte budget every other module accounts against
//! - `MacAddress`, used to build the encryption nonce

use crate::error::ConfigError;
use core::fmt;
use core::str::FromStr;

/// Maximum legacy BLE advertisement payload
pub const MAX_ADVERTISEMENT_LEN: usize = 31;

/// BTHome 16-bit service UUID (0xFCD2, `D2 FC` on the wire)
pub const SERVICE_UUID: u16 = 0xFCD2;

/// BTHome protocol version carried in the device information byte
pub const BTHOME_VERSION: u8 = 2;

/// AD type: flags
pub const AD_TYPE_FLAGS: u8 = 0x01;
/// AD type: shortened local name
pub const AD_TYPE_SHORT_NAME: u8 = 0x08;
/// AD type: complete local name
pub const AD_TYPE_COMPLETE_NAME: u8 = 0x09;
/// AD type: service data, 16-bit UUID
pub const AD_TYPE_SERVICE_DATA: u8 = 0x16;

/// LE General Discoverable | BR/EDR Not Supported
pub const FLAGS_FIELD: [u8; 3] = [0x02, AD_TYPE_FLAGS, 0x06];

/// Length byte, AD type, UUID (2), device information
pub const SERVICE_DATA_HEADER_LEN: usize = 5;

/// Length byte and AD type in front of a name
pub const NAME_HEADER_LEN: usize = 2;

/// Largest measurement payload once flags and service-data header are written
pub const MAX_MEASUREMENT_LEN: usize =
    MAX_ADVERTISEMENT_LEN - FLAGS_FIELD.len() - SERVICE_DATA_HEADER_LEN;

/// Encryption counter length
pub const COUNTER_LEN: usize = 4;

/// AES-CCM message integrity code length
pub const MIC_LEN: usize = 4;

/// Bytes reserved in the measurement budget while encryption is enabled:
/// counter and MIC plus four bytes of framing headroom
pub const ENCRYPTION_OVERHEAD: usize = 12;

/// Longest short name
pub const MAX_SHORT_NAME_LEN: usize = 12;

/// Longest complete name that can ever fit behind the flags
pub const MAX_COMPLETE_NAME_LEN: usize = MAX_ADVERTISEMENT_LEN - NAME_HEADER_LEN;

/// The device information byte that follows the UUID
///
/// ```text
/// bit 0     encryption
/// bit 1     reserved
/// bit 2     trigger based
/// bits 3-4  reserved
/// bits 5-7  BTHome version
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    /// Payload is AES-CCM encrypted
    pub encrypted: bool,
    /// Device advertises on events rather than on a fixed interval
    pub trigger_based: bool,
}

impl DeviceInfo {
    const ENCRYPTED_BIT: u8 = 0x01;
    const TRIGGER_BIT: u8 = 0x04;
    const VERSION_SHIFT: u8 = 5;

    /// Build from flags
    pub fn new(encrypted: bool, trigger_based: bool) -> Self {
        Self {
            encrypted,
            trigger_based,
        }
    }

    /// Serialize to the wire byte
    pub fn to_byte(self) -> u8 {
        let mut byte = BTHOME_VERSION << Self::VERSION_SHIFT;
        if self.encrypted {
            byte |= Self::ENCRYPTED_BIT;
        }
        if self.trigger_based {
            byte |= Self::TRIGGER_BIT;
        }
        byte
    }

    /// Parse a wire byte. Returns None for a version other than 2.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte >> Self::VERSION_SHIFT != BTHOME_VERSION {
            return None;
        }
        Some(Self {
            encrypted: byte & Self::ENCRYPTED_BIT != 0,
            trigger_based: byte & Self::TRIGGER_BIT != 0,
        })
    }
}

impl From<DeviceInfo> for u8 {
    fn from(info: DeviceInfo) -> Self {
        info.to_byte()
    }
}

/// A 48-bit Bluetooth device address
///
/// Stored in link-layer order (least significant octet first), as radio
/// stacks report it. `Display` and `FromStr` use the conventional
/// most-significant-first `AA:BB:CC:DD:EE:FF` form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// From link-layer (little-endian) octets
    pub const fn from_le_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// From display-order (big-endian) octets
    pub const fn from_be_bytes(bytes: [u8; 6]) -> Self {
        Self([bytes[5], bytes[4], bytes[3], bytes[2], bytes[1], bytes[0]])
    }

    /// Link-layer octets
    pub const fn to_le_bytes(self) -> [u8; 6] {
        self.0
    }

    /// Display-order octets, as used in the encryption nonce
    pub const fn to_be_bytes(self) -> [u8; 6] {
        let b = self.0;
        [b[5], b[4], b[3], b[2], b[1], b[0]]
    }
}

impl FromStr for MacAddress {
    type Err = ConfigError;

    /// Accepts `AA:BB:CC:DD:EE:FF`, `AA-BB-...` or bare hex
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut digits = [0u8; 12];
        let mut n = 0;
        for c in s.bytes().filter(|c| *c != b':' && *c != b'-') {
            if n == digits.len() {
                return Err(ConfigError::InvalidMacAddress);
            }
            digits[n] = c;
            n += 1;
        }
        if n != digits.len() {
            return Err(ConfigError::InvalidMacAddress);
        }
        let mut be = [0u8; 6];
        hex::decode_to_slice(digits, &mut be).map_err(|_| ConfigError::InvalidMacAddress)?;
        Ok(Self::from_be_bytes(be))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.to_be_bytes();
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget() {
        assert_eq!(MAX_MEASUREMENT_LEN, 23);
        assert_eq!(MAX_COMPLETE_NAME_LEN, 29);
    }

    #[test]
    fn test_device_info_bytes() {
        assert_eq!(DeviceInfo::new(false, false).to_byte(), 0x40);
        assert_eq!(DeviceInfo::new(false, true).to_byte(), 0x44);
        assert_eq!(DeviceInfo::new(true, false).to_byte(), 0x41);
        assert_eq!(DeviceInfo::new(true, true).to_byte(), 0x45);
    }

    #[test]
    fn test_device_info_parse() {
        let info = DeviceInfo::from_byte(0x45).unwrap();
        assert!(info.encrypted);
        assert!(info.trigger_based);
        // BTHome v1 style byte
        assert_eq!(DeviceInfo::from_byte(0x01), None);
    }

    #[test]
    fn test_mac_parse() {
        let mac: MacAddress = "54:48:E6:8F:80:A5".parse().unwrap();
        assert_eq!(mac.to_be_bytes(), [0x54, 0x48, 0xE6, 0x8F, 0x80, 0xA5]);
        assert_eq!(mac.to_le_bytes(), [0xA5, 0x80, 0x8F, 0xE6, 0x48, 0x54]);
        assert_eq!(mac.to_string(), "54:48:E6:8F:80:A5");

        let bare: MacAddress = "5448e68f80a5".parse().unwrap();
        assert_eq!(bare, mac);
    }

    #[test]
    fn test_mac_parse_invalid() {
        assert_eq!(
            "54:48:E6:8F:80".parse::<MacAddress>(),
            Err(ConfigError::InvalidMacAddress)
        );
        assert_eq!(
            "54:48:E6:8F:80:A5:00".parse::<MacAddress>(),
            Err(ConfigError::InvalidMacAddress)
        );
        assert_eq!(
            "54:48:E6:8F:80:ZZ".parse::<MacAddress>(),
            Err(ConfigError::InvalidMacAddress)
        );
    }
}
