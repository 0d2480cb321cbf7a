//! Device configuration
//!
//! Everything fixed at device setup: names, trigger flag, and the optional
//! encryption parameters.

use crate::envelope::EncryptionKey;
use crate::error::ConfigError;
use crate::protocol::{MacAddress, MAX_COMPLETE_NAME_LEN, MAX_SHORT_NAME_LEN};
use heapless::String;

/// Names and advertising mode of a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    short_name: String<MAX_SHORT_NAME_LEN>,
    complete_name: String<MAX_COMPLETE_NAME_LEN>,
    trigger_based: bool,
}

impl DeviceIdentity {
    /// Create an identity. The short name is sent when space is limited.
    pub fn new(short_name: &str, complete_name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            short_name: bounded("short name", short_name)?,
            complete_name: bounded("complete name", complete_name)?,
            trigger_based: false,
        })
    }

    /// Mark the device as advertising on events rather than periodically
    pub fn trigger_based(mut self, trigger_based: bool) -> Self {
        self.trigger_based = trigger_based;
        self
    }

    /// Short local name
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Complete local name
    pub fn complete_name(&self) -> &str {
        &self.complete_name
    }

    /// Whether the device is trigger based
    pub fn is_trigger_based(&self) -> bool {
        self.trigger_based
    }
}

impl Default for DeviceIdentity {
    /// Nameless, periodic device
    fn default() -> Self {
        Self {
            short_name: String::new(),
            complete_name: String::new(),
            trigger_based: false,
        }
    }
}

fn bounded<const N: usize>(field: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    let mut s = String::new();
    s.push_str(value).map_err(|_| ConfigError::NameTooLong {
        field,
        len: value.len(),
        max: N,
    })?;
    Ok(s)
}

/// Encryption parameters
#[derive(Debug, Clone)]
pub struct EncryptionConfig {
    /// Bind key shared with the receiver
    pub key: EncryptionKey,
    /// Advertising address, bound into the nonce
    pub mac: MacAddress,
    /// First counter value; must exceed any value already used with this key
    pub initial_counter: u32,
}

impl EncryptionConfig {
    /// Encryption starting at counter 0
    pub fn new(key: EncryptionKey, mac: MacAddress) -> Self {
        Self {
            key,
            mac,
            initial_counter: 0,
        }
    }

    /// Resume from a persisted counter
    pub fn initial_counter(mut self, counter: u32) -> Self {
        self.initial_counter = counter;
        self
    }
}

/// Full device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Names and trigger flag
    pub identity: DeviceIdentity,
    /// Encrypt the payload when set
    pub encryption: Option<EncryptionConfig>,
    /// Keep room for the short name in the measurement budget (default: true)
    pub reserve_short_name: bool,
    /// Log nonces and ciphertext at debug level (default: false)
    pub verbose: bool,
}

impl DeviceConfig {
    /// Plain (unencrypted) configuration
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            encryption: None,
            reserve_short_name: true,
            verbose: false,
        }
    }

    /// Enable encryption
    pub fn with_encryption(mut self, encryption: EncryptionConfig) -> Self {
        self.encryption = Some(encryption);
        self
    }

    /// Toggle the short-name reservation
    pub fn reserve_short_name(mut self, reserve: bool) -> Self {
        self.reserve_short_name = reserve;
        self
    }

    /// Toggle verbose diagnostics
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(DeviceIdentity::default())
    }
}
