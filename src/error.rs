//! Error types for BTHome encoding
//!
//! This module defines all error types used throughout the library.
//! With the `std` feature they derive `std::error::Error` through `thiserror`;
//! without it they only implement `core::fmt::Display`.

#[cfg(not(feature = "std"))]
use core::fmt;

/// Result type alias for BTHome operations
pub type Result<T> = core::result::Result<T, BthomeError>;

/// Main error type for BTHome operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum BthomeError {
    /// Measurement encoding or frame assembly error
    #[cfg_attr(feature = "std", error("Encoding error: {0}"))]
    Encode(EncodeError),

    /// Encryption envelope error
    #[cfg_attr(feature = "std", error("Encryption error: {0}"))]
    Encryption(EncryptionError),

    /// Invalid construction-time configuration
    #[cfg_attr(feature = "std", error("Configuration error: {0}"))]
    Config(ConfigError),
}

/// Errors while adding entries or assembling a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum EncodeError {
    /// The entry does not fit in the remaining measurement budget
    #[cfg_attr(
        feature = "std",
        error("Capacity exceeded: need {needed} bytes, have {available}")
    )]
    CapacityExceeded { needed: usize, available: usize },

    /// Value is not a finite number (NaN, Inf)
    #[cfg_attr(feature = "std", error("Invalid value: not a finite number"))]
    NonFiniteValue,

    /// Raw entry longer than its one-byte length prefix can describe
    #[cfg_attr(feature = "std", error("Raw entry too long: {len} bytes exceeds 255"))]
    RawTooLong { len: usize },

    /// Step count given for a one-byte state, or missing for a two-byte event
    #[cfg_attr(
        feature = "std",
        error("State 0x{id:02X} is {width} bytes wide: step count does not match")
    )]
    StateWidthMismatch { id: u8, width: usize },

    /// Service-data payload larger than the advertisement can carry
    #[cfg_attr(
        feature = "std",
        error("Payload too large: {size} bytes exceeds maximum {max}")
    )]
    PayloadTooLarge { size: usize, max: usize },
}

/// Errors from the encryption envelope
///
/// None of these leave a partially sealed frame behind, and the counter is
/// only advanced once a seal succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum EncryptionError {
    /// The AES-CCM primitive reported a failure
    #[cfg_attr(feature = "std", error("AES-CCM encryption failed"))]
    Cipher,

    /// Every counter value for this key has been used
    #[cfg_attr(feature = "std", error("Encryption counter exhausted"))]
    CounterExhausted,

    /// Output buffer cannot hold ciphertext, counter and MIC
    #[cfg_attr(
        feature = "std",
        error("Output too small: need {needed} bytes, have {available}")
    )]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors in device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError {
    /// Device name exceeds its maximum length
    #[cfg_attr(
        feature = "std",
        error("{field} too long: {len} bytes exceeds maximum {max}")
    )]
    NameTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// MAC address is not six hex octets
    #[cfg_attr(feature = "std", error("Invalid MAC address"))]
    InvalidMacAddress,

    /// Encryption key is not 16 bytes (32 hex characters)
    #[cfg_attr(feature = "std", error("Invalid encryption key: expected 32 hex characters"))]
    InvalidKey,
}

impl From<EncodeError> for BthomeError {
    fn from(err: EncodeError) -> Self {
        BthomeError::Encode(err)
    }
}

impl From<EncryptionError> for BthomeError {
    fn from(err: EncryptionError) -> Self {
        BthomeError::Encryption(err)
    }
}

impl From<ConfigError> for BthomeError {
    fn from(err: ConfigError) -> Self {
        BthomeError::Config(err)
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for BthomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BthomeError::Encode(e) => write!(f, "Encoding error: {}", e),
            BthomeError::Encryption(e) => write!(f, "Encryption error: {}", e),
            BthomeError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::CapacityExceeded { needed, available } => write!(
                f,
                "Capacity exceeded: need {} bytes, have {}",
                needed, available
            ),
            EncodeError::NonFiniteValue => write!(f, "Invalid value: not a finite number"),
            EncodeError::RawTooLong { len } => {
                write!(f, "Raw entry too long: {} bytes exceeds 255", len)
            }
            EncodeError::StateWidthMismatch { id, width } => write!(
                f,
                "State 0x{:02X} is {} bytes wide: step count does not match",
                id, width
            ),
            EncodeError::PayloadTooLarge { size, max } => write!(
                f,
                "Payload too large: {} bytes exceeds maximum {}",
                size, max
            ),
        }
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for EncryptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionError::Cipher => write!(f, "AES-CCM encryption failed"),
            EncryptionError::CounterExhausted => write!(f, "Encryption counter exhausted"),
            EncryptionError::BufferTooSmall { needed, available } => write!(
                f,
                "Output too small: need {} bytes, have {}",
                needed, available
            ),
        }
    }
}

#[cfg(not(feature = "std"))]
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NameTooLong { field, len, max } => write!(
                f,
                "{} too long: {} bytes exceeds maximum {}",
                field, len, max
            ),
            ConfigError::InvalidMacAddress => write!(f, "Invalid MAC address"),
            ConfigError::InvalidKey => {
                write!(f, "Invalid encryption key: expected 32 hex characters")
            }
        }
    }
}

impl EncodeError {
    /// Whether the caller may recover by dropping the entry or flushing early
    pub fn is_capacity(&self) -> bool {
        matches!(self, EncodeError::CapacityExceeded { .. })
    }
}
