//! # bthome - BTHome v2 advertisement encoder
//!
//! Packs sensor measurements into the compact BTHome v2 BLE advertisement
//! format, for battery-powered devices that broadcast without connecting.
//!
//! ## Key Features
//!
//! - **Fixed budget**: every frame fits the 31-byte legacy advertisement
//! - **All-or-nothing adds**: a rejected entry never leaves partial bytes
//! - **Best-effort names**: complete name, else short name, else none
//! - **AES-CCM encryption**: BTHome bind-key encryption with a replay counter
//! - **no_std**: fixed-size buffers, no allocation
//!
//! ## Quick Start
//!
//! ```rust
//! use bthome::{catalog, BtHomeDevice, DeviceConfig, DeviceIdentity};
//!
//! let identity = DeviceIdentity::new("T", "T").unwrap().trigger_based(true);
//! let mut device = BtHomeDevice::new(DeviceConfig::new(identity));
//!
//! device.reset();
//! device.add_measurement(&catalog::TEMPERATURE, 21.5).unwrap();
//! let adv = device.assemble().unwrap();
//!
//! assert_eq!(
//!     adv.as_bytes(),
//!     &[0x02, 0x01, 0x06, 0x07, 0x16, 0xD2, 0xFC, 0x44, 0x02, 0x66, 0x08, 0x02, 0x09, 0x54]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Object descriptors (ids, widths, scales)
//! - [`buffer`]: Measurement buffer with space accounting
//! - [`envelope`]: AES-CCM encryption envelope
//! - [`advertisement`]: Frame assembly and name fitting
//! - [`device`]: Per-cycle device facade
//! - [`protocol`]: Wire constants and address types

#![cfg_attr(not(any(feature = "std", test)), no_std)]

// Modules
pub mod advertisement;
pub mod buffer;
pub mod catalog;
pub mod config;
pub mod device;
pub mod envelope;
pub mod error;
pub mod protocol;

// Re-exports for convenient access
pub use advertisement::{choose_name, Advertisement, AdvertisementAssembler, NameChoice};
pub use buffer::MeasurementBuffer;
pub use catalog::{Descriptor, MeasurementDescriptor, StateDescriptor};
pub use config::{DeviceConfig, DeviceIdentity, EncryptionConfig};
pub use device::BtHomeDevice;
pub use envelope::{EncryptionEnvelope, EncryptionKey};
pub use error::{BthomeError, ConfigError, EncodeError, EncryptionError, Result};
pub use protocol::{DeviceInfo, MacAddress};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
