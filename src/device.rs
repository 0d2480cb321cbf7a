// bthome - BTHome v2 advertisement encoder
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! BTHome device
//!
//! Ties the measurement buffer, the optional encryption envelope and the
//! assembler together behind the per-cycle protocol:
//!
//! ```text
//! reset -> add_* (0..n) -> assemble
//! ```
//!
//! A device is single-threaded state; callers sharing one across tasks must
//! provide their own locking.

use crate::advertisement::{Advertisement, AdvertisementAssembler};
use crate::buffer::MeasurementBuffer;
use crate::catalog::{MeasurementDescriptor, StateDescriptor};
use crate::config::{DeviceConfig, DeviceIdentity};
use crate::envelope::EncryptionEnvelope;
use crate::error::{EncodeError, Result};
use crate::protocol::{DeviceInfo, ENCRYPTION_OVERHEAD, MAX_MEASUREMENT_LEN, NAME_HEADER_LEN};

/// A BTHome v2 sensor producing one advertisement per cycle
#[derive(Debug)]
pub struct BtHomeDevice {
    buffer: MeasurementBuffer,
    assembler: AdvertisementAssembler,
    envelope: Option<EncryptionEnvelope>,
}

impl BtHomeDevice {
    /// Create a device from its configuration
    pub fn new(config: DeviceConfig) -> Self {
        let DeviceConfig {
            identity,
            encryption,
            reserve_short_name,
            verbose,
        } = config;

        let capacity = measurement_capacity(&identity, reserve_short_name);
        let envelope = encryption.map(|enc| {
            EncryptionEnvelope::new(&enc.key, enc.mac, enc.initial_counter).with_verbose(verbose)
        });
        let reserved = if envelope.is_some() {
            ENCRYPTION_OVERHEAD
        } else {
            0
        };

        Self {
            buffer: MeasurementBuffer::new(capacity).with_reserved(reserved),
            assembler: AdvertisementAssembler::new(identity),
            envelope,
        }
    }

    /// Device identity
    pub fn identity(&self) -> &DeviceIdentity {
        self.assembler.identity()
    }

    /// Whether payloads are encrypted
    pub fn is_encrypted(&self) -> bool {
        self.envelope.is_some()
    }

    /// Counter the next encrypted advertisement will carry
    pub fn counter(&self) -> Option<u32> {
        self.envelope.as_ref().and_then(|e| e.counter())
    }

    /// Current measurement entries
    pub fn buffer(&self) -> &MeasurementBuffer {
        &self.buffer
    }

    /// Device information byte for the current mode
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(self.is_encrypted(), self.identity().is_trigger_based())
    }

    /// Start a new advertisement cycle
    pub fn reset(&mut self) {
        self.buffer.reset();
    }

    /// Add a physical measurement
    pub fn add_measurement(
        &mut self,
        descriptor: &MeasurementDescriptor,
        value: f32,
    ) -> Result<()> {
        let result = self.buffer.add_measurement(descriptor, value);
        self.report(descriptor.id(), result)
    }

    /// Add an unsigned integer measurement
    pub fn add_unsigned(&mut self, descriptor: &MeasurementDescriptor, value: u64) -> Result<()> {
        let result = self.buffer.add_unsigned(descriptor, value);
        self.report(descriptor.id(), result)
    }

    /// Add a signed integer measurement
    pub fn add_signed(&mut self, descriptor: &MeasurementDescriptor, value: i64) -> Result<()> {
        let result = self.buffer.add_signed(descriptor, value);
        self.report(descriptor.id(), result)
    }

    /// Add a state, or a two-byte event with its step count
    pub fn add_state(
        &mut self,
        descriptor: &StateDescriptor,
        state: u8,
        steps: Option<u8>,
    ) -> Result<()> {
        let result = self.buffer.add_state(descriptor, state, steps);
        self.report(descriptor.id(), result)
    }

    /// Add a length-prefixed object such as text
    pub fn add_raw(&mut self, id: u8, bytes: &[u8]) -> Result<()> {
        let result = self.buffer.add_raw(id, bytes);
        self.report(id, result)
    }

    /// Build this cycle's advertisement
    ///
    /// When encryption is enabled the counter advances exactly once per
    /// returned advertisement. On error nothing is emitted and the device
    /// state is unchanged, so the caller can retry next cycle.
    pub fn assemble(&mut self) -> Result<Advertisement> {
        let info = self.device_info().to_byte();
        let plaintext = self.buffer.as_bytes();

        let Some(envelope) = self.envelope.as_mut() else {
            return Ok(self.assembler.assemble(info, plaintext)?);
        };

        let sealed_len = EncryptionEnvelope::sealed_len(plaintext.len());
        if sealed_len > AdvertisementAssembler::max_payload_len() {
            return Err(EncodeError::PayloadTooLarge {
                size: sealed_len,
                max: AdvertisementAssembler::max_payload_len(),
            }
            .into());
        }

        let mut sealed = [0u8; MAX_MEASUREMENT_LEN];
        let n = match envelope.seal(info, plaintext, &mut sealed) {
            Ok(n) => n,
            Err(e) => {
                #[cfg(feature = "logging")]
                log::warn!("encryption failed, skipping advertisement: {:?}", e);
                return Err(e.into());
            }
        };
        Ok(self.assembler.assemble(info, &sealed[..n])?)
    }

    fn report(&self, _id: u8, result: core::result::Result<(), EncodeError>) -> Result<()> {
        #[cfg(feature = "logging")]
        if let Err(e) = &result {
            log::warn!("object 0x{:02X} rejected: {:?}", _id, e);
        }
        Ok(result?)
    }
}

/// Measurement budget after flags, service-data header and (optionally) the
/// short name
fn measurement_capacity(identity: &DeviceIdentity, reserve_short_name: bool) -> usize {
    let name_len = identity.short_name().len();
    if reserve_short_name && name_len > 0 {
        MAX_MEASUREMENT_LEN.saturating_sub(NAME_HEADER_LEN + name_len)
    } else {
        MAX_MEASUREMENT_LEN
    }
}
