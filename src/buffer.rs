// bthome - BTHome v2 advertisement encoder
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Measurement buffer
//!
//! Accumulates BTHome objects (`id | value`) into a fixed byte array under a
//! strict budget. Every `add_*` either writes its whole entry or fails and
//! leaves the buffer untouched.
//!
//! # Space accounting
//!
//! ```text
//! remaining = capacity - len - reserved
//! reject if remaining < entry_size
//! ```
//!
//! `reserved` is [`ENCRYPTION_OVERHEAD`](crate::protocol::ENCRYPTION_OVERHEAD)
//! when the payload will be encrypted, zero otherwise.

use crate::catalog::{MeasurementDescriptor, StateDescriptor};
use crate::error::EncodeError;
use crate::protocol::MAX_MEASUREMENT_LEN;

/// Fixed-capacity store for the encoded measurement bytes of one advertisement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementBuffer {
    data: [u8; MAX_MEASUREMENT_LEN],
    len: usize,
    capacity: usize,
    reserved: usize,
}

impl MeasurementBuffer {
    /// Create a buffer holding at most `capacity` bytes
    /// (clamped to [`MAX_MEASUREMENT_LEN`])
    pub fn new(capacity: usize) -> Self {
        Self {
            data: [0; MAX_MEASUREMENT_LEN],
            len: 0,
            capacity: capacity.min(MAX_MEASUREMENT_LEN),
            reserved: 0,
        }
    }

    /// Keep `bytes` of the capacity free for post-encryption framing
    pub fn with_reserved(mut self, bytes: usize) -> Self {
        self.reserved = bytes;
        self
    }

    /// Clear all entries
    pub fn reset(&mut self) {
        self.data = [0; MAX_MEASUREMENT_LEN];
        self.len = 0;
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured capacity, including any reserved bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held back for encryption framing
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Bytes still available for entries
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.len + self.reserved)
    }

    /// Whether an entry of `entry_size` bytes fits
    pub fn has_space(&self, entry_size: usize) -> bool {
        self.remaining() >= entry_size
    }

    /// The encoded entries
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Add a physical value, scaled and truncated per the descriptor
    ///
    /// `value / scale` is computed in `f32` and truncated toward zero, then
    /// written as `byte_width` little-endian bytes.
    pub fn add_measurement(
        &mut self,
        descriptor: &MeasurementDescriptor,
        value: f32,
    ) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteValue);
        }
        self.push_scaled(descriptor, f64::from(value / descriptor.scale()))
    }

    /// Add an unsigned integer, scaled per the descriptor
    pub fn add_unsigned(
        &mut self,
        descriptor: &MeasurementDescriptor,
        value: u64,
    ) -> Result<(), EncodeError> {
        self.push_scaled(descriptor, value as f64 / f64::from(descriptor.scale()))
    }

    /// Add a signed integer, scaled per the descriptor
    pub fn add_signed(
        &mut self,
        descriptor: &MeasurementDescriptor,
        value: i64,
    ) -> Result<(), EncodeError> {
        self.push_scaled(descriptor, value as f64 / f64::from(descriptor.scale()))
    }

    /// Add a state or event code, followed by a step count for two-byte
    /// events
    ///
    /// `steps` must be `Some` exactly when the descriptor is two bytes wide
    /// (the dimmer); otherwise the entry is rejected.
    pub fn add_state(
        &mut self,
        descriptor: &StateDescriptor,
        state: u8,
        steps: Option<u8>,
    ) -> Result<(), EncodeError> {
        let width = descriptor.byte_width();
        if width != 1 + usize::from(steps.is_some()) {
            return Err(EncodeError::StateWidthMismatch {
                id: descriptor.id(),
                width,
            });
        }
        self.check_space(1 + width)?;

        self.push(descriptor.id());
        self.push(state);
        if let Some(steps) = steps {
            self.push(steps);
        }
        Ok(())
    }

    /// Add a variable-length object: `id | len | bytes`
    pub fn add_raw(&mut self, id: u8, bytes: &[u8]) -> Result<(), EncodeError> {
        let len = u8::try_from(bytes.len())
            .map_err(|_| EncodeError::RawTooLong { len: bytes.len() })?;
        self.check_space(2 + bytes.len())?;

        self.push(id);
        self.push(len);
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    fn push_scaled(
        &mut self,
        descriptor: &MeasurementDescriptor,
        scaled: f64,
    ) -> Result<(), EncodeError> {
        if !scaled.is_finite() {
            return Err(EncodeError::NonFiniteValue);
        }
        let width = descriptor.byte_width();
        self.check_space(1 + width)?;

        // Float-to-int casts truncate toward zero and saturate; the width
        // cut below then keeps the low-order bytes.
        let raw = if descriptor.is_signed() {
            scaled as i64 as u64
        } else {
            scaled as u64
        };

        self.push(descriptor.id());
        self.data[self.len..self.len + width].copy_from_slice(&raw.to_le_bytes()[..width]);
        self.len += width;
        Ok(())
    }

    fn check_space(&self, needed: usize) -> Result<(), EncodeError> {
        if self.has_space(needed) {
            Ok(())
        } else {
            Err(EncodeError::CapacityExceeded {
                needed,
                available: self.remaining(),
            })
        }
    }

    // Only called after `check_space`.
    fn push(&mut self, byte: u8) {
        self.data[self.len] = byte;
        self.len += 1;
    }
}

impl Default for MeasurementBuffer {
    fn default() -> Self {
        Self::new(MAX_MEASUREMENT_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::protocol::ENCRYPTION_OVERHEAD;

    #[test]
    fn test_temperature_entry() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::TEMPERATURE, 21.5).unwrap();
        assert_eq!(buf.as_bytes(), &[0x02, 0x66, 0x08]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_negative_temperature() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::TEMPERATURE, -5.25).unwrap();
        // -525 = 0xFDF3
        assert_eq!(buf.as_bytes(), &[0x02, 0xF3, 0xFD]);
    }

    #[test]
    fn test_three_byte_pressure() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::PRESSURE, 1013.25).unwrap();
        // 101325 = 0x018BCD
        assert_eq!(buf.as_bytes(), &[0x04, 0xCD, 0x8B, 0x01]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::COUNT_U8, 1.5).unwrap();
        buf.add_measurement(&catalog::TEMPERATURE_I8_035, 1.0).unwrap();
        assert_eq!(buf.as_bytes(), &[0x09, 0x01, 0x58, 0x02]);
    }

    #[test]
    fn test_negative_fraction_truncates_toward_zero() {
        let mut buf = MeasurementBuffer::default();
        // -1.999 and 1.999 steps both round toward zero
        buf.add_measurement(&catalog::COUNT_I8, -1.999).unwrap();
        buf.add_measurement(&catalog::COUNT_I8, 1.999).unwrap();
        buf.add_measurement(&catalog::TEMPERATURE, -0.005).unwrap();
        assert_eq!(
            buf.as_bytes(),
            &[0x59, 0xFF, 0x59, 0x01, 0x02, 0x00, 0x00]
        );
    }

    #[test]
    fn test_unsigned_clamps_negative() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::BATTERY, -3.0).unwrap();
        assert_eq!(buf.as_bytes(), &[0x01, 0x00]);
    }

    #[test]
    fn test_width_truncation_keeps_low_bytes() {
        let mut buf = MeasurementBuffer::default();
        buf.add_unsigned(&catalog::COUNT_U8, 0x1234).unwrap();
        assert_eq!(buf.as_bytes(), &[0x09, 0x34]);
    }

    #[test]
    fn test_integer_entry_points() {
        let mut buf = MeasurementBuffer::default();
        buf.add_unsigned(&catalog::COUNT_U32, 0x0102_0304).unwrap();
        buf.add_signed(&catalog::COUNT_I16, -2).unwrap();
        assert_eq!(
            buf.as_bytes(),
            &[0x3E, 0x04, 0x03, 0x02, 0x01, 0x5A, 0xFE, 0xFF]
        );
    }

    #[test]
    fn test_signed_with_scale() {
        let mut buf = MeasurementBuffer::default();
        // -3 °C at 0.01 resolution = -300 = 0xFED4
        buf.add_signed(&catalog::TEMPERATURE, -3).unwrap();
        assert_eq!(buf.as_bytes(), &[0x02, 0xD4, 0xFE]);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut buf = MeasurementBuffer::default();
        assert_eq!(
            buf.add_measurement(&catalog::TEMPERATURE, f32::NAN),
            Err(EncodeError::NonFiniteValue)
        );
        assert_eq!(
            buf.add_measurement(&catalog::TEMPERATURE, f32::INFINITY),
            Err(EncodeError::NonFiniteValue)
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_state_and_steps() {
        let mut buf = MeasurementBuffer::default();
        buf.add_state(&catalog::DOOR, 1, None).unwrap();
        buf.add_state(&catalog::DIMMER, catalog::DimmerEvent::RotateLeft as u8, Some(3))
            .unwrap();
        assert_eq!(buf.as_bytes(), &[0x1A, 0x01, 0x3B, 0x01, 0x03]);
    }

    #[test]
    fn test_steps_on_one_byte_event_rejected() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::TEMPERATURE, 21.5).unwrap();
        let before = buf.clone();
        assert_eq!(
            buf.add_state(&catalog::BUTTON, 1, Some(7)),
            Err(EncodeError::StateWidthMismatch { id: 0x3A, width: 1 })
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_missing_steps_on_dimmer_rejected() {
        let mut buf = MeasurementBuffer::default();
        let before = buf.clone();
        assert_eq!(
            buf.add_state(&catalog::DIMMER, 1, None),
            Err(EncodeError::StateWidthMismatch { id: 0x3B, width: 2 })
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_state_width_checked_before_space() {
        // A full buffer still reports the malformed entry, not capacity
        let mut buf = MeasurementBuffer::new(0);
        assert!(matches!(
            buf.add_state(&catalog::DOOR, 1, Some(1)),
            Err(EncodeError::StateWidthMismatch { .. })
        ));
    }

    #[test]
    fn test_raw_entry() {
        let mut buf = MeasurementBuffer::default();
        buf.add_raw(catalog::TEXT_ID, b"hi").unwrap();
        assert_eq!(buf.as_bytes(), &[0x53, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_raw_too_long() {
        let mut buf = MeasurementBuffer::default();
        let big = [0u8; 300];
        assert_eq!(
            buf.add_raw(catalog::RAW_ID, &big),
            Err(EncodeError::RawTooLong { len: 300 })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_exact_fill_then_reject() {
        let mut buf = MeasurementBuffer::new(9);
        for _ in 0..3 {
            buf.add_measurement(&catalog::TEMPERATURE, 20.0).unwrap();
        }
        assert_eq!(buf.remaining(), 0);

        let before = buf.clone();
        let err = buf.add_measurement(&catalog::TEMPERATURE, 20.0).unwrap_err();
        assert_eq!(
            err,
            EncodeError::CapacityExceeded {
                needed: 3,
                available: 0
            }
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_rejected_state_leaves_buffer() {
        let mut buf = MeasurementBuffer::new(4);
        buf.add_state(&catalog::MOTION, 1, None).unwrap();
        let before = buf.clone();
        assert!(buf.add_state(&catalog::DIMMER, 2, Some(5)).is_err());
        assert_eq!(buf, before);
        buf.add_state(&catalog::SMOKE, 0, None).unwrap();
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_reserved_overhead() {
        let mut buf =
            MeasurementBuffer::new(MAX_MEASUREMENT_LEN).with_reserved(ENCRYPTION_OVERHEAD);
        assert_eq!(buf.remaining(), MAX_MEASUREMENT_LEN - ENCRYPTION_OVERHEAD);

        // 11 bytes usable: three temperatures (9) fit, a fourth does not
        for _ in 0..3 {
            buf.add_measurement(&catalog::TEMPERATURE, 1.0).unwrap();
        }
        assert!(buf.add_measurement(&catalog::TEMPERATURE, 1.0).is_err());
        buf.add_state(&catalog::LOCK, 0, None).unwrap();
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_reserved_larger_than_capacity() {
        let buf = MeasurementBuffer::new(8).with_reserved(ENCRYPTION_OVERHEAD);
        assert_eq!(buf.remaining(), 0);
        assert!(!buf.has_space(1));
    }

    #[test]
    fn test_capacity_clamped() {
        let buf = MeasurementBuffer::new(100);
        assert_eq!(buf.capacity(), MAX_MEASUREMENT_LEN);
    }

    #[test]
    fn test_reset() {
        let mut buf = MeasurementBuffer::default();
        buf.add_measurement(&catalog::HUMIDITY, 50.55).unwrap();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.remaining(), MAX_MEASUREMENT_LEN);
        assert_eq!(buf, MeasurementBuffer::default());
    }
}
