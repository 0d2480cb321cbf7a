// bthome - BTHome v2 advertisement encoder
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Advertisement assembly
//!
//! Lays out one legacy advertisement (at most 31 bytes):
//!
//! ```text
//! 02 01 06                               flags
//! len 16 D2 FC info <payload>            BTHome service data, len = 3 + 1 + N
//! len 09 <complete name>                 if it fits, else
//! len 08 <short name>                    if it fits, else nothing
//! ```
//!
//! The service data is always written in full. The name is opportunistic:
//! dropping or shortening it under space pressure is not an error.

use crate::config::DeviceIdentity;
use crate::error::EncodeError;
use crate::protocol::{
    AD_TYPE_COMPLETE_NAME, AD_TYPE_SERVICE_DATA, AD_TYPE_SHORT_NAME, FLAGS_FIELD,
    MAX_ADVERTISEMENT_LEN, MAX_MEASUREMENT_LEN, NAME_HEADER_LEN, SERVICE_DATA_HEADER_LEN,
    SERVICE_UUID,
};
use core::ops::Deref;

/// Which local name ended up in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameChoice {
    /// Complete name (AD type 0x09)
    Complete,
    /// Short name (AD type 0x08)
    Short,
    /// No room for either name
    Omitted,
}

/// Pick the name variant for a frame that already uses `used` bytes
///
/// A name fits when `used + 2 + len <= 31`. Empty names never fit.
pub fn choose_name(used: usize, complete_len: usize, short_len: usize) -> NameChoice {
    let fits = |len: usize| len > 0 && used + NAME_HEADER_LEN + len <= MAX_ADVERTISEMENT_LEN;
    if fits(complete_len) {
        NameChoice::Complete
    } else if fits(short_len) {
        NameChoice::Short
    } else {
        NameChoice::Omitted
    }
}

/// One assembled advertisement
#[derive(Clone, PartialEq, Eq)]
pub struct Advertisement {
    bytes: [u8; MAX_ADVERTISEMENT_LEN],
    len: usize,
    name: NameChoice,
}

impl Advertisement {
    /// Frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Total bytes written
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a frame carries at least flags and service data
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Name variant included
    pub fn name(&self) -> NameChoice {
        self.name
    }

    /// Copy the frame into `out`, returning the byte count
    pub fn copy_to(&self, out: &mut [u8; MAX_ADVERTISEMENT_LEN]) -> usize {
        out[..self.len].copy_from_slice(self.as_bytes());
        self.len
    }
}

impl Deref for Advertisement {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Advertisement {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for Advertisement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Advertisement")
            .field("bytes", &self.as_bytes())
            .field("name", &self.name)
            .finish()
    }
}

/// Sequential writer over the 31-byte frame
struct FrameWriter {
    bytes: [u8; MAX_ADVERTISEMENT_LEN],
    len: usize,
}

impl FrameWriter {
    fn new() -> Self {
        Self {
            bytes: [0; MAX_ADVERTISEMENT_LEN],
            len: 0,
        }
    }

    // Callers check the budget before writing.
    fn put(&mut self, data: &[u8]) {
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
    }

    fn put_u8(&mut self, byte: u8) {
        self.put(&[byte]);
    }
}

/// Builds advertisements for one device identity
#[derive(Debug, Clone)]
pub struct AdvertisementAssembler {
    identity: DeviceIdentity,
}

impl AdvertisementAssembler {
    /// Create an assembler for a device
    pub fn new(identity: DeviceIdentity) -> Self {
        Self { identity }
    }

    /// Device identity used for names and the trigger flag
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Largest service-data payload (plain or sealed) a frame can carry
    pub const fn max_payload_len() -> usize {
        MAX_MEASUREMENT_LEN
    }

    /// Assemble flags, service data and the best-fitting name
    ///
    /// `device_info` is the BTHome device information byte; `payload` is the
    /// measurement bytes, or the sealed envelope output when encrypted.
    pub fn assemble(
        &self,
        device_info: u8,
        payload: &[u8],
    ) -> Result<Advertisement, EncodeError> {
        if payload.len() > MAX_MEASUREMENT_LEN {
            return Err(EncodeError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_MEASUREMENT_LEN,
            });
        }

        let mut w = FrameWriter::new();
        w.put(&FLAGS_FIELD);

        // AD type + UUID + device info + payload
        w.put_u8((SERVICE_DATA_HEADER_LEN - 1 + payload.len()) as u8);
        w.put_u8(AD_TYPE_SERVICE_DATA);
        w.put(&SERVICE_UUID.to_le_bytes());
        w.put_u8(device_info);
        w.put(payload);

        let complete = self.identity.complete_name().as_bytes();
        let short = self.identity.short_name().as_bytes();
        let name = choose_name(w.len, complete.len(), short.len());
        let (ad_type, bytes) = match name {
            NameChoice::Complete => (AD_TYPE_COMPLETE_NAME, complete),
            NameChoice::Short => (AD_TYPE_SHORT_NAME, short),
            NameChoice::Omitted => (0, &[][..]),
        };
        if name != NameChoice::Omitted {
            w.put_u8((1 + bytes.len()) as u8);
            w.put_u8(ad_type);
            w.put(bytes);
        }

        #[cfg(feature = "logging")]
        if name != NameChoice::Complete && !complete.is_empty() {
            log::debug!("name {:?} under space pressure ({} bytes used)", name, w.len);
        }

        Ok(Advertisement {
            bytes: w.bytes,
            len: w.len,
            name,
        })
    }
}
