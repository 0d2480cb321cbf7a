// bthome - BTHome v2 advertisement encoder
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.


//! Encryption envelope
//!
//! AES-128-CCM with a 4-byte MIC and no associated data, as BTHome v2
//! specifies. The sealed output replaces the plaintext measurement bytes in
//! the service data:
//!
//! ```text
//! ciphertext (N) | counter (4, LE) | MIC (4)
//! ```
//!
//! The 13-byte nonce is
//!
//! ```text
//! MAC (6, display order) | UUID (2, D2 FC) | device info (1) | counter (4, LE)
//! ```
//!
//! A counter value is consumed by every successful seal and never reused for
//! the lifetime of the envelope. Once `u32::MAX` has been used the envelope
//! refuses to seal rather than wrap.

use crate::error::{ConfigError, EncryptionError};
use crate::protocol::{MacAddress, COUNTER_LEN, MIC_LEN, SERVICE_UUID};
use aes::Aes128;
use ccm::aead::generic_array::GenericArray;
use ccm::aead::{AeadInPlace, KeyInit};
use ccm::consts::{U13, U4};
use ccm::Ccm;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type BthomeCcm = Ccm<Aes128, U4, U13>;

/// AES key length
pub const KEY_LEN: usize = 16;

/// CCM nonce length
pub const NONCE_LEN: usize = 13;

/// A 128-bit bind key, wiped from memory on drop
#[derive(Clone)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// From raw key bytes
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// From 32 hex characters, as Home Assistant displays bind keys
    pub fn from_hex(hex_key: &str) -> Result<Self, ConfigError> {
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(hex_key.trim(), &mut bytes).map_err(|_| ConfigError::InvalidKey)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

impl Drop for EncryptionKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for EncryptionKey {}

/// Seals measurement bytes and owns the anti-replay counter
pub struct EncryptionEnvelope {
    // Expanded key schedule; wiped on drop through aes's `zeroize` feature
    cipher: BthomeCcm,
    mac: MacAddress,
    next_counter: Option<u32>,
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    verbose: bool,
}

impl EncryptionEnvelope {
    /// Create an envelope starting at `initial_counter`
    pub fn new(key: &EncryptionKey, mac: MacAddress, initial_counter: u32) -> Self {
        Self {
            cipher: BthomeCcm::new(GenericArray::from_slice(&key.0)),
            mac,
            next_counter: Some(initial_counter),
            verbose: false,
        }
    }

    /// Log nonces and ciphertext at debug level (requires the `logging` feature)
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Counter the next seal will use, or None once exhausted
    pub fn counter(&self) -> Option<u32> {
        self.next_counter
    }

    /// Device address bound into the nonce
    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    /// Output size for a plaintext of `plaintext_len` bytes
    pub const fn sealed_len(plaintext_len: usize) -> usize {
        plaintext_len + COUNTER_LEN + MIC_LEN
    }

    /// Build the CCM nonce for a device info byte and counter
    pub fn nonce(&self, device_info: u8, counter: u32) -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        nonce[..6].copy_from_slice(&self.mac.to_be_bytes());
        nonce[6..8].copy_from_slice(&SERVICE_UUID.to_le_bytes());
        nonce[8] = device_info;
        nonce[9..].copy_from_slice(&counter.to_le_bytes());
        nonce
    }

    /// Encrypt `plaintext` into `out` and advance the counter
    ///
    /// `device_info` must be the byte that will precede the payload in the
    /// service data. Returns the number of bytes written. On error `out`
    /// holds no ciphertext and the counter is unchanged.
    pub fn seal(
        &mut self,
        device_info: u8,
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<usize, EncryptionError> {
        let counter = self.next_counter.ok_or(EncryptionError::CounterExhausted)?;
        let needed = Self::sealed_len(plaintext.len());
        if out.len() < needed {
            return Err(EncryptionError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }

        let nonce = self.nonce(device_info, counter);
        let (body, trailer) = out[..needed].split_at_mut(plaintext.len());
        body.copy_from_slice(plaintext);

        let tag = match self.cipher.encrypt_in_place_detached(
            GenericArray::from_slice(&nonce),
            &[],
            body,
        ) {
            Ok(tag) => tag,
            Err(_) => {
                body.zeroize();
                return Err(EncryptionError::Cipher);
            }
        };

        trailer[..COUNTER_LEN].copy_from_slice(&counter.to_le_bytes());
        trailer[COUNTER_LEN..].copy_from_slice(tag.as_slice());
        self.next_counter = counter.checked_add(1);

        #[cfg(feature = "logging")]
        if self.verbose {
            log::debug!(
                "sealed counter={} nonce={:02x?} output={:02x?}",
                counter,
                nonce,
                &out[..needed]
            );
        }

        Ok(needed)
    }
}

impl fmt::Debug for EncryptionEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionEnvelope")
            .field("mac", &self.mac)
            .field("next_counter", &self.next_counter)
            .finish_non_exhaustive()
    }
}
