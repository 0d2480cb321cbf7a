// bthome - BTHome v2 advertisement encoder
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Test-only decoding helpers
//!
//! The crate only encodes; these helpers walk a frame back into
//! `(id, value)` pairs through the catalog so tests can check what was
//! written.

#![allow(dead_code)]

use bthome::catalog::{self, Descriptor};
use bthome::protocol::{AD_TYPE_SERVICE_DATA, SERVICE_UUID};

/// One decoded object
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Measurement id and its scaled integer
    Value(u8, i64),
    /// State id, state and optional steps
    State(u8, u8, Option<u8>),
    /// Variable-length id and bytes
    Bytes(u8, Vec<u8>),
}

/// Split a frame into `(ad_type, data)` structures
pub fn ad_structures(frame: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < frame.len() {
        let len = frame[i] as usize;
        assert!(len > 0, "zero-length AD structure at {}", i);
        assert!(i + 1 + len <= frame.len(), "AD structure overruns frame at {}", i);
        out.push((frame[i + 1], frame[i + 2..i + 1 + len].to_vec()));
        i += 1 + len;
    }
    out
}

/// Device info byte and payload of the BTHome service data
pub fn service_data(frame: &[u8]) -> (u8, Vec<u8>) {
    let (_, data) = ad_structures(frame)
        .into_iter()
        .find(|(ty, data)| *ty == AD_TYPE_SERVICE_DATA && data[..2] == SERVICE_UUID.to_le_bytes())
        .expect("no BTHome service data");
    (data[2], data[3..].to_vec())
}

/// Decode plaintext measurement bytes in order
pub fn decode_objects(payload: &[u8]) -> Vec<Decoded> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < payload.len() {
        let id = payload[i];
        i += 1;
        match catalog::lookup(id).unwrap_or_else(|| panic!("unknown id 0x{:02X}", id)) {
            Descriptor::Measurement(d) => {
                let width = d.byte_width();
                let mut raw = [0u8; 8];
                raw[..width].copy_from_slice(&payload[i..i + width]);
                let mut value = u64::from_le_bytes(raw) as i64;
                if d.is_signed() {
                    let shift = 64 - 8 * width as u32;
                    value = (value << shift) >> shift;
                }
                out.push(Decoded::Value(id, value));
                i += width;
            }
            Descriptor::State(d) => {
                let steps = (d.byte_width() == 2).then(|| payload[i + 1]);
                out.push(Decoded::State(id, payload[i], steps));
                i += d.byte_width();
            }
            Descriptor::Variable { .. } => {
                let len = payload[i] as usize;
                out.push(Decoded::Bytes(id, payload[i + 1..i + 1 + len].to_vec()));
                i += 1 + len;
            }
        }
    }
    out
}
