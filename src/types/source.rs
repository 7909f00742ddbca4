//! Trusted message origins.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Width of an emitter address in bytes.
pub const EMITTER_ADDRESS_BYTES: usize = 32;

/// A trusted `(emitter chain, emitter address)` pair.
///
/// `emitter_address` is always 64 lowercase hex digits without prefix,
/// zero-padded on the left.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub emitter_chain: u16,
    pub emitter_address: String,
}

impl DataSource {
    /// Build a data source from a big-endian 32-byte emitter address.
    pub fn from_bytes(emitter_chain: u16, emitter_address: [u8; EMITTER_ADDRESS_BYTES]) -> Self {
        Self { emitter_chain, emitter_address: alloy::hex::encode(emitter_address) }
    }

    /// Build a data source from a numeric emitter address.
    pub fn from_u256(emitter_chain: u16, emitter_address: U256) -> Self {
        Self::from_bytes(emitter_chain, emitter_address.to_be_bytes::<EMITTER_ADDRESS_BYTES>())
    }
}
