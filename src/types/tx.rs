//! Fee, key, and transaction result types.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Cost of a single update in one fee token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Decimal integer amount in the token's smallest unit.
    pub amount: String,
    /// Token symbol, when the chain exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denom: Option<String>,
}

impl FeeQuote {
    /// Create a new fee quote.
    pub fn new(amount: impl ToString, denom: Option<String>) -> Self {
        Self { amount: amount.to_string(), denom }
    }
}

/// Result of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxResult {
    /// Transaction identifier (hash, hex with `0x` prefix).
    pub id: String,
    /// Chain-specific confirmation payload.
    pub info: serde_json::Value,
}

/// A private key held only for the duration of a signing operation.
///
/// Stored as lowercase hex without prefix. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Parse a hex private key, with or without `0x` prefix.
    pub fn from_hex(key: &str) -> Result<Self> {
        let trimmed = key.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Wallet("private key must be a non-empty hex string".into()));
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// The key as hex without prefix.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}
