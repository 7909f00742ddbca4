//! Starknet field-element codec.
//!
//! Felts are represented as [`U256`] values strictly below [`FIELD_PRIME`].
//! This module converts between felts and the chain-native types used by the
//! price-feed contract ABI: `u256` as a `(low, high)` pair, signed integers
//! as field negation, short strings, `ByteArray`, and the `ByteBuffer` used to
//! carry update payloads.

use alloy::primitives::{keccak256, U256};

use crate::error::{AppError, Result};

/// A Starknet field element.
pub type Felt = U256;

/// The Starknet field prime, `2^251 + 17 * 2^192 + 1`.
pub const FIELD_PRIME: Felt = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// Entry-point selectors are `keccak256` truncated to 250 bits.
const SELECTOR_MASK: U256 =
    U256::from_limbs([u64::MAX, u64::MAX, u64::MAX, 0x03ff_ffff_ffff_ffff]);

/// Number of payload bytes stored in one `bytes31` word.
pub const BYTES31_LEN: usize = 31;

const U128_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// Parse a hex felt, with or without `0x` prefix.
pub fn parse_felt(value: &str) -> Result<Felt> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);

    if hex.is_empty() {
        return Err(AppError::InvalidAddress(format!("empty felt: '{value}'")));
    }

    let felt = U256::from_str_radix(&hex.to_ascii_lowercase(), 16)
        .map_err(|e| AppError::InvalidAddress(format!("'{value}' is not a hex felt: {e}")))?;

    if felt >= FIELD_PRIME {
        return Err(AppError::InvalidAddress(format!("'{value}' exceeds the field prime")));
    }

    Ok(felt)
}

/// Parse a hex `u256` (e.g. a 32-byte feed id), with or without `0x` prefix.
pub fn parse_u256(value: &str) -> Result<U256> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);

    if hex.is_empty() || hex.len() > 64 {
        return Err(AppError::Parse(format!("'{value}' is not a 32-byte hex value")));
    }

    U256::from_str_radix(&hex.to_ascii_lowercase(), 16)
        .map_err(|e| AppError::Parse(format!("'{value}' is not a hex value: {e}")))
}

/// Minimal `0x`-prefixed lowercase hex, as used on the JSON-RPC wire.
pub fn felt_to_hex(felt: Felt) -> String {
    let padded = alloy::hex::encode(felt.to_be_bytes::<32>());
    let digits = padded.trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

/// 64-digit zero-padded lowercase hex without prefix.
pub fn felt_to_padded_hex(felt: Felt) -> String {
    alloy::hex::encode(felt.to_be_bytes::<32>())
}

/// Entry-point selector for a function name (`starknet_keccak`).
pub fn selector(name: &str) -> Felt {
    U256::from_be_bytes(keccak256(name.as_bytes()).0) & SELECTOR_MASK
}

/// Split a `u256` into its `(low, high)` calldata felts.
pub fn split_u256(value: U256) -> [Felt; 2] {
    [value & U128_MASK, value >> 128]
}

/// Join `(low, high)` felts into a `u256`.
pub fn join_u256(low: Felt, high: Felt) -> Result<U256> {
    if low > U128_MASK || high > U128_MASK {
        return Err(AppError::Parse(format!(
            "u256 limbs out of range: low={}, high={}",
            felt_to_hex(low),
            felt_to_hex(high)
        )));
    }
    Ok(low | (high << 128))
}

/// Encode a signed integer as a felt (negatives wrap around the prime).
pub fn felt_from_i128(value: i128) -> Felt {
    let magnitude = U256::from(value.unsigned_abs());
    if value < 0 {
        FIELD_PRIME - magnitude
    } else {
        magnitude
    }
}

/// Decode a felt that carries a signed Cairo integer.
pub fn felt_to_i128(felt: Felt) -> Result<i128> {
    let half = FIELD_PRIME >> 1;
    let (negative, magnitude) =
        if felt > half { (true, FIELD_PRIME - felt) } else { (false, felt) };

    let magnitude = u128::try_from(magnitude).map_err(|_| {
        AppError::NumericOverflow(format!("felt {} exceeds i128", felt_to_hex(felt)))
    })?;
    let magnitude = i128::try_from(magnitude).map_err(|_| {
        AppError::NumericOverflow(format!("felt {} exceeds i128", felt_to_hex(felt)))
    })?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Encode an ASCII string of at most 31 bytes as a felt.
pub fn encode_short_string(value: &str) -> Result<Felt> {
    if !value.is_ascii() || value.len() > BYTES31_LEN {
        return Err(AppError::Parse(format!("'{value}' is not a Cairo short string")));
    }
    Ok(U256::from_be_slice(value.as_bytes()))
}

/// Decode a felt holding a Cairo short string.
pub fn decode_short_string(felt: Felt) -> Result<String> {
    let bytes = felt.to_be_bytes::<32>();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    String::from_utf8(bytes[start..].to_vec())
        .map_err(|e| AppError::Parse(format!("short string is not UTF-8: {e}")))
}

/// Decode a serialized Cairo `ByteArray` (`data`, `pending_word`, `pending_word_len`).
pub fn decode_byte_array(felts: &[Felt]) -> Result<String> {
    let mut reader = FeltReader::new(felts);
    let words = reader.read_len()?;
    let mut bytes = Vec::with_capacity(words * BYTES31_LEN);

    for _ in 0..words {
        let word = reader.read_felt()?.to_be_bytes::<32>();
        bytes.extend_from_slice(&word[32 - BYTES31_LEN..]);
    }

    let pending_word = reader.read_felt()?.to_be_bytes::<32>();
    let pending_len = reader.read_len()?;
    if pending_len >= BYTES31_LEN {
        return Err(AppError::Parse(format!("pending word length {pending_len} out of range")));
    }
    bytes.extend_from_slice(&pending_word[32 - pending_len..]);

    String::from_utf8(bytes).map_err(|e| AppError::Parse(format!("ByteArray is not UTF-8: {e}")))
}

/// The Cairo `ByteBuffer` encoding of an update payload.
///
/// The payload is split into 31-byte big-endian words; `num_last_bytes`
/// records how many bytes the final word holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    pub num_last_bytes: u8,
    pub data: Vec<Felt>,
}

impl ByteBuffer {
    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let data: Vec<Felt> = bytes.chunks(BYTES31_LEN).map(U256::from_be_slice).collect();
        let num_last_bytes = match bytes.len() % BYTES31_LEN {
            0 if bytes.is_empty() => 0,
            0 => BYTES31_LEN as u8,
            rem => rem as u8,
        };
        Self { num_last_bytes, data }
    }

    /// Serialize as calldata: `num_last_bytes`, `data.len()`, `data...`.
    pub fn to_calldata(&self) -> Vec<Felt> {
        let mut calldata = Vec::with_capacity(self.data.len() + 2);
        calldata.push(U256::from(self.num_last_bytes));
        calldata.push(U256::from(self.data.len()));
        calldata.extend_from_slice(&self.data);
        calldata
    }
}

/// Sequential decoder over a call's output felts.
#[derive(Debug)]
pub struct FeltReader<'a> {
    felts: &'a [Felt],
    pos: usize,
}

impl<'a> FeltReader<'a> {
    pub fn new(felts: &'a [Felt]) -> Self {
        Self { felts, pos: 0 }
    }

    /// Felts not yet consumed.
    pub fn remaining(&self) -> &'a [Felt] {
        &self.felts[self.pos..]
    }

    pub fn read_felt(&mut self) -> Result<Felt> {
        let felt = self.felts.get(self.pos).copied().ok_or_else(|| {
            AppError::Parse(format!("unexpected end of output at felt {}", self.pos))
        })?;
        self.pos += 1;
        Ok(felt)
    }

    pub fn read_u256(&mut self) -> Result<U256> {
        let low = self.read_felt()?;
        let high = self.read_felt()?;
        join_u256(low, high)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let felt = self.read_felt()?;
        u64::try_from(felt)
            .map_err(|_| AppError::NumericOverflow(format!("{} exceeds u64", felt_to_hex(felt))))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let felt = self.read_felt()?;
        u16::try_from(felt)
            .map_err(|_| AppError::NumericOverflow(format!("{} exceeds u16", felt_to_hex(felt))))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let value = felt_to_i128(self.read_felt()?)?;
        i64::try_from(value).map_err(|_| AppError::NumericOverflow(format!("{value} exceeds i64")))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let value = felt_to_i128(self.read_felt()?)?;
        i32::try_from(value).map_err(|_| AppError::NumericOverflow(format!("{value} exceeds i32")))
    }

    /// Array or length prefix.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_u64()?;
        usize::try_from(len)
            .map_err(|_| AppError::NumericOverflow(format!("length {len} exceeds usize")))
    }
}
