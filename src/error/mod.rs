//! Error types and handling module.
//!
//! Defines all crate-wide error types and conversions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The transaction step of a submission protocol that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStep {
    /// Fee-token approval transaction.
    Approve,
    /// Price update transaction.
    Update,
    /// Governance instruction transaction.
    Governance,
}

impl fmt::Display for TxStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            TxStep::Approve => "approve",
            TxStep::Update => "update",
            TxStep::Governance => "governance",
        };
        f.write_str(step)
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The operation has no equivalent on this chain family.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A configuration record or chain handle does not match the contract variant.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The chain family cannot derive a sending account from a private key alone.
    #[error("Account address required: use {0} instead")]
    AccountAddressRequired(String),

    /// The contract declares no fee tokens.
    #[error("No fee token configured on the contract")]
    NoFeeTokenConfigured,

    /// A fee token address does not resolve to a readable token contract.
    #[error("Failed to resolve token {token}: {reason}")]
    TokenResolutionFailed { token: String, reason: String },

    /// The contract answered a price query with an explicit error payload.
    #[error("Price feed query failed: {0}")]
    FeedQueryFailed(String),

    /// A transaction could not be submitted or was not confirmed.
    #[error("Transaction failed at {step} step: {reason}")]
    TransactionFailed { step: TxStep, reason: String },

    /// The resolved contract class does not declare the entry point.
    #[error("Contract {address} has no entry point `{entry_point}`")]
    MissingEntryPoint { address: String, entry_point: String },

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Node RPC errors.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric overflow during conversion.
    #[error("Numeric overflow: {0}")]
    NumericOverflow(String),
}

impl AppError {
    /// Build a `TransactionFailed` error for the given step.
    pub fn tx_failed(step: TxStep, reason: impl fmt::Display) -> Self {
        AppError::TransactionFailed { step, reason: reason.to_string() }
    }

    /// The failed step, if this is a transaction failure.
    pub fn failed_step(&self) -> Option<TxStep> {
        match self {
            AppError::TransactionFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::Rpc(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
