//! Starknet provider and account facades.
//!
//! The price-feed contract only needs four capabilities from a node: class
//! lookup, view calls, confirmation waiting, and a way to obtain a signing
//! account. Transport and signing live behind these traits.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    starknet::{
        abi::ContractClass,
        felt::{felt_to_hex, parse_felt, Felt},
    },
    types::PrivateKey,
};

/// A contract function invocation: target, selector, and raw calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub to: Felt,
    pub selector: Felt,
    pub calldata: Vec<Felt>,
}

/// Execution outcome of an accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Succeeded,
    Reverted,
}

/// Confirmation payload returned once a transaction is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub transaction_hash: Felt,
    pub execution_status: ExecutionStatus,
    pub revert_reason: Option<String>,
    /// The receipt exactly as the node returned it.
    pub raw: serde_json::Value,
}

#[derive(Deserialize)]
struct ReceiptFields {
    transaction_hash: String,
    execution_status: ExecutionStatus,
    #[serde(default)]
    revert_reason: Option<String>,
}

impl TransactionReceipt {
    /// Parse a JSON-RPC receipt object.
    pub fn from_json(raw: serde_json::Value) -> Result<Self> {
        let fields: ReceiptFields = serde_json::from_value(raw.clone())?;
        Ok(Self {
            transaction_hash: parse_felt(&fields.transaction_hash)?,
            execution_status: fields.execution_status,
            revert_reason: fields.revert_reason,
            raw,
        })
    }

    pub fn is_success(&self) -> bool {
        self.execution_status == ExecutionStatus::Succeeded
    }

    /// Describe why the transaction did not succeed, if it did not.
    pub fn failure(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        Some(format!(
            "transaction {} reverted: {}",
            felt_to_hex(self.transaction_hash),
            self.revert_reason.as_deref().unwrap_or("no reason given")
        ))
    }
}

/// Node-side capabilities used by the contract clients.
#[async_trait]
pub trait StarknetProvider: Send + Sync + Debug {
    /// Fetch the contract class deployed at `address`.
    async fn get_class_at(&self, address: Felt) -> Result<ContractClass>;

    /// Execute a view call and return its raw output felts.
    async fn call(&self, call: &Call) -> Result<Vec<Felt>>;

    /// Wait until the transaction is accepted and return its receipt.
    ///
    /// Implementations do not impose a deadline.
    async fn wait_for_transaction(&self, tx_hash: Felt) -> Result<TransactionReceipt>;

    /// Build a signing account for `address` controlled by `private_key`.
    fn connect_account(
        &self,
        private_key: &PrivateKey,
        address: Felt,
    ) -> Result<Arc<dyn StarknetAccount>>;
}

/// A deployed account contract able to sign and submit invocations.
#[async_trait]
pub trait StarknetAccount: Send + Sync + Debug {
    fn address(&self) -> Felt;

    /// Sign and submit one multicall transaction, returning its hash.
    async fn execute(&self, calls: Vec<Call>) -> Result<Felt>;
}

/// Signing backend used by providers that do not sign on their own.
pub trait AccountConnector: Send + Sync + Debug {
    fn connect(&self, private_key: &PrivateKey, address: Felt) -> Result<Arc<dyn StarknetAccount>>;
}
