//! Configuration management module.
//!
//! Holds the persisted contract record and the environment configuration used
//! by the inspection binary.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Persisted form of a price-feed contract: `{ "type", "chain", "address" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Variant tag, e.g. `StarknetPriceFeedContract`.
    #[serde(rename = "type")]
    pub contract_type: String,
    /// Chain identifier.
    pub chain: String,
    /// Contract address.
    pub address: String,
}

/// Chain family selected by `PRICE_FEED_CHAIN_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainType {
    Starknet,
    Evm,
}

impl std::str::FromStr for ChainType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starknet" => Ok(ChainType::Starknet),
            "evm" => Ok(ChainType::Evm),
            other => Err(AppError::Config(format!(
                "unknown chain type '{other}' (expected 'starknet' or 'evm')"
            ))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Chain identifier used in contract ids.
    pub chain_id: String,
    /// Chain family (default: starknet).
    pub chain_type: ChainType,
    /// Price-feed contract address.
    pub contract_address: String,
    /// Feed to query, if any.
    pub price_feed_id: Option<String>,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `PRICE_FEED_RPC_URL`: JSON-RPC endpoint
    /// - `PRICE_FEED_CHAIN_ID`: chain identifier
    /// - `PRICE_FEED_CONTRACT_ADDRESS`: contract address (hex)
    ///
    /// Optional environment variables:
    /// - `PRICE_FEED_CHAIN_TYPE`: `starknet` or `evm` (default: starknet)
    /// - `PRICE_FEED_ID`: feed id to query
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = required("PRICE_FEED_RPC_URL")?;
        let chain_id = required("PRICE_FEED_CHAIN_ID")?;
        let contract_address = required("PRICE_FEED_CONTRACT_ADDRESS")?;

        let chain_type = match env::var("PRICE_FEED_CHAIN_TYPE") {
            Ok(value) => value.parse()?,
            Err(_) => ChainType::Starknet,
        };

        let price_feed_id = env::var("PRICE_FEED_ID").ok().filter(|id| !id.trim().is_empty());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self { rpc_url, chain_id, chain_type, contract_address, price_feed_id, log_level })
    }

    /// Variant tag of the configured contract.
    pub fn contract_type(&self) -> &'static str {
        match self.chain_type {
            ChainType::Starknet => crate::starknet::StarknetPriceFeedContract::TYPE,
            ChainType::Evm => crate::ethereum::EvmPriceFeedContract::TYPE,
        }
    }

    /// The contract record described by this configuration.
    pub fn contract_config(&self) -> ContractConfig {
        ContractConfig {
            contract_type: self.contract_type().to_string(),
            chain: self.chain_id.clone(),
            address: self.contract_address.clone(),
        }
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Config(format!("{name} environment variable not set")))
}
