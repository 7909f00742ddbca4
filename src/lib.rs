//! Price Feed Contracts Library
//!
//! A chain-agnostic interface to Pyth price-feed contracts deployed on
//! Starknet and EVM chains.
//!
//! # Features
//!
//! - **Reads**: data sources, fees, governance state, and price feeds
//! - **Price Updates**: Starknet approve-then-update protocol, EVM native-fee updates
//! - **Governance**: submission of governance instructions
//! - **Configuration**: `{type, chain, address}` records and a variant registry
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use price_feed_contracts::{
//!     starknet::{JsonRpcProvider, StarknetChain},
//!     Chain, ContractConfig, ContractRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(JsonRpcProvider::new("https://starknet-sepolia.example")?);
//!     let chain = Chain::Starknet(StarknetChain::new("starknet_sepolia", provider));
//!     let config = ContractConfig {
//!         contract_type: "StarknetPriceFeedContract".into(),
//!         chain: "starknet_sepolia".into(),
//!         address: "0x07f2b07b6b5365e7ee055bda4c0ecabd867e6d3ee298d73aea32b027667186d6".into(),
//!     };
//!     let contract = ContractRegistry::default().from_config(&chain, &config)?;
//!     println!("{:?}", contract.data_sources().await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contract;
pub mod error;
pub mod ethereum;
pub mod starknet;
pub mod types;

pub use config::{Config, ContractConfig};
pub use contract::{Chain, ContractRegistry, PriceFeedContract};
pub use error::{AppError, Result, TxStep};
pub use types::*;
