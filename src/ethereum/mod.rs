//! EVM interaction module.
//!
//! Contains the Ethereum client, wallet management, the Pyth contract
//! binding, and the EVM price-feed contract variant.

pub mod chain;
pub mod client;
pub mod contract;
pub mod contracts;
pub mod wallet;

pub use chain::EvmChain;
pub use client::{EthereumClient, HttpProvider};
pub use contract::EvmPriceFeedContract;
pub use wallet::WalletManager;
