//! Starknet interaction module.
//!
//! Contains the felt codec, the provider facade and its JSON-RPC
//! implementation, the contract client resolver, and the Starknet
//! price-feed contract variant with its submission protocols.

pub mod abi;
pub mod chain;
pub mod client;
pub mod contract;
pub mod felt;
pub mod governance;
pub mod provider;
pub mod rpc;
pub mod token;
pub mod update;

pub use chain::StarknetChain;
pub use client::ContractClient;
pub use contract::StarknetPriceFeedContract;
pub use felt::{ByteBuffer, Felt};
pub use provider::{
    AccountConnector, Call, ExecutionStatus, StarknetAccount, StarknetProvider, TransactionReceipt,
};
pub use rpc::JsonRpcProvider;
pub use token::TokenClient;
pub use update::{UpdateState, UpdateSubmission};
