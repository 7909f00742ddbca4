//! The chain-agnostic price-feed contract interface.

pub mod chain;
pub mod registry;

pub use chain::Chain;
pub use registry::{ContractConstructor, ContractRegistry};

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;

use crate::{
    config::ContractConfig,
    error::{AppError, Result},
    types::{DataSource, FeeQuote, PriceFeed, PrivateKey, TxResult},
};

/// A price-feed contract deployed at one address on one chain.
///
/// Every variant implements the whole interface. Operations a chain family
/// has no equivalent for fail with [`AppError::UnsupportedOperation`]; they
/// never fall back to a default value.
#[async_trait]
pub trait PriceFeedContract: Send + Sync + Debug {
    /// The chain this contract is deployed on.
    fn chain(&self) -> &Chain;

    /// Contract address as configured.
    fn address(&self) -> &str;

    /// Variant tag used for (de)serialization.
    fn contract_type(&self) -> &'static str;

    /// `{chain id}_{address}`.
    fn id(&self) -> String {
        format!("{}_{}", self.chain().id(), self.address())
    }

    /// The configuration record this contract was built from.
    fn to_json(&self) -> ContractConfig {
        ContractConfig {
            contract_type: self.contract_type().to_string(),
            chain: self.chain().id().to_string(),
            address: self.address().to_string(),
        }
    }

    /// Maximum age for a price to be considered valid.
    async fn valid_time_period(&self) -> Result<Duration>;

    /// Trusted origins of price-update messages.
    async fn data_sources(&self) -> Result<Vec<DataSource>>;

    /// Accepted fee tokens in the contract's declared order.
    async fn fee_token_addresses(&self) -> Result<Vec<String>>;

    /// Fee for a single update in the default (first) fee token.
    async fn base_update_fee(&self) -> Result<FeeQuote> {
        let tokens = self.fee_token_addresses().await?;
        let token = tokens.first().ok_or(AppError::NoFeeTokenConfigured)?;
        self.base_update_fee_in_token(token).await
    }

    /// Fee for a single update in `token`, with the token's symbol.
    async fn base_update_fee_in_token(&self, token: &str) -> Result<FeeQuote>;

    /// Current and EMA price of a feed, `None` if the feed does not exist.
    async fn price_feed(&self, feed_id: &str) -> Result<Option<PriceFeed>>;

    /// Sequence number of the last applied governance instruction.
    async fn last_executed_governance_sequence(&self) -> Result<u64>;

    /// The single trusted origin of governance instructions.
    async fn governance_data_source(&self) -> Result<DataSource>;

    /// Submit price updates signed by `private_key`.
    async fn execute_update_price_feed(
        &self,
        private_key: &PrivateKey,
        vaas: &[Vec<u8>],
    ) -> Result<TxResult>;

    /// Submit one price update from an explicit sender account.
    async fn execute_update_price_feed_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult>;

    /// Execute a governance instruction signed by `private_key`.
    async fn execute_governance_instruction(
        &self,
        private_key: &PrivateKey,
        vaa: &[u8],
    ) -> Result<TxResult>;

    /// Execute a governance instruction from an explicit sender account.
    async fn execute_governance_instruction_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult>;
}
