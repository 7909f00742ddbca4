//! Pyth price-feed contract on an EVM chain.
//!
//! Fees are paid in the chain's native coin, so the fee-token operations of
//! [`PriceFeedContract`] are unsupported here and the base fee carries no
//! denomination.

use std::time::Duration;

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, B256},
    providers::PendingTransactionBuilder,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    config::ContractConfig,
    contract::{Chain, PriceFeedContract},
    error::{AppError, Result, TxStep},
    ethereum::{contracts::IPyth, EthereumClient, WalletManager},
    types::{DataSource, FeeQuote, PriceFeed, PriceRecord, PrivateKey, TxResult},
};

/// A Pyth price-feed contract deployed on an EVM chain.
#[derive(Debug, Clone)]
pub struct EvmPriceFeedContract {
    chain: Chain,
    client: EthereumClient,
    address: String,
    contract_address: Address,
}

impl EvmPriceFeedContract {
    pub const TYPE: &'static str = "EvmPriceFeedContract";

    pub fn new(chain: Chain, address: impl Into<String>) -> Result<Self> {
        let Chain::Evm(evm) = &chain else {
            return Err(AppError::TypeMismatch(format!("wrong chain type {chain}")));
        };
        let client = evm.client().clone();
        let address = address.into();
        let contract_address: Address = address
            .parse()
            .map_err(|_| AppError::InvalidAddress(format!("'{address}' is not an EVM address")))?;
        Ok(Self { chain, client, address, contract_address })
    }

    /// Build from a configuration record; the tag and chain variant must match.
    pub fn from_config(chain: &Chain, config: &ContractConfig) -> Result<Self> {
        if config.contract_type != Self::TYPE {
            return Err(AppError::TypeMismatch(format!(
                "expected type {}, got {}",
                Self::TYPE,
                config.contract_type
            )));
        }
        Self::new(chain.clone(), config.address.clone())
    }

    fn wallet_for(private_key: &PrivateKey, sender_address: &str) -> Result<WalletManager> {
        let wallet = WalletManager::from_private_key(private_key)?;
        let sender: Address = sender_address.parse().map_err(|_| {
            AppError::InvalidAddress(format!("'{sender_address}' is not an EVM address"))
        })?;
        wallet.ensure_controls(sender)?;
        Ok(wallet)
    }

    async fn submit_update(&self, wallet: &WalletManager, vaas: &[Vec<u8>]) -> Result<TxResult> {
        let pyth = IPyth::new(self.contract_address, self.client.signing_provider(wallet));
        let update_data: Vec<Bytes> = vaas.iter().map(|vaa| Bytes::copy_from_slice(vaa)).collect();

        let fee = pyth.getUpdateFee(update_data.clone()).call().await?;
        info!(
            sender = %wallet.address(),
            %fee,
            updates = update_data.len(),
            "Submitting price update"
        );

        let pending = pyth
            .updatePriceFeeds(update_data)
            .value(fee)
            .send()
            .await
            .map_err(|e| AppError::tx_failed(TxStep::Update, e))?;
        confirm(TxStep::Update, pending).await
    }

    async fn submit_governance(&self, wallet: &WalletManager, vaa: &[u8]) -> Result<TxResult> {
        let pyth = IPyth::new(self.contract_address, self.client.signing_provider(wallet));
        let pending = pyth
            .executeGovernanceInstruction(Bytes::copy_from_slice(vaa))
            .send()
            .await
            .map_err(|e| AppError::tx_failed(TxStep::Governance, e))?;
        confirm(TxStep::Governance, pending).await
    }
}

#[async_trait]
impl PriceFeedContract for EvmPriceFeedContract {
    fn chain(&self) -> &Chain {
        &self.chain
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn contract_type(&self) -> &'static str {
        Self::TYPE
    }

    async fn valid_time_period(&self) -> Result<Duration> {
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());
        let seconds = pyth.validTimePeriodSeconds().call().await?;
        let seconds = u64::try_from(seconds)
            .map_err(|_| AppError::NumericOverflow(format!("valid time period {seconds}s")))?;
        Ok(Duration::from_secs(seconds))
    }

    async fn data_sources(&self) -> Result<Vec<DataSource>> {
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());
        let sources = pyth.validDataSources().call().await?;
        Ok(sources
            .into_iter()
            .map(|s| DataSource::from_bytes(s.chainId, s.emitterAddress.0))
            .collect())
    }

    async fn fee_token_addresses(&self) -> Result<Vec<String>> {
        Err(AppError::UnsupportedOperation(
            "EVM price-feed contracts charge fees in the native coin".into(),
        ))
    }

    /// `singleUpdateFeeInWei`, in the native coin.
    async fn base_update_fee(&self) -> Result<FeeQuote> {
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());
        let fee = pyth.singleUpdateFeeInWei().call().await?;
        Ok(FeeQuote::new(fee, None))
    }

    async fn base_update_fee_in_token(&self, _token: &str) -> Result<FeeQuote> {
        Err(AppError::UnsupportedOperation(
            "EVM price-feed contracts charge fees in the native coin".into(),
        ))
    }

    async fn price_feed(&self, feed_id: &str) -> Result<Option<PriceFeed>> {
        let id: B256 = feed_id.parse()?;
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());

        if !pyth.priceFeedExists(id).call().await? {
            return Ok(None);
        }

        let feed = match pyth.queryPriceFeed(id).call().await {
            Ok(feed) => feed,
            Err(e) => match e.as_revert_data() {
                Some(data) => return Err(AppError::FeedQueryFailed(format!("revert data {data}"))),
                None => return Err(e.into()),
            },
        };
        let feed =
            PriceFeed { price: price_record(&feed.price), ema_price: price_record(&feed.emaPrice) };
        debug!(feed_id, raw = ?feed, "Raw price feed query result");
        Ok(Some(feed))
    }

    async fn last_executed_governance_sequence(&self) -> Result<u64> {
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());
        Ok(pyth.lastExecutedGovernanceSequence().call().await?)
    }

    async fn governance_data_source(&self) -> Result<DataSource> {
        let pyth = IPyth::new(self.contract_address, self.client.provider().clone());
        let source = pyth.governanceDataSource().call().await?;
        Ok(DataSource::from_bytes(source.chainId, source.emitterAddress.0))
    }

    async fn execute_update_price_feed(
        &self,
        private_key: &PrivateKey,
        vaas: &[Vec<u8>],
    ) -> Result<TxResult> {
        let wallet = WalletManager::from_private_key(private_key)?;
        self.submit_update(&wallet, vaas).await
    }

    async fn execute_update_price_feed_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult> {
        let wallet = Self::wallet_for(private_key, sender_address)?;
        self.submit_update(&wallet, &[vaa.to_vec()]).await
    }

    async fn execute_governance_instruction(
        &self,
        private_key: &PrivateKey,
        vaa: &[u8],
    ) -> Result<TxResult> {
        let wallet = WalletManager::from_private_key(private_key)?;
        self.submit_governance(&wallet, vaa).await
    }

    async fn execute_governance_instruction_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult> {
        let wallet = Self::wallet_for(private_key, sender_address)?;
        self.submit_governance(&wallet, vaa).await
    }
}

fn price_record(price: &IPyth::Price) -> PriceRecord {
    PriceRecord::from_parts(price.price, price.conf, price.expo, price.publishTime)
}

/// Wait for the receipt and require a successful status.
async fn confirm(step: TxStep, pending: PendingTransactionBuilder<Ethereum>) -> Result<TxResult> {
    let tx_hash = *pending.tx_hash();
    info!(%tx_hash, %step, "Transaction submitted");

    let receipt = pending.get_receipt().await.map_err(|e| AppError::tx_failed(step, e))?;
    if !ReceiptResponse::status(&receipt) {
        return Err(AppError::tx_failed(step, format!("transaction {tx_hash} reverted")));
    }

    info!(%tx_hash, %step, "Transaction confirmed");
    Ok(TxResult { id: tx_hash.to_string(), info: serde_json::to_value(&receipt)? })
}
