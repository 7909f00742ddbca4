//! Pyth price-feed contract on Starknet.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::{
    config::ContractConfig,
    contract::{Chain, PriceFeedContract},
    error::{AppError, Result},
    starknet::{
        client::ContractClient,
        felt::{
            felt_to_hex, felt_to_padded_hex, parse_felt, parse_u256, split_u256, Felt, FeltReader,
        },
        governance::submit_governance_instruction,
        provider::{StarknetAccount, StarknetProvider},
        token::TokenClient,
        update::UpdateSubmission,
    },
    types::{DataSource, FeeQuote, PriceFeed, PriceRecord, PrivateKey, TxResult},
};

/// Variants of the contract's `GetPriceUnsafeError`, by index.
const GET_PRICE_UNSAFE_ERRORS: &[&str] = &["PriceFeedNotFound"];

/// A Pyth price-feed contract deployed on a Starknet chain.
///
/// The contract class is resolved from the chain on every operation.
#[derive(Debug, Clone)]
pub struct StarknetPriceFeedContract {
    chain: Chain,
    provider: Arc<dyn StarknetProvider>,
    address: String,
    contract_address: Felt,
}

impl StarknetPriceFeedContract {
    pub const TYPE: &'static str = "StarknetPriceFeedContract";

    /// Bind a contract at `address` (hex, optional `0x`) on `chain`.
    pub fn new(chain: Chain, address: impl Into<String>) -> Result<Self> {
        let Chain::Starknet(starknet) = &chain else {
            return Err(AppError::TypeMismatch(format!("wrong chain type {chain}")));
        };
        let provider = starknet.provider();
        let address = address.into();
        let contract_address = parse_felt(&address)?;
        Ok(Self { chain, provider, address, contract_address })
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

    async fn contract_client(&self) -> Result<ContractClient> {
        ContractClient::resolve(Arc::clone(&self.provider), self.contract_address).await
    }

    fn connect_account(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
    ) -> Result<Arc<dyn StarknetAccount>> {
        let sender = parse_felt(sender_address)?;
        self.provider.connect_account(private_key, sender)
    }

    async fn read_fee_tokens(contract: &ContractClient) -> Result<Vec<Felt>> {
        let output = contract.call("fee_token_addresses", Vec::new()).await?;
        let mut reader = FeltReader::new(&output);
        let len = reader.read_len()?;
        (0..len).map(|_| reader.read_felt()).collect()
    }
}

#[async_trait]
impl PriceFeedContract for StarknetPriceFeedContract {
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
        Err(AppError::UnsupportedOperation(
            "valid_time_period is not exposed by the Starknet price-feed contract".into(),
        ))
    }

    async fn data_sources(&self) -> Result<Vec<DataSource>> {
        let contract = self.contract_client().await?;
        let output = contract.call("valid_data_sources", Vec::new()).await?;
        let mut reader = FeltReader::new(&output);
        let len = reader.read_len()?;
        (0..len).map(|_| read_data_source(&mut reader)).collect()
    }

    /// Hex addresses, 64 digits without prefix, in declared order.
    async fn fee_token_addresses(&self) -> Result<Vec<String>> {
        let contract = self.contract_client().await?;
        let tokens = Self::read_fee_tokens(&contract).await?;
        Ok(tokens.into_iter().map(felt_to_padded_hex).collect())
    }

    async fn base_update_fee_in_token(&self, token: &str) -> Result<FeeQuote> {
        let token = parse_felt(token).map_err(|e| AppError::TokenResolutionFailed {
            token: token.to_string(),
            reason: e.to_string(),
        })?;
        let contract = self.contract_client().await?;
        let output = contract.call("get_single_update_fee", vec![token]).await?;
        let amount = FeltReader::new(&output).read_u256()?;

        let fee_token = TokenClient::resolve(Arc::clone(&self.provider), token).await?;
        let symbol = fee_token.symbol().await?;
        Ok(FeeQuote::new(amount, Some(symbol)))
    }

    async fn price_feed(&self, feed_id: &str) -> Result<Option<PriceFeed>> {
        let id = parse_u256(feed_id)?;
        let contract = self.contract_client().await?;
        let output = contract.call("query_price_feed_unsafe", split_u256(id).to_vec()).await?;
        debug!(
            feed_id,
            raw = ?output.iter().map(|f| felt_to_hex(*f)).collect::<Vec<_>>(),
            "Raw price feed query result"
        );

        let mut reader = FeltReader::new(&output);
        match reader.read_u64()? {
            0 => {
                let _id = reader.read_u256()?;
                let price = read_price(&mut reader)?;
                let ema_price = read_price(&mut reader)?;
                Ok(Some(PriceFeed { price, ema_price }))
            }
            1 => {
                let index = reader.read_u64()?;
                let variant = usize::try_from(index)
                    .ok()
                    .and_then(|i| GET_PRICE_UNSAFE_ERRORS.get(i))
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| format!("Unknown({index})"));
                let payload = json!({
                    "variant": variant,
                    "raw": reader.remaining().iter().map(|f| felt_to_hex(*f)).collect::<Vec<_>>(),
                });
                Err(AppError::FeedQueryFailed(payload.to_string()))
            }
            other => Err(AppError::Parse(format!("unexpected Result variant {other}"))),
        }
    }

    async fn last_executed_governance_sequence(&self) -> Result<u64> {
        let contract = self.contract_client().await?;
        let output = contract.call("last_executed_governance_sequence", Vec::new()).await?;
        FeltReader::new(&output).read_u64()
    }

    async fn governance_data_source(&self) -> Result<DataSource> {
        let contract = self.contract_client().await?;
        let output = contract.call("governance_data_source", Vec::new()).await?;
        read_data_source(&mut FeltReader::new(&output))
    }

    /// Starknet accounts are contracts; a key alone does not identify one.
    async fn execute_update_price_feed(
        &self,
        _private_key: &PrivateKey,
        _vaas: &[Vec<u8>],
    ) -> Result<TxResult> {
        Err(AppError::AccountAddressRequired("execute_update_price_feed_with_address".into()))
    }

    async fn execute_update_price_feed_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult> {
        let account = self.connect_account(private_key, sender_address)?;

        let mut contract = self.contract_client().await?;
        contract.connect(Arc::clone(&account));

        let fee_token = Self::read_fee_tokens(&contract)
            .await?
            .first()
            .copied()
            .ok_or(AppError::NoFeeTokenConfigured)?;
        let mut fee_token = TokenClient::resolve(Arc::clone(&self.provider), fee_token).await?;
        fee_token.connect(account);

        UpdateSubmission::new(contract, fee_token, Arc::clone(&self.provider)).run(vaa).await
    }

    async fn execute_governance_instruction(
        &self,
        _private_key: &PrivateKey,
        _vaa: &[u8],
    ) -> Result<TxResult> {
        Err(AppError::AccountAddressRequired(
            "execute_governance_instruction_with_address".into(),
        ))
    }

    async fn execute_governance_instruction_with_address(
        &self,
        private_key: &PrivateKey,
        sender_address: &str,
        vaa: &[u8],
    ) -> Result<TxResult> {
        let account = self.connect_account(private_key, sender_address)?;
        let mut contract = self.contract_client().await?;
        contract.connect(account);
        submit_governance_instruction(&contract, Arc::clone(&self.provider), vaa).await
    }
}

fn read_data_source(reader: &mut FeltReader<'_>) -> Result<DataSource> {
    let emitter_chain = reader.read_u16()?;
    let emitter_address = reader.read_u256()?;
    Ok(DataSource::from_u256(emitter_chain, emitter_address))
}

fn read_price(reader: &mut FeltReader<'_>) -> Result<PriceRecord> {
    let price = reader.read_i64()?;
    let conf = reader.read_u64()?;
    let expo = reader.read_i32()?;
    let publish_time = reader.read_u64()?;
    Ok(PriceRecord::from_parts(price, conf, expo, publish_time))
}
