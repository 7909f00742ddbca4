//! Price Feed Inspector
//!
//! Builds one price-feed contract from environment configuration and prints
//! its on-chain state as JSON.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use price_feed_contracts::{
    config::ChainType,
    ethereum::{EthereumClient, EvmChain},
    starknet::{JsonRpcProvider, StarknetChain},
    Chain, Config, ContractRegistry, PriceFeedContract,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let chain = match config.chain_type {
        ChainType::Starknet => {
            let provider = Arc::new(JsonRpcProvider::new(&config.rpc_url)?);
            Chain::Starknet(StarknetChain::new(config.chain_id.clone(), provider))
        }
        ChainType::Evm => {
            let client = EthereumClient::new(&config.rpc_url)?;
            Chain::Evm(EvmChain::new(config.chain_id.clone(), client))
        }
    };

    let contract = ContractRegistry::default().from_config(&chain, &config.contract_config())?;
    tracing::info!(contract = %contract.id(), "Inspecting price feed contract");

    let report = inspect(contract.as_ref(), config.price_feed_id.as_deref()).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn inspect(contract: &dyn PriceFeedContract, feed_id: Option<&str>) -> Value {
    let mut report = json!({
        "id": contract.id(),
        "config": contract.to_json(),
        "validTimePeriodSeconds": field(contract.valid_time_period().await.map(|d| d.as_secs())),
        "dataSources": field(contract.data_sources().await),
        "governanceDataSource": field(contract.governance_data_source().await),
        "lastExecutedGovernanceSequence": field(contract.last_executed_governance_sequence().await),
        "feeTokenAddresses": field(contract.fee_token_addresses().await),
        "baseUpdateFee": field(contract.base_update_fee().await),
    });

    if let Some(feed_id) = feed_id {
        report["priceFeed"] = field(contract.price_feed(feed_id).await);
    }

    report
}

/// Render a query outcome, keeping failures visible next to successes.
fn field<T: Serialize>(result: price_feed_contracts::Result<T>) -> Value {
    match result {
        Ok(value) => serde_json::to_value(value).unwrap_or(Value::Null),
        Err(e) => {
            tracing::warn!(error = %e, "Query failed");
            json!({ "error": e.to_string() })
        }
    }
}
