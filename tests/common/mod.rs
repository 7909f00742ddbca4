//! Common utilities for integration tests.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::json;

use price_feed_contracts::{
    ethereum::{EthereumClient, EvmChain},
    starknet::{
        abi::{AbiEntry, AbiFunction, ContractClass},
        felt::{felt_to_hex, parse_felt, selector},
        Call, Felt, JsonRpcProvider, StarknetAccount, StarknetChain, StarknetPriceFeedContract,
        StarknetProvider, TransactionReceipt,
    },
    AppError, Chain, PrivateKey, Result,
};

/// Price-feed contract address used by the scripted chain.
pub const PYTH: &str = "0x1234";
/// Sender account address.
pub const SENDER: &str = "0x5eed";
/// Test signing key.
pub const KEY: &str = "0xabcdef";

pub fn felt(hex: &str) -> Felt {
    parse_felt(hex).unwrap()
}

#[derive(Debug, Default)]
struct MockState {
    classes: HashMap<Felt, ContractClass>,
    responses: HashMap<(Felt, Felt), Vec<Felt>>,
    names: HashMap<Felt, String>,
    reverting: HashSet<Felt>,
    rejected: HashSet<Felt>,
    pending: HashMap<Felt, Felt>,
    next_tx: u64,
    events: Vec<String>,
    calls: Vec<Call>,
}

/// A scripted Starknet node.
///
/// Contracts are declared with the entry points they expose, view calls
/// return canned outputs, and every interaction is recorded as an event.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a contract exposing `entry_points` at `address`.
    pub fn deploy(&self, address: &str, entry_points: &[&str]) -> &Self {
        let mut state = self.state.lock().unwrap();
        let abi = entry_points
            .iter()
            .map(|name| {
                state.names.insert(selector(name), name.to_string());
                AbiEntry::Function(AbiFunction {
                    name: name.to_string(),
                    inputs: Vec::new(),
                    state_mutability: None,
                })
            })
            .collect();
        state.classes.insert(felt(address), ContractClass::new(abi));
        self
    }

    /// Script the output of a view call.
    pub fn respond(&self, address: &str, entry_point: &str, output: Vec<Felt>) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.responses.insert((felt(address), selector(entry_point)), output);
        self
    }

    /// Transactions invoking `entry_point` are accepted but revert.
    pub fn revert_on(&self, entry_point: &str) -> &Self {
        self.state.lock().unwrap().reverting.insert(selector(entry_point));
        self
    }

    /// Submissions invoking `entry_point` are rejected by the node.
    pub fn reject_on(&self, entry_point: &str) -> &Self {
        self.state.lock().unwrap().rejected.insert(selector(entry_point));
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn executed(&self, entry_point: &str) -> bool {
        self.events().contains(&format!("execute {entry_point}"))
    }

    /// Every view call or executed call made to `entry_point`, in order.
    pub fn calls_to(&self, entry_point: &str) -> Vec<Call> {
        let target = selector(entry_point);
        let state = self.state.lock().unwrap();
        state.calls.iter().filter(|c| c.selector == target).cloned().collect()
    }

    fn record(&self, event: String) {
        self.state.lock().unwrap().events.push(event);
    }

    fn name_of(&self, selector: Felt) -> String {
        let state = self.state.lock().unwrap();
        state.names.get(&selector).cloned().unwrap_or_else(|| felt_to_hex(selector))
    }
}

#[async_trait]
impl StarknetProvider for MockProvider {
    async fn get_class_at(&self, address: Felt) -> Result<ContractClass> {
        self.record(format!("class {}", felt_to_hex(address)));
        let state = self.state.lock().unwrap();
        state
            .classes
            .get(&address)
            .cloned()
            .ok_or_else(|| AppError::Rpc(format!("contract {} not found", felt_to_hex(address))))
    }

    async fn call(&self, call: &Call) -> Result<Vec<Felt>> {
        self.record(format!("call {}", self.name_of(call.selector)));
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        state.responses.get(&(call.to, call.selector)).cloned().ok_or_else(|| {
            AppError::Rpc(format!("no scripted output for {}", felt_to_hex(call.selector)))
        })
    }

    async fn wait_for_transaction(&self, tx_hash: Felt) -> Result<TransactionReceipt> {
        self.record(format!("wait {}", felt_to_hex(tx_hash)));
        let reverted = {
            let state = self.state.lock().unwrap();
            let selector = state
                .pending
                .get(&tx_hash)
                .ok_or_else(|| AppError::Rpc("unknown transaction".into()))?;
            state.reverting.contains(selector)
        };

        let raw = if reverted {
            json!({
                "transaction_hash": felt_to_hex(tx_hash),
                "execution_status": "REVERTED",
                "finality_status": "ACCEPTED_ON_L2",
                "revert_reason": "scripted revert",
            })
        } else {
            json!({
                "transaction_hash": felt_to_hex(tx_hash),
                "execution_status": "SUCCEEDED",
                "finality_status": "ACCEPTED_ON_L2",
            })
        };
        TransactionReceipt::from_json(raw)
    }

    fn connect_account(
        &self,
        _private_key: &PrivateKey,
        address: Felt,
    ) -> Result<Arc<dyn StarknetAccount>> {
        self.record(format!("connect {}", felt_to_hex(address)));
        Ok(Arc::new(MockAccount { address, provider: self.clone() }))
    }
}

/// Account that submits into the scripted node.
#[derive(Debug)]
pub struct MockAccount {
    address: Felt,
    provider: MockProvider,
}

#[async_trait]
impl StarknetAccount for MockAccount {
    fn address(&self) -> Felt {
        self.address
    }

    async fn execute(&self, calls: Vec<Call>) -> Result<Felt> {
        let mut last = None;
        for call in &calls {
            self.provider.record(format!("execute {}", self.provider.name_of(call.selector)));
            last = Some(call.selector);
        }
        self.provider.state.lock().unwrap().calls.extend(calls.iter().cloned());
        let selector = last.ok_or_else(|| AppError::Rpc("empty multicall".into()))?;

        let mut state = self.provider.state.lock().unwrap();
        if state.rejected.contains(&selector) {
            return Err(AppError::Rpc("submission rejected".into()));
        }
        state.next_tx += 1;
        let tx_hash = Felt::from(0x1000 + state.next_tx);
        state.pending.insert(tx_hash, selector);
        Ok(tx_hash)
    }
}

/// A Starknet chain backed by `provider`.
pub fn starknet_chain(provider: &MockProvider) -> Chain {
    Chain::Starknet(StarknetChain::new("starknet_sepolia", Arc::new(provider.clone())))
}

/// The price-feed contract at [`PYTH`] on a chain backed by `provider`.
pub fn pyth_contract(provider: &MockProvider) -> StarknetPriceFeedContract {
    StarknetPriceFeedContract::new(starknet_chain(provider), PYTH).unwrap()
}

pub fn key() -> PrivateKey {
    PrivateKey::from_hex(KEY).unwrap()
}

/// Deploy a price-feed contract charging 100 units of the STRK token at 0xabc.
pub fn deploy_pyth_with_fee_token(provider: &MockProvider) {
    let symbol = price_feed_contracts::starknet::felt::encode_short_string("STRK").unwrap();
    provider
        .deploy(
            PYTH,
            &[
                "fee_token_addresses",
                "get_single_update_fee",
                "get_update_fee",
                "update_price_feeds",
                "execute_governance_instruction",
            ],
        )
        .respond(PYTH, "fee_token_addresses", vec![Felt::from(1u64), felt("0xabc")])
        .respond(PYTH, "get_single_update_fee", vec![Felt::from(100u64), Felt::ZERO])
        .respond(PYTH, "get_update_fee", vec![Felt::from(100u64), Felt::ZERO])
        .deploy("0xabc", &["symbol", "approve"])
        .respond("0xabc", "symbol", vec![symbol]);
}

/// Build a live contract from environment variables, if configured.
pub fn live_contract() -> Option<Arc<dyn price_feed_contracts::PriceFeedContract>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = price_feed_contracts::Config::from_env().ok()?;
    let chain = match config.chain_type {
        price_feed_contracts::config::ChainType::Starknet => {
            let provider = JsonRpcProvider::new(&config.rpc_url).ok()?;
            Chain::Starknet(StarknetChain::new(config.chain_id.clone(), Arc::new(provider)))
        }
        price_feed_contracts::config::ChainType::Evm => {
            let client = EthereumClient::new(&config.rpc_url).ok()?;
            Chain::Evm(EvmChain::new(config.chain_id.clone(), client))
        }
    };

    price_feed_contracts::ContractRegistry::default()
        .from_config(&chain, &config.contract_config())
        .ok()
}

/// Skip test if no live contract is configured (missing env vars).
#[macro_export]
macro_rules! skip_if_no_contract {
    () => {
        match common::live_contract() {
            Some(contract) => contract,
            None => {
                eprintln!(
                    "Skipping test: PRICE_FEED_RPC_URL, PRICE_FEED_CHAIN_ID or \
                     PRICE_FEED_CONTRACT_ADDRESS not set"
                );
                return;
            }
        }
    };
}
