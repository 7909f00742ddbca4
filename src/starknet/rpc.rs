//! Starknet JSON-RPC provider over HTTP.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::{
    error::{AppError, Result},
    starknet::{
        abi::ContractClass,
        felt::{felt_to_hex, parse_felt, Felt},
        provider::{AccountConnector, Call, StarknetAccount, StarknetProvider, TransactionReceipt},
    },
    types::PrivateKey,
};

/// Default interval between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// `TXN_HASH_NOT_FOUND`: the node has not seen the transaction yet.
const TXN_HASH_NOT_FOUND: i64 = 29;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    fn into_error(self, method: &str) -> AppError {
        match self.data {
            Some(data) => {
                AppError::Rpc(format!("{method} failed ({}): {} {data}", self.code, self.message))
            }
            None => AppError::Rpc(format!("{method} failed ({}): {}", self.code, self.message)),
        }
    }
}

/// Read-side provider backed by a Starknet JSON-RPC endpoint.
///
/// Signing is delegated to an optional [`AccountConnector`].
#[derive(Debug, Clone)]
pub struct JsonRpcProvider {
    http: Client,
    url: Url,
    poll_interval: Duration,
    connector: Option<Arc<dyn AccountConnector>>,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcProvider {
    /// Create a provider for `rpc_url`. No request is made until first use.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        Ok(Self {
            http: Client::new(),
            url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            connector: None,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_account_connector(mut self, connector: Arc<dyn AccountConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Send one request and return either its result or the node's error object.
    async fn send(
        &self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<Value, RpcErrorObject>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        trace!(method, id, "Sending JSON-RPC request");

        let response: RpcResponse = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (response.result, response.error) {
            (_, Some(error)) => Ok(Err(error)),
            (Some(result), None) => Ok(Ok(result)),
            (None, None) => {
                Err(AppError::Rpc(format!("{method} returned neither result nor error")))
            }
        }
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.send(method, params).await?.map_err(|e| e.into_error(method))
    }
}

#[async_trait]
impl StarknetProvider for JsonRpcProvider {
    async fn get_class_at(&self, address: Felt) -> Result<ContractClass> {
        let class = self
            .request(
                "starknet_getClassAt",
                json!({ "block_id": "latest", "contract_address": felt_to_hex(address) }),
            )
            .await?;
        ContractClass::from_json(&class)
    }

    async fn call(&self, call: &Call) -> Result<Vec<Felt>> {
        let request = json!({
            "contract_address": felt_to_hex(call.to),
            "entry_point_selector": felt_to_hex(call.selector),
            "calldata": call.calldata.iter().map(|f| felt_to_hex(*f)).collect::<Vec<_>>(),
        });
        let result = self
            .request("starknet_call", json!({ "request": request, "block_id": "latest" }))
            .await?;

        let felts: Vec<String> = serde_json::from_value(result)?;
        felts.iter().map(|f| parse_felt(f)).collect()
    }

    async fn wait_for_transaction(&self, tx_hash: Felt) -> Result<TransactionReceipt> {
        let hash = felt_to_hex(tx_hash);
        loop {
            match self
                .send("starknet_getTransactionReceipt", json!({ "transaction_hash": hash }))
                .await?
            {
                Ok(receipt) if is_accepted(&receipt) => {
                    debug!(tx_hash = %hash, "Transaction accepted");
                    return TransactionReceipt::from_json(receipt);
                }
                Ok(_) => trace!(tx_hash = %hash, "Transaction not yet accepted"),
                Err(e) if e.code == TXN_HASH_NOT_FOUND => {
                    trace!(tx_hash = %hash, "Transaction not yet known")
                }
                Err(e) => return Err(e.into_error("starknet_getTransactionReceipt")),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn connect_account(
        &self,
        private_key: &PrivateKey,
        address: Felt,
    ) -> Result<Arc<dyn StarknetAccount>> {
        match &self.connector {
            Some(connector) => connector.connect(private_key, address),
            None => Err(AppError::UnsupportedOperation(
                "JSON-RPC provider has no account connector for signing".into(),
            )),
        }
    }
}

fn is_accepted(receipt: &Value) -> bool {
    matches!(
        receipt.get("finality_status").and_then(Value::as_str),
        Some("ACCEPTED_ON_L2") | Some("ACCEPTED_ON_L1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(JsonRpcProvider::new("::not a url::"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_is_accepted() {
        assert!(is_accepted(&json!({ "finality_status": "ACCEPTED_ON_L2" })));
        assert!(is_accepted(&json!({ "finality_status": "ACCEPTED_ON_L1" })));
        assert!(!is_accepted(&json!({ "finality_status": "PRE_CONFIRMED" })));
        assert!(!is_accepted(&json!({})));
    }

    #[test]
    fn test_connect_account_without_connector() {
        let provider = JsonRpcProvider::new("http://127.0.0.1:1").unwrap();
        let key = PrivateKey::from_hex("0x1").unwrap();
        let err = provider.connect_account(&key, Felt::from(1u64)).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperation(_)));
    }
}
