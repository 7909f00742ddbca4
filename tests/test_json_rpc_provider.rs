//! Integration tests for the Starknet JSON-RPC provider against a mock HTTP node.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockito::{Matcher, Server};
use price_feed_contracts::{
    starknet::{
        felt::{parse_felt, selector},
        AccountConnector, Call, Felt, JsonRpcProvider, StarknetAccount, StarknetProvider,
    },
    AppError, PrivateKey, Result,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn rpc_result(result: serde_json::Value) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

#[tokio::test]
async fn test_call_decodes_output_felts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_call",
            "params": {
                "request": {
                    "contract_address": "0x1234",
                    "calldata": ["0xabc"],
                },
                "block_id": "latest",
            },
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!(["0x64", "0x0"])))
        .create_async()
        .await;

    let provider = JsonRpcProvider::new(&server.url()).unwrap();
    let call = Call {
        to: parse_felt("0x1234").unwrap(),
        selector: selector("get_single_update_fee"),
        calldata: vec![parse_felt("0xabc").unwrap()],
    };

    let output = assert_ok!(provider.call(&call).await);
    assert_eq!(output, vec![parse_felt("0x64").unwrap(), parse_felt("0x0").unwrap()]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_class_at_parses_sierra_abi() {
    let mut server = Server::new_async().await;
    let abi = json!([{
        "type": "function",
        "name": "symbol",
        "inputs": [],
        "outputs": [],
        "state_mutability": "view",
    }])
    .to_string();
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "starknet_getClassAt" })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({ "sierra_program": [], "abi": abi })))
        .create_async()
        .await;

    let provider = JsonRpcProvider::new(&server.url()).unwrap();
    let class = assert_ok!(provider.get_class_at(parse_felt("0xabc").unwrap()).await);
    assert!(class.find_function("symbol").is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_node_error_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 20, "message": "Contract not found" },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = JsonRpcProvider::new(&server.url()).unwrap();
    let err = assert_err!(provider.get_class_at(parse_felt("0x1").unwrap()).await);
    match err {
        AppError::Rpc(msg) => assert!(msg.contains("Contract not found"), "{msg}"),
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_for_accepted_receipt() {
    let mut server = Server::new_async().await;
    let receipt = json!({
        "transaction_hash": "0x1001",
        "execution_status": "REVERTED",
        "finality_status": "ACCEPTED_ON_L2",
        "revert_reason": "ERC20: insufficient allowance",
    });
    let _mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "starknet_getTransactionReceipt",
            "params": { "transaction_hash": "0x1001" },
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(receipt.clone()))
        .create_async()
        .await;

    let provider = JsonRpcProvider::new(&server.url()).unwrap();
    let receipt_out =
        assert_ok!(provider.wait_for_transaction(parse_felt("0x1001").unwrap()).await);
    assert!(!receipt_out.is_success());
    assert_eq!(receipt_out.raw, receipt);
}

#[tokio::test]
async fn test_http_failure_is_transport_error() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("POST", "/").with_status(503).create_async().await;

    let provider = JsonRpcProvider::new(&server.url()).unwrap();
    let err = assert_err!(provider.get_class_at(parse_felt("0x1").unwrap()).await);
    assert!(matches!(err, AppError::Transport(_)));
}

/// Unknown and not-yet-accepted transactions are polled until accepted.
#[tokio::test]
async fn test_wait_polls_until_accepted() {
    let mut server = Server::new_async().await;
    let not_found = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "id": 1 })))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 29, "message": "Transaction hash not found" },
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let pending = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "id": 2 })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "transaction_hash": "0x1002",
            "execution_status": "SUCCEEDED",
            "finality_status": "PRE_CONFIRMED",
        })))
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "id": 3,
            "method": "starknet_getTransactionReceipt",
            "params": { "transaction_hash": "0x1002" },
        })))
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "transaction_hash": "0x1002",
            "execution_status": "SUCCEEDED",
            "finality_status": "ACCEPTED_ON_L2",
        })))
        .expect(1)
        .create_async()
        .await;

    let provider =
        JsonRpcProvider::new(&server.url()).unwrap().with_poll_interval(Duration::from_millis(1));
    let receipt = assert_ok!(provider.wait_for_transaction(parse_felt("0x1002").unwrap()).await);
    assert!(receipt.is_success());
    assert_eq!(receipt.raw["finality_status"], "ACCEPTED_ON_L2");

    not_found.assert_async().await;
    pending.assert_async().await;
    accepted.assert_async().await;
}

#[derive(Debug)]
struct StaticAccount {
    address: Felt,
}

#[async_trait]
impl StarknetAccount for StaticAccount {
    fn address(&self) -> Felt {
        self.address
    }

    async fn execute(&self, _calls: Vec<Call>) -> Result<Felt> {
        Ok(Felt::from(1u64))
    }
}

#[derive(Debug)]
struct StaticConnector;

impl AccountConnector for StaticConnector {
    fn connect(
        &self,
        _private_key: &PrivateKey,
        address: Felt,
    ) -> Result<Arc<dyn StarknetAccount>> {
        Ok(Arc::new(StaticAccount { address }))
    }
}

/// Signing goes through the configured connector.
#[tokio::test]
async fn test_connect_account_uses_connector() {
    let provider = JsonRpcProvider::new("http://127.0.0.1:1")
        .unwrap()
        .with_account_connector(Arc::new(StaticConnector));
    let key = PrivateKey::from_hex("0x1").unwrap();
    let address = parse_felt("0x5eed").unwrap();

    let account = assert_ok!(provider.connect_account(&key, address));
    assert_eq!(account.address(), address);
    assert_eq!(assert_ok!(account.execute(Vec::new()).await), Felt::from(1u64));
}
