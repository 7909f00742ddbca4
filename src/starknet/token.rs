//! Fee-token (ERC20) client.

use std::sync::Arc;

use alloy::primitives::U256;

use crate::{
    error::{AppError, Result},
    starknet::{
        client::ContractClient,
        felt::{decode_byte_array, decode_short_string, felt_to_hex, split_u256, Felt},
        provider::{StarknetAccount, StarknetProvider},
    },
};

/// A resolved fee-token contract.
#[derive(Debug, Clone)]
pub struct TokenClient {
    inner: ContractClient,
}

impl TokenClient {
    /// Resolve the token at `address`.
    ///
    /// Any failure to fetch or read the class is reported as
    /// `TokenResolutionFailed`.
    pub async fn resolve(provider: Arc<dyn StarknetProvider>, address: Felt) -> Result<Self> {
        let inner = ContractClient::resolve(provider, address)
            .await
            .map_err(|e| resolution_failed(address, e))?;
        Ok(Self { inner })
    }

    pub fn address(&self) -> Felt {
        self.inner.address()
    }

    pub fn connect(&mut self, account: Arc<dyn StarknetAccount>) {
        self.inner.connect(account);
    }

    /// The token symbol, as a short string or a `ByteArray`.
    pub async fn symbol(&self) -> Result<String> {
        let address = self.address();
        let output =
            self.inner.call("symbol", Vec::new()).await.map_err(|e| resolution_failed(address, e))?;

        let decoded = match output.as_slice() {
            [single] => decode_short_string(*single),
            _ => decode_byte_array(&output),
        };
        decoded.map_err(|e| resolution_failed(address, e))
    }

    /// Authorize `spender` to draw `amount` from the connected account.
    pub async fn approve(&self, spender: Felt, amount: U256) -> Result<Felt> {
        let [low, high] = split_u256(amount);
        self.inner.invoke("approve", vec![spender, low, high]).await
    }
}

fn resolution_failed(address: Felt, err: AppError) -> AppError {
    AppError::TokenResolutionFailed { token: felt_to_hex(address), reason: err.to_string() }
}
