//! Ethereum RPC client.

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, Provider, ProviderBuilder, RootProvider},
};
use reqwest::Url;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::WalletManager,
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying read-only provider.
    provider: Arc<HttpProvider>,
    /// RPC URL, reused for signing providers.
    rpc_url: Url,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        #[allow(deprecated)]
        let provider = ProviderBuilder::new().connect_http(url.clone()).root().clone();

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self { provider: Arc::new(provider), rpc_url: url })
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// A provider that fills nonce, gas, and chain id and signs with `wallet`.
    pub fn signing_provider(&self, wallet: &WalletManager) -> DynProvider {
        ProviderBuilder::new()
            .wallet(EthereumWallet::from(wallet.signer().clone()))
            .connect_http(self.rpc_url.clone())
            .erased()
    }
}

impl std::fmt::Debug for EthereumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumClient").field("rpc_url", &self.rpc_url.as_str()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_lazy() {
        // Nothing listens here; construction must still succeed.
        let client = EthereumClient::new("http://127.0.0.1:1").unwrap();
        assert!(format!("{client:?}").contains("127.0.0.1"));
    }

    #[test]
    fn test_signing_provider_is_lazy() {
        let client = EthereumClient::new("http://127.0.0.1:1").unwrap();
        let key = crate::PrivateKey::from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let wallet = WalletManager::from_private_key(&key).unwrap();

        // Builds against an unreachable node without any request.
        let _signing = client.signing_provider(&wallet);
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(EthereumClient::new("not a url"), Err(AppError::Config(_))));
    }
}
