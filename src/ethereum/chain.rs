//! EVM chain handle.

use crate::ethereum::EthereumClient;

/// A configured EVM deployment target.
#[derive(Debug, Clone)]
pub struct EvmChain {
    id: String,
    client: EthereumClient,
}

impl EvmChain {
    pub fn new(id: impl Into<String>, client: EthereumClient) -> Self {
        Self { id: id.into(), client }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &EthereumClient {
        &self.client
    }
}
