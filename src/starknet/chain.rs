//! Starknet chain handle.

use std::sync::Arc;

use crate::starknet::provider::StarknetProvider;

/// A configured Starknet deployment target.
#[derive(Debug, Clone)]
pub struct StarknetChain {
    id: String,
    provider: Arc<dyn StarknetProvider>,
}

impl StarknetChain {
    pub fn new(id: impl Into<String>, provider: Arc<dyn StarknetProvider>) -> Self {
        Self { id: id.into(), provider }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider(&self) -> Arc<dyn StarknetProvider> {
        Arc::clone(&self.provider)
    }
}
