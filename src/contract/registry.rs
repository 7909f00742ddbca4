//! Variant-tag registry for building contracts from configuration.

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
    config::ContractConfig,
    contract::{Chain, PriceFeedContract},
    error::{AppError, Result},
    ethereum::EvmPriceFeedContract,
    starknet::StarknetPriceFeedContract,
};

/// Builds one contract variant from its configuration record.
pub type ContractConstructor = fn(&Chain, &ContractConfig) -> Result<Arc<dyn PriceFeedContract>>;

/// Maps variant tags to constructors.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    constructors: HashMap<String, ContractConstructor>,
}

impl ContractRegistry {
    /// A registry with no variants.
    pub fn empty() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Register (or replace) the constructor for `contract_type`.
    pub fn register(&mut self, contract_type: &str, constructor: ContractConstructor) {
        self.constructors.insert(contract_type.to_string(), constructor);
    }

    /// Registered variant tags, sorted.
    pub fn contract_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Build a contract from a typed configuration record.
    pub fn from_config(
        &self,
        chain: &Chain,
        config: &ContractConfig,
    ) -> Result<Arc<dyn PriceFeedContract>> {
        let constructor = self.constructors.get(&config.contract_type).ok_or_else(|| {
            AppError::TypeMismatch(format!(
                "unknown contract type '{}' (known: {})",
                config.contract_type,
                self.contract_types().join(", ")
            ))
        })?;
        constructor(chain, config)
    }

    /// Build a contract from a JSON configuration record.
    pub fn from_json(&self, chain: &Chain, value: &Value) -> Result<Arc<dyn PriceFeedContract>> {
        let config: ContractConfig = serde_json::from_value(value.clone())?;
        self.from_config(chain, &config)
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(StarknetPriceFeedContract::TYPE, |chain, config| {
            Ok(Arc::new(StarknetPriceFeedContract::from_config(chain, config)?))
        });
        registry.register(EvmPriceFeedContract::TYPE, |chain, config| {
            Ok(Arc::new(EvmPriceFeedContract::from_config(chain, config)?))
        });
        registry
    }
}
