//! Contract client resolver.
//!
//! A [`ContractClient`] is resolved from the live class at an address every
//! time it is needed. Nothing here caches classes across operations, so an
//! upgraded class at a fixed address is always picked up on the next call.

use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{AppError, Result},
    starknet::{
        abi::ContractClass,
        felt::{felt_to_hex, selector, Felt},
        provider::{Call, StarknetAccount, StarknetProvider},
    },
};

/// A callable handle to a deployed contract, bound to its current ABI.
#[derive(Debug, Clone)]
pub struct ContractClient {
    address: Felt,
    class: ContractClass,
    provider: Arc<dyn StarknetProvider>,
    account: Option<Arc<dyn StarknetAccount>>,
}

impl ContractClient {
    /// Fetch the class at `address` and build a handle for it.
    pub async fn resolve(provider: Arc<dyn StarknetProvider>, address: Felt) -> Result<Self> {
        let class = provider.get_class_at(address).await?;
        debug!(
            address = %felt_to_hex(address),
            functions = class.functions().len(),
            "Resolved contract class"
        );
        Ok(Self { address, class, provider, account: None })
    }

    pub fn address(&self) -> Felt {
        self.address
    }

    pub fn class(&self) -> &ContractClass {
        &self.class
    }

    /// Bind a signing account; subsequent invocations are sent through it.
    pub fn connect(&mut self, account: Arc<dyn StarknetAccount>) {
        self.account = Some(account);
    }

    pub fn has_entry_point(&self, name: &str) -> bool {
        self.class.find_function(name).is_some()
    }

    /// Build a call to `name`, refusing entry points the ABI does not declare.
    pub fn prepare(&self, name: &str, calldata: Vec<Felt>) -> Result<Call> {
        if !self.has_entry_point(name) {
            return Err(AppError::MissingEntryPoint {
                address: felt_to_hex(self.address),
                entry_point: name.to_string(),
            });
        }
        Ok(Call { to: self.address, selector: selector(name), calldata })
    }

    /// Execute a view call and return the raw output.
    pub async fn call(&self, name: &str, calldata: Vec<Felt>) -> Result<Vec<Felt>> {
        let call = self.prepare(name, calldata)?;
        let output = self.provider.call(&call).await?;
        debug!(
            address = %felt_to_hex(self.address),
            entry_point = name,
            output_len = output.len(),
            "Contract call returned"
        );
        Ok(output)
    }

    /// Submit an invocation through the connected account.
    pub async fn invoke(&self, name: &str, calldata: Vec<Felt>) -> Result<Felt> {
        let account = self.account.as_ref().ok_or_else(|| {
            AppError::Wallet(format!(
                "no account connected to contract {}",
                felt_to_hex(self.address)
            ))
        })?;
        let call = self.prepare(name, calldata)?;
        account.execute(vec![call]).await
    }
}
