//! Wallet management.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::{
    error::{AppError, Result},
    types::PrivateKey,
};

/// Wallet manager for transaction signing.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key.
    pub fn from_private_key(private_key: &PrivateKey) -> Result<Self> {
        let signer: PrivateKeySigner =
            private_key.as_hex().parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;

        let address = signer.address();

        tracing::debug!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the signer for transaction signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Fail unless this wallet's address is `sender`.
    pub fn ensure_controls(&self, sender: Address) -> Result<()> {
        if self.address != sender {
            return Err(AppError::Wallet(format!(
                "private key controls {}, not sender {}",
                self.address, sender
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known Hardhat/Foundry development key.
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn wallet() -> WalletManager {
        WalletManager::from_private_key(&PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_wallet_address_from_key() {
        let addr_str = format!("{:?}", wallet().address()).to_lowercase();
        assert_eq!(addr_str, TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_invalid_private_key() {
        let short = PrivateKey::from_hex("0x1234").unwrap();
        assert!(matches!(WalletManager::from_private_key(&short), Err(AppError::Wallet(_))));
    }

    #[test]
    fn test_ensure_controls() {
        let wallet = wallet();
        let own: Address = TEST_ADDRESS.parse().unwrap();
        assert!(wallet.ensure_controls(own).is_ok());

        let other: Address = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap();
        assert!(matches!(wallet.ensure_controls(other), Err(AppError::Wallet(_))));
    }

    #[test]
    fn test_wallet_debug_hides_key() {
        let debug_str = format!("{:?}", wallet());
        assert!(debug_str.contains("WalletManager"));
        assert!(
            !debug_str.contains("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
        );
    }
}
