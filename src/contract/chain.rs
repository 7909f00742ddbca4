//! Chain handles, one variant per supported chain family.

use std::fmt;

use crate::{ethereum::EvmChain, starknet::StarknetChain};

/// The chain a contract is deployed on.
#[derive(Debug, Clone)]
pub enum Chain {
    Starknet(StarknetChain),
    Evm(EvmChain),
}

impl Chain {
    /// The configured chain identifier.
    pub fn id(&self) -> &str {
        match self {
            Chain::Starknet(chain) => chain.id(),
            Chain::Evm(chain) => chain.id(),
        }
    }

    /// Chain family name.
    pub fn family(&self) -> &'static str {
        match self {
            Chain::Starknet(_) => "starknet",
            Chain::Evm(_) => "evm",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chain '{}'", self.family(), self.id())
    }
}

impl From<StarknetChain> for Chain {
    fn from(chain: StarknetChain) -> Self {
        Chain::Starknet(chain)
    }
}

impl From<EvmChain> for Chain {
    fn from(chain: EvmChain) -> Self {
        Chain::Evm(chain)
    }
}
