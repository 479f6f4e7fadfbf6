use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniswap V3 NonfungiblePositionManager, deployed at the same address on
/// every supported chain.
pub const POSITION_MANAGER_ADDRESS: &str = "0xc36442b4a4522e871399cd717abdd847ab11fe88";

/// Chains the dashboard can show positions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Ethereum, Chain::Polygon];

    /// Resolve a wallet-reported hex chain id such as `0x1`.
    pub fn from_chain_id(chain_id: &str) -> Option<Chain> {
        match chain_id.trim().to_lowercase().as_str() {
            "0x1" => Some(Chain::Ethereum),
            "0x89" => Some(Chain::Polygon),
            _ => None,
        }
    }

    /// Resolve an upstream network name such as `polygon`.
    pub fn from_network_name(name: &str) -> Option<Chain> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.network_name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn chain_id(&self) -> &'static str {
        match self {
            Chain::Ethereum => "0x1",
            Chain::Polygon => "0x89",
        }
    }

    pub fn network_name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
        }
    }

    pub fn position_manager_address(&self) -> &'static str {
        POSITION_MANAGER_ADDRESS
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.network_name())
    }
}
