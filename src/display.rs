//! View models handed to the rendering layer. Everything here is derived
//! from fetched data; nothing is stored.

use serde::Serialize;
use serde_json::Value;

use crate::models::{Chain, NftRecord, Position};
use crate::utils::format::{format_amount, format_percent, format_usd};

/// One row of the Uniswap V2 positions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRow {
    /// 1-based.
    pub index: usize,
    pub pool: String,
    pub token0_symbol: String,
    pub token0_balance: String,
    pub token1_symbol: String,
    pub token1_balance: String,
    pub pool_liquidity: String,
    pub fee: String,
    pub share: String,
}

impl PositionRow {
    pub fn from_position(index: usize, position: &Position) -> Self {
        let leg = |balance: f64, usd: f64| format!("{}({})", format_amount(balance), format_usd(usd));

        Self {
            index: index + 1,
            pool: format!("{}({})", position.label, position.secondary_label),
            token0_symbol: position.token0.symbol.clone(),
            token0_balance: leg(position.token0.balance, position.token0.balance_usd),
            token1_symbol: position.token1.symbol.clone(),
            token1_balance: leg(position.token1.balance, position.token1.balance_usd),
            pool_liquidity: format_amount(position.pool_liquidity_usd),
            fee: format_percent(position.fee_percentage),
            share: format!(
                "{}({})",
                format_percent(position.share_percentage),
                format_usd(position.balance_usd)
            ),
        }
    }
}

pub fn position_rows(positions: &[Position]) -> Vec<PositionRow> {
    positions
        .iter()
        .enumerate()
        .map(|(i, position)| PositionRow::from_position(i, position))
        .collect()
}

/// Input for the NFT widget plus the marketplace link around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NftCard {
    pub key: String,
    pub token_id: String,
    pub contract_address: String,
    pub chain_id: String,
    pub metadata: Option<Value>,
    pub marketplace_url: String,
}

impl NftCard {
    pub fn from_record(record: &NftRecord, chain: Chain) -> Self {
        let contract = chain.position_manager_address();
        Self {
            key: record.token_hash.clone(),
            token_id: record.token_id.clone(),
            contract_address: contract.to_string(),
            chain_id: chain.chain_id().to_string(),
            metadata: record.parsed_metadata(),
            marketplace_url: format!(
                "https://opensea.io/assets/ethereum/{}/{}",
                contract, record.token_id
            ),
        }
    }
}

/// Help text for the wallet-wide NFT view.
pub fn wallet_nfts_tooltip(account: &str, chain: Option<Chain>) -> String {
    let chain = chain.map(|c| c.network_name()).unwrap_or("unknown");
    format!("All NFTs in the wallet {} on {} blockchain", account, chain)
}
