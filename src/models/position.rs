use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One Uniswap V2 liquidity holding as shown in the V2 table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub label: String,
    pub secondary_label: String,
    pub token0: TokenLeg,
    pub token1: TokenLeg,
    /// Total liquidity in the pool, USD.
    pub pool_liquidity_usd: f64,
    pub fee_percentage: f64,
    pub share_percentage: f64,
    /// The caller's stake, USD.
    pub balance_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLeg {
    pub symbol: String,
    pub balance: f64,
    pub balance_usd: f64,
}

/// Per-address entry of the upstream balances response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressBalances {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub display_props: DisplayProps,
    #[serde(default)]
    pub tokens: Vec<AssetToken>,
    #[serde(rename = "balanceUSD", default)]
    pub balance_usd: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProps {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub secondary_label: Option<Value>,
    #[serde(default)]
    pub stats_items: Vec<StatsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsItem {
    #[serde(default)]
    pub label: String,
    pub value: StatsValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsValue {
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetToken {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(rename = "balanceUSD", default)]
    pub balance_usd: f64,
}

// statsItems order in the upstream payload: liquidity, volume, fee, share.
const STAT_LIQUIDITY: usize = 0;
const STAT_FEE: usize = 2;
const STAT_SHARE: usize = 3;

impl Asset {
    fn stat(&self, index: usize) -> f64 {
        self.display_props
            .stats_items
            .get(index)
            .and_then(|item| match &item.value.value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    fn leg(&self, index: usize) -> TokenLeg {
        self.tokens
            .get(index)
            .map(|token| TokenLeg {
                symbol: token.symbol.clone(),
                balance: token.balance,
                balance_usd: token.balance_usd,
            })
            .unwrap_or(TokenLeg {
                symbol: String::new(),
                balance: 0.0,
                balance_usd: 0.0,
            })
    }
}

impl From<&Asset> for Position {
    fn from(asset: &Asset) -> Self {
        let secondary_label = match &asset.display_props.secondary_label {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Position {
            label: asset.display_props.label.clone(),
            secondary_label,
            token0: asset.leg(0),
            token1: asset.leg(1),
            pool_liquidity_usd: asset.stat(STAT_LIQUIDITY),
            fee_percentage: asset.stat(STAT_FEE),
            share_percentage: asset.stat(STAT_SHARE),
            balance_usd: asset.balance_usd,
        }
    }
}

impl AddressBalances {
    /// Flatten every product's assets into table rows.
    pub fn positions(&self) -> Vec<Position> {
        self.products
            .iter()
            .flat_map(|product| product.assets.iter())
            .map(Position::from)
            .collect()
    }
}
