use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Uniswap V3 position NFT as returned by the NFT API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftRecord {
    pub token_id: String,
    /// Stable per-token key, used to key rendered lists.
    pub token_hash: String,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    /// JSON document serialized as a string.
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Body of a successful V3 positions response.
#[derive(Debug, Clone, Deserialize)]
pub struct NftPage {
    pub result: Vec<NftRecord>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl NftRecord {
    /// Parsed metadata; `None` when absent or not valid JSON.
    pub fn parsed_metadata(&self) -> Option<Value> {
        self.metadata
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserializes_with_optional_fields() {
        let record: NftRecord = serde_json::from_value(json!({
            "token_id": "123456",
            "token_hash": "9f2c",
            "metadata": "{\"name\":\"Uniswap - 0.3% - WETH/USDC\"}"
        }))
        .unwrap();

        assert_eq!(record.token_id, "123456");
        assert!(record.name.is_none());
        assert_eq!(
            record.parsed_metadata().unwrap()["name"],
            "Uniswap - 0.3% - WETH/USDC"
        );
    }

    #[test]
    fn test_invalid_metadata_is_ignored() {
        let record = NftRecord {
            token_id: "1".to_string(),
            token_hash: "a".to_string(),
            token_address: None,
            name: None,
            symbol: None,
            token_uri: None,
            metadata: Some("{not json".to_string()),
        };
        assert!(record.parsed_metadata().is_none());
    }
}
