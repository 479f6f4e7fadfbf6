use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientSettings;
use crate::error::AppError;
use crate::models::{AddressBalances, Chain, NftPage, NftRecord, Position};
use crate::services::upstream_client::UpstreamClient;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("The balances service could not complete the request")]
    UpstreamFailure,

    #[error("{0}")]
    Upstream(String),

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// Where position views get their data from.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Uniswap V3 position NFTs held by `address`.
    async fn v3_positions(&self, address: &str, chain: Chain) -> Result<Vec<NftRecord>, SourceError>;

    /// Uniswap V2 style balances for `address` under `app_id`.
    async fn v2_positions(&self, app_id: &str, address: &str, chain: Chain) -> Result<Vec<Position>, SourceError>;
}

fn is_soft_failure(payload: &Value) -> bool {
    payload.get("data").and_then(Value::as_str) == Some("error")
}

/// Turn a relayed V3 body into records. The proxy answers 200 even when it
/// failed, so the payload shape is the only signal.
pub fn classify_v3_payload(payload: Value) -> Result<Vec<NftRecord>, SourceError> {
    if is_soft_failure(&payload) {
        return Err(SourceError::UpstreamFailure);
    }

    if payload.get("result").map(Value::is_array).unwrap_or(false) {
        let page: NftPage = serde_json::from_value(payload)
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))?;
        return Ok(page.result);
    }

    match payload.get("message").and_then(Value::as_str) {
        Some(message) => Err(SourceError::Upstream(message.to_string())),
        None => Err(SourceError::MalformedResponse("missing `result` list".to_string())),
    }
}

/// Turn a relayed V2 balances body into table rows for `address`.
pub fn classify_v2_payload(payload: Value, address: &str) -> Result<Vec<Position>, SourceError> {
    if is_soft_failure(&payload) {
        return Err(SourceError::UpstreamFailure);
    }

    let entry = payload
        .get("balances")
        .and_then(|balances| balances.get(address.to_lowercase()))
        .cloned()
        .ok_or_else(|| SourceError::MalformedResponse(format!("no balances for {}", address)))?;

    let balances: AddressBalances = serde_json::from_value(entry)
        .map_err(|e| SourceError::MalformedResponse(e.to_string()))?;

    if let Some(err) = balances.error {
        return Err(SourceError::Upstream(err.message));
    }

    Ok(balances.positions())
}

/// Talks to this service's own `/api/lpV2` and `/api/lpV3` routes over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: Url,
}

impl ProxyClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.proxy_base_url.parse()?,
        })
    }

    fn route(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Transport("proxy URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, SourceError> {
        debug!(url = %url, "Requesting positions from proxy");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Proxy request failed");
            SourceError::Transport(e.to_string())
        })?;

        response
            .json()
            .await
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl PositionSource for ProxyClient {
    async fn v3_positions(&self, address: &str, chain: Chain) -> Result<Vec<NftRecord>, SourceError> {
        let url = self.route(&["lpV3", address, chain.position_manager_address(), chain.chain_id()])?;
        classify_v3_payload(self.get_json(url).await?)
    }

    async fn v2_positions(&self, app_id: &str, address: &str, chain: Chain) -> Result<Vec<Position>, SourceError> {
        let url = self.route(&["lpV2", app_id, address, chain.network_name()])?;
        classify_v2_payload(self.get_json(url).await?, address)
    }
}

/// Server-side use: skip the HTTP hop and ask the upstream APIs directly.
#[async_trait]
impl PositionSource for UpstreamClient {
    async fn v3_positions(&self, address: &str, chain: Chain) -> Result<Vec<NftRecord>, SourceError> {
        let outcome = self
            .fetch_v3_nfts(address, chain.position_manager_address(), chain.chain_id())
            .await;
        classify_v3_payload(outcome.into_body())
    }

    async fn v2_positions(&self, app_id: &str, address: &str, chain: Chain) -> Result<Vec<Position>, SourceError> {
        let outcome = self
            .fetch_v2_balances(app_id, &[address.to_string()], chain.network_name())
            .await;
        classify_v2_payload(outcome.into_body(), address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v3_soft_failure_detected() {
        assert_eq!(
            classify_v3_payload(json!({ "data": "error" })),
            Err(SourceError::UpstreamFailure)
        );
    }

    #[test]
    fn test_v3_result_list_parsed() {
        let records = classify_v3_payload(json!({
            "total": 2,
            "result": [
                { "token_id": "1", "token_hash": "h1" },
                { "token_id": "2", "token_hash": "h2", "metadata": null }
            ]
        }))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].token_hash, "h2");
    }

    #[test]
    fn test_v3_upstream_message() {
        assert_eq!(
            classify_v3_payload(json!({ "message": "Invalid API key" })),
            Err(SourceError::Upstream("Invalid API key".to_string()))
        );
        assert!(matches!(
            classify_v3_payload(json!({ "unexpected": true })),
            Err(SourceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_v2_error_entry() {
        let payload = json!({
            "balances": {
                "0xabc": { "products": [], "error": { "message": "rate limited" } }
            }
        });
        assert_eq!(
            classify_v2_payload(payload, "0xABC"),
            Err(SourceError::Upstream("rate limited".to_string()))
        );
    }

    #[test]
    fn test_v2_empty_products() {
        let payload = json!({ "balances": { "0xabc": { "products": [] } } });
        assert_eq!(classify_v2_payload(payload, "0xabc"), Ok(vec![]));
    }

    #[test]
    fn test_proxy_routes() {
        let client = ProxyClient::new(&ClientSettings::default()).unwrap();
        let url = client
            .route(&["lpV3", "0xabc", Chain::Polygon.position_manager_address(), "0x89"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/lpV3/0xabc/0xc36442b4a4522e871399cd717abdd847ab11fe88/0x89"
        );
    }
}
