use crate::config::UpstreamSettings;
use crate::error::AppError;
use reqwest::{header, Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Result of one forwarded request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyOutcome {
    /// Upstream answered 2xx with a JSON body.
    Success(Value),
    /// Upstream answered non-2xx but the body was still JSON.
    UpstreamError { status: u16, body: Value },
    /// Transport failure or a body that was not JSON.
    Failure(String),
}

impl ProxyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProxyOutcome::Success(_))
    }

    /// Short tag for the `x-proxy-outcome` response header.
    pub fn tag(&self) -> &'static str {
        match self {
            ProxyOutcome::Success(_) => "success",
            ProxyOutcome::UpstreamError { .. } => "upstream-error",
            ProxyOutcome::Failure(_) => "failure",
        }
    }

    /// Body relayed to the browser. Upstream JSON is passed through as-is;
    /// transport failures collapse to `{"data":"error"}`.
    pub fn into_body(self) -> Value {
        match self {
            ProxyOutcome::Success(body) => body,
            ProxyOutcome::UpstreamError { body, .. } => body,
            ProxyOutcome::Failure(_) => json!({ "data": "error" }),
        }
    }
}

/// HTTP client for the third-party balances and NFT APIs.
///
/// Credentials are held server-side and attached to every request.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    zapper_base: Url,
    zapper_api_key: String,
    moralis_base: Url,
    moralis_api_key: String,
}

impl UpstreamClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            zapper_base: settings.zapper_api_url.parse()?,
            zapper_api_key: settings.zapper_api_key.clone(),
            moralis_base: settings.moralis_api_url.parse()?,
            moralis_api_key: settings.moralis_api_key.clone(),
        })
    }

    /// `{zapper}/v2/apps/{app}/balances?addresses[]=..&network=..`
    pub fn v2_balances_url(
        &self,
        app_id: &str,
        addresses: &[String],
        network: &str,
    ) -> Result<Url, AppError> {
        let mut url = self.zapper_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::ConfigError("Zapper API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v2", "apps", app_id, "balances"]);
        {
            let mut query = url.query_pairs_mut();
            for address in addresses {
                query.append_pair("addresses[]", address);
            }
            query.append_pair("network", network);
        }
        Ok(url)
    }

    /// `{moralis}/{address}/nft/{token_address}?chain=..&format=decimal`
    pub fn v3_positions_url(
        &self,
        address: &str,
        token_address: &str,
        chain_id: &str,
    ) -> Result<Url, AppError> {
        let mut url = self.moralis_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::ConfigError("Moralis API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([address, "nft", token_address]);
        url.query_pairs_mut()
            .append_pair("chain", chain_id)
            .append_pair("format", "decimal");
        Ok(url)
    }

    pub async fn fetch_v2_balances(&self, app_id: &str, addresses: &[String], network: &str) -> ProxyOutcome {
        let url = match self.v2_balances_url(app_id, addresses, network) {
            Ok(url) => url,
            Err(e) => return ProxyOutcome::Failure(e.to_string()),
        };

        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .header(header::AUTHORIZATION, format!("Basic {}", self.zapper_api_key));

        self.forward(request, "zapper").await
    }

    pub async fn fetch_v3_nfts(&self, address: &str, token_address: &str, chain_id: &str) -> ProxyOutcome {
        let url = match self.v3_positions_url(address, token_address, chain_id) {
            Ok(url) => url,
            Err(e) => return ProxyOutcome::Failure(e.to_string()),
        };

        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header("X-API-Key", &self.moralis_api_key);

        self.forward(request, "moralis").await
    }

    async fn forward(&self, request: RequestBuilder, upstream: &'static str) -> ProxyOutcome {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(upstream, error = %e, "Upstream request failed");
                return ProxyOutcome::Failure(e.to_string());
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(upstream, status = status.as_u16(), error = %e, "Upstream returned a non-JSON body");
                return ProxyOutcome::Failure(e.to_string());
            }
        };

        if status.is_success() {
            debug!(upstream, status = status.as_u16(), "Upstream request succeeded");
            ProxyOutcome::Success(body)
        } else {
            warn!(upstream, status = status.as_u16(), "Upstream returned an error status");
            ProxyOutcome::UpstreamError {
                status: status.as_u16(),
                body,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> UpstreamClient {
        UpstreamClient::new(&UpstreamSettings::default()).unwrap()
    }

    #[test]
    fn test_v2_url_encodes_address_list() {
        let url = client()
            .v2_balances_url(
                "uniswap-v2",
                &["0xabc".to_string(), "0xdef".to_string()],
                "polygon",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.zapper.fi/v2/apps/uniswap-v2/balances?addresses%5B%5D=0xabc&addresses%5B%5D=0xdef&network=polygon"
        );
    }

    #[test]
    fn test_v3_url_keeps_base_path() {
        let url = client()
            .v3_positions_url("0xabc", "0xc36442b4a4522e871399cd717abdd847ab11fe88", "0x89")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://deep-index.moralis.io/api/v2/0xabc/nft/0xc36442b4a4522e871399cd717abdd847ab11fe88?chain=0x89&format=decimal"
        );
    }

    #[test]
    fn test_failure_body_is_generic() {
        let outcome = ProxyOutcome::Failure("connection refused".to_string());
        assert_eq!(outcome.tag(), "failure");
        assert_eq!(outcome.into_body(), json!({ "data": "error" }));
    }

    #[test]
    fn test_upstream_error_body_is_relayed() {
        let body = json!({ "message": "Unauthorized" });
        let outcome = ProxyOutcome::UpstreamError { status: 401, body: body.clone() };
        assert!(!outcome.is_success());
        assert_eq!(outcome.into_body(), body);
    }
}
