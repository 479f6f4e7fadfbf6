use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Chain;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub supported_chains: Vec<Chain>,
    pub upstreams: UpstreamStatus,
}

/// Whether a credential is configured for each upstream. Reachability is
/// not probed.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpstreamStatus {
    pub zapper_credential: bool,
    pub moralis_credential: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstreams = UpstreamStatus {
        zapper_credential: !state.settings.upstream.zapper_api_key.is_empty(),
        moralis_credential: !state.settings.upstream.moralis_api_key.is_empty(),
    };

    let status = if upstreams.zapper_credential && upstreams.moralis_credential {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_chains: Chain::ALL.to_vec(),
        upstreams,
    })
}
