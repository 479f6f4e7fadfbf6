use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::services::ProxyOutcome;
use crate::AppState;

/// Response header carrying the proxy's own verdict, since the status code
/// is always 200.
pub const OUTCOME_HEADER: &str = "x-proxy-outcome";

#[derive(Debug, Deserialize)]
pub struct LpV2Query {
    /// Extra comma-separated addresses to include in the balances request.
    pub addresses: Option<String>,
}

fn require_segment(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Relay the upstream body with status 200, whatever happened upstream.
fn relay(outcome: ProxyOutcome) -> Response {
    let tag = outcome.tag();
    (StatusCode::OK, [(OUTCOME_HEADER, tag)], Json(outcome.into_body())).into_response()
}

/// `GET /api/lpV2/:app_id/:address/:chain_name`
pub async fn lp_v2_positions(
    State(state): State<AppState>,
    Path((app_id, address, chain_name)): Path<(String, String, String)>,
    Query(query): Query<LpV2Query>,
) -> Result<Response, AppError> {
    require_segment("appId", &app_id)?;
    require_segment("address", &address)?;
    require_segment("chainName", &chain_name)?;

    let mut addresses = vec![address];
    if let Some(extra) = query.addresses.as_deref() {
        addresses.extend(
            extra
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        );
    }

    info!(app_id = %app_id, network = %chain_name, addresses = addresses.len(), "Proxying V2 balances request");
    let outcome = state
        .upstream
        .fetch_v2_balances(&app_id, &addresses, &chain_name)
        .await;

    Ok(relay(outcome))
}

/// `GET /api/lpV3/:address/:token_address/:chain_id`
pub async fn lp_v3_positions(
    State(state): State<AppState>,
    Path((address, token_address, chain_id)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    require_segment("address", &address)?;
    require_segment("tokenAddress", &token_address)?;
    require_segment("chainId", &chain_id)?;

    info!(address = %address, chain_id = %chain_id, "Proxying V3 positions request");
    let outcome = state
        .upstream
        .fetch_v3_nfts(&address, &token_address, &chain_id)
        .await;

    Ok(relay(outcome))
}
