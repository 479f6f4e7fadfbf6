pub mod health;
pub mod proxy;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub use health::health_check;
pub use proxy::{lp_v2_positions, lp_v3_positions, OUTCOME_HEADER};

pub fn create_proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/lpV2/:app_id/:address/:chain_name", get(lp_v2_positions))
        .route("/lpV3/:address/:token_address/:chain_id", get(lp_v3_positions))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", create_proxy_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
