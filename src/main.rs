use lp_positions_dashboard::{config::Settings, handlers::create_router, AppState};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting LP Positions Dashboard");
    settings.log_missing_credentials();

    let state = AppState::new(settings.clone())?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server running on {}", addr);
    info!("  GET /health");
    info!("  GET /api/lpV2/{{appId}}/{{address}}/{{chainName}}");
    info!("  GET /api/lpV3/{{address}}/{{tokenAddress}}/{{chainId}}");

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Web server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down LP Positions Dashboard");
    Ok(())
}
