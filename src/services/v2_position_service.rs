use std::sync::Arc;
use tracing::{info, warn};

use crate::display::{position_rows, PositionRow};
use crate::models::{Chain, Notification, Position};
use crate::services::notifier::Notifier;
use crate::services::position_source::{PositionSource, SourceError};
use crate::services::v3_position_session::FetchState;

pub const UNISWAP_V2_APP_ID: &str = "uniswap-v2";

const TITLE: &str = "Uniswap LP Position V2";

/// Loads the connected wallet's Uniswap V2 balances for the table view.
pub struct V2PositionOverview {
    source: Arc<dyn PositionSource>,
    notifier: Arc<dyn Notifier>,
    app_id: String,
    positions: Vec<Position>,
    state: FetchState,
}

impl V2PositionOverview {
    pub fn new(source: Arc<dyn PositionSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_app_id(source, notifier, UNISWAP_V2_APP_ID)
    }

    pub fn with_app_id(
        source: Arc<dyn PositionSource>,
        notifier: Arc<dyn Notifier>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            app_id: app_id.into(),
            positions: Vec::new(),
            state: FetchState::Idle,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn rows(&self) -> Vec<PositionRow> {
        position_rows(&self.positions)
    }

    /// Reload for a wallet/chain change. Nothing happens until both are known.
    pub async fn load(&mut self, account: Option<&str>, chain_id: Option<&str>) -> FetchState {
        let (account, chain_id) = match (account, chain_id) {
            (Some(account), Some(chain_id)) if !account.trim().is_empty() => (account.trim(), chain_id),
            _ => return self.state,
        };

        let chain = match Chain::from_chain_id(chain_id) {
            Some(chain) => chain,
            None => {
                warn!(chain_id, "Unsupported chain for V2 positions");
                self.notifier
                    .notify(Notification::error(TITLE, "Supports only Ethereum and Polygon"));
                self.positions.clear();
                self.state = FetchState::Error;
                return self.state;
            }
        };

        self.state = FetchState::Loading;
        let address = account.to_lowercase();
        let result = self.source.v2_positions(&self.app_id, &address, chain).await;

        match result {
            Ok(positions) if positions.is_empty() => {
                self.notifier.notify(Notification::warning(TITLE, "No LP positions found"));
                self.positions.clear();
                self.state = FetchState::Empty;
            }
            Ok(positions) => {
                info!(address = %address, chain = %chain, count = positions.len(), "Loaded V2 positions");
                self.positions = positions;
                self.state = FetchState::Loaded;
            }
            Err(SourceError::Upstream(message)) => {
                warn!(address = %address, error = %message, "Balances API reported an error");
                self.notifier.notify(Notification::error(TITLE, message));
                self.positions.clear();
                self.state = FetchState::Error;
            }
            Err(e) => {
                warn!(address = %address, error = %e, "V2 positions fetch failed");
                self.notifier.notify(Notification::error("Unexpected error", e.to_string()));
                self.positions.clear();
                self.state = FetchState::Error;
            }
        }

        self.state
    }
}
