use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ClientSettings;
use crate::display::NftCard;
use crate::error::AppError;
use crate::models::{Chain, Notification, NftRecord};
use crate::security::AddressValidator;
use crate::services::notifier::Notifier;
use crate::services::position_source::{PositionSource, ProxyClient, SourceError};

/// Items revealed per "show more" step.
pub const PAGE_SIZE: usize = 10;

const TITLE: &str = "Uniswap LP Position V3";
const UNEXPECTED_ERROR_TITLE: &str = "Unexpected error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    Empty,
    Error,
}

/// Handle for one issued request. Only the ticket carrying the latest
/// generation may apply its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    address: String,
    chain: Chain,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(FetchState),
    /// A newer fetch was issued after this ticket; the response was dropped.
    Stale,
}

/// State behind the Uniswap V3 positions view.
///
/// Tracks which address is shown (connected wallet or a user override), the
/// full list of position NFTs and the page-limited prefix currently
/// displayed. Every accepted fetch resets lists and page counter.
pub struct V3PositionSession {
    source: Arc<dyn PositionSource>,
    notifier: Arc<dyn Notifier>,
    validator: AddressValidator,

    account: Option<String>,
    chain_id: Option<String>,
    override_address: Option<String>,

    showing_address: Option<String>,
    showing_chain: Option<Chain>,

    nfts: Vec<NftRecord>,
    displayed: Vec<NftRecord>,
    page: usize,
    state: FetchState,
    generation: u64,
}

impl V3PositionSession {
    pub fn new(
        source: Arc<dyn PositionSource>,
        notifier: Arc<dyn Notifier>,
        validator: AddressValidator,
    ) -> Self {
        Self {
            source,
            notifier,
            validator,
            account: None,
            chain_id: None,
            override_address: None,
            showing_address: None,
            showing_chain: None,
            nfts: Vec::new(),
            displayed: Vec::new(),
            page: 1,
            state: FetchState::Idle,
            generation: 0,
        }
    }

    /// Session backed by the HTTP proxy routes at `settings.proxy_base_url`.
    pub fn from_settings(
        settings: &ClientSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let source = Arc::new(ProxyClient::new(settings)?);
        Ok(Self::new(
            source,
            notifier,
            AddressValidator::new(settings.strict_address_format),
        ))
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn nfts(&self) -> &[NftRecord] {
        &self.nfts
    }

    pub fn displayed(&self) -> &[NftRecord] {
        &self.displayed
    }

    pub fn showing_address(&self) -> Option<&str> {
        self.showing_address.as_deref()
    }

    pub fn address_override(&self) -> Option<&str> {
        self.override_address.as_deref()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Chain reported by the wallet, if it is one we support.
    pub fn active_chain(&self) -> Option<Chain> {
        self.chain_id.as_deref().and_then(Chain::from_chain_id)
    }

    pub fn has_more(&self) -> bool {
        self.nfts.len() > self.displayed.len()
    }

    /// The "check connected wallet" action is offered only while an override
    /// different from the wallet is in effect.
    pub fn connected_wallet_button_visible(&self) -> bool {
        match (&self.override_address, &self.account) {
            (Some(over), Some(account)) => !over.eq_ignore_ascii_case(account),
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn tooltip(&self) -> Option<String> {
        let address = self.showing_address.as_deref()?;
        let chain = self
            .showing_chain
            .map(|c| c.network_name().to_string())
            .or_else(|| self.chain_id.clone())
            .unwrap_or_default();
        Some(format!(
            "Uniswap V3 Liquidity Position for the wallet {} on {} blockchain",
            address, chain
        ))
    }

    /// Cards for the displayed prefix.
    pub fn cards(&self) -> Vec<NftCard> {
        let chain = self.showing_chain.unwrap_or(Chain::Ethereum);
        self.displayed
            .iter()
            .map(|record| NftCard::from_record(record, chain))
            .collect()
    }

    fn notify_error(&self, title: &str, message: impl Into<String>) {
        self.notifier.notify(Notification::error(title, message));
    }

    fn reset(&mut self) {
        self.nfts.clear();
        self.displayed.clear();
        self.page = 1;
    }

    fn is_showing(&self, address: &str, chain: Option<Chain>) -> bool {
        chain.is_some()
            && self.showing_chain == chain
            && self
                .showing_address
                .as_deref()
                .map(|shown| shown.eq_ignore_ascii_case(address))
                .unwrap_or(false)
    }

    /// Validate a fetch request and, if accepted, reset the session into
    /// `Loading` and hand back the ticket for the network call.
    ///
    /// Returns `None` when nothing should be requested: bad input, an
    /// unsupported chain, or the address is already on screen.
    pub fn begin_fetch(&mut self, address: Option<&str>) -> Option<FetchTicket> {
        let raw = address.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            self.notify_error(TITLE, "Please enter a address");
            return None;
        }

        let chain = self.active_chain();
        if self.is_showing(&AddressValidator::normalize(raw), chain) {
            debug!(address = %raw, "Address already displayed, skipping fetch");
            return None;
        }

        let address = match self.validator.validate(raw) {
            Ok(address) => address,
            Err(e) => {
                warn!(address = %raw, error = %e, "Rejected address");
                self.notify_error(TITLE, "Please enter a valid address");
                return None;
            }
        };

        let chain = match chain {
            Some(chain) => chain,
            None => {
                warn!(chain_id = ?self.chain_id, "Unsupported chain");
                self.notify_error(TITLE, "Supports only Ethereum and Polygon");
                self.generation += 1;
                self.reset();
                self.showing_address = None;
                self.showing_chain = None;
                self.state = FetchState::Error;
                return None;
            }
        };

        self.generation += 1;
        self.reset();
        self.showing_address = Some(address.clone());
        self.showing_chain = Some(chain);
        self.state = FetchState::Loading;

        info!(address = %address, chain = %chain, generation = self.generation, "Fetching V3 positions");

        Some(FetchTicket {
            generation: self.generation,
            address,
            chain,
        })
    }

    /// Apply the response for `ticket`. Responses for superseded tickets are
    /// dropped without touching state.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<NftRecord>, SourceError>,
    ) -> ApplyOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "Discarding stale positions response"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(records) if records.is_empty() => {
                self.notifier.notify(Notification::warning(
                    TITLE,
                    format!(
                        "No UNISWAP-V3 LP NFTs found on {} chain for {}",
                        ticket.chain.network_name(),
                        ticket.address
                    ),
                ));
                self.reset();
                self.state = FetchState::Empty;
            }
            Ok(records) => {
                info!(address = %ticket.address, count = records.len(), "Loaded V3 positions");
                self.nfts = records;
                self.state = FetchState::Loaded;
                self.reconcile_display();
            }
            Err(e) => {
                warn!(address = %ticket.address, error = %e, "V3 positions fetch failed");
                self.notify_error(UNEXPECTED_ERROR_TITLE, e.to_string());
                self.reset();
                self.showing_address = None;
                self.showing_chain = None;
                self.state = FetchState::Error;
            }
        }

        ApplyOutcome::Applied(self.state)
    }

    /// Fetch positions for `address` on the wallet's current chain.
    pub async fn fetch(&mut self, address: Option<&str>) -> Option<ApplyOutcome> {
        let ticket = self.begin_fetch(address)?;
        let source = Arc::clone(&self.source);
        let result = source.v3_positions(ticket.address(), ticket.chain()).await;
        Some(self.complete_fetch(ticket, result))
    }

    /// Move to the next page. No-op once everything is displayed.
    pub fn advance_page(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Bring the displayed prefix up to `min(page * PAGE_SIZE, nfts.len())`.
    pub fn reconcile_display(&mut self) {
        let target = (self.page * PAGE_SIZE).min(self.nfts.len());
        let shown = self.displayed.len();
        if shown < target {
            self.displayed.extend_from_slice(&self.nfts[shown..target]);
        }
    }

    pub fn show_more(&mut self) {
        if self.advance_page() {
            self.reconcile_display();
        }
    }

    /// Wallet account or chain changed.
    pub async fn on_wallet_change(
        &mut self,
        account: Option<&str>,
        chain_id: Option<&str>,
    ) -> Option<ApplyOutcome> {
        self.account = account.map(str::to_string);
        self.chain_id = chain_id.map(str::to_string);

        let target = self
            .override_address
            .clone()
            .or_else(|| self.account.clone())?;
        self.fetch(Some(&target)).await
    }

    /// Track `address` instead of the connected wallet.
    pub async fn override_address(&mut self, address: &str) -> Option<ApplyOutcome> {
        if let Ok(normalized) = self.validator.validate(address) {
            self.override_address = Some(normalized);
        }
        self.fetch(Some(address)).await
    }

    pub fn clear_override(&mut self) {
        self.override_address = None;
    }

    /// Drop any override and show the connected wallet again.
    pub async fn show_connected_wallet(&mut self) -> Option<ApplyOutcome> {
        self.clear_override();
        let account = self.account.clone();
        self.fetch(account.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use crate::services::notifier::NotificationQueue;
    use async_trait::async_trait;

    struct FixedSource(usize);

    #[async_trait]
    impl PositionSource for FixedSource {
        async fn v3_positions(&self, _address: &str, _chain: Chain) -> Result<Vec<NftRecord>, SourceError> {
            Ok((0..self.0)
                .map(|i| NftRecord {
                    token_id: i.to_string(),
                    token_hash: format!("hash-{}", i),
                    token_address: None,
                    name: None,
                    symbol: None,
                    token_uri: None,
                    metadata: None,
                })
                .collect())
        }

        async fn v2_positions(&self, _app_id: &str, _address: &str, _chain: Chain) -> Result<Vec<Position>, SourceError> {
            Ok(vec![])
        }
    }

    const ADDR: &str = "0xf4adb9ba51fde3eaee89ce9a60e99992611849fd";

    fn session(count: usize) -> (V3PositionSession, NotificationQueue) {
        let queue = NotificationQueue::new();
        let session = V3PositionSession::new(
            Arc::new(FixedSource(count)),
            Arc::new(queue.clone()),
            AddressValidator::default(),
        );
        (session, queue)
    }

    #[tokio::test]
    async fn test_first_page_shown_after_fetch() {
        let (mut session, _) = session(13);
        session.on_wallet_change(Some(ADDR), Some("0x1")).await;

        assert_eq!(session.state(), FetchState::Loaded);
        assert_eq!(session.displayed().len(), 10);
        assert!(session.has_more());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let (mut session, _) = session(0);
        session.nfts = (0..15)
            .map(|i| NftRecord {
                token_id: i.to_string(),
                token_hash: i.to_string(),
                token_address: None,
                name: None,
                symbol: None,
                token_uri: None,
                metadata: None,
            })
            .collect();
        session.reconcile_display();
        session.reconcile_display();
        assert_eq!(session.displayed().len(), 10);

        assert!(session.advance_page());
        session.reconcile_display();
        session.reconcile_display();
        assert_eq!(session.displayed().len(), 15);
        assert!(!session.advance_page());
        assert_eq!(session.page(), 2);
    }

    #[tokio::test]
    async fn test_stale_ticket_is_dropped() {
        let (mut session, _) = session(3);
        session.chain_id = Some("0x1".to_string());

        let first = session.begin_fetch(Some(ADDR)).unwrap();
        session.showing_address = None;
        let second = session.begin_fetch(Some(ADDR)).unwrap();

        assert_eq!(session.complete_fetch(first, Ok(vec![])), ApplyOutcome::Stale);
        assert_eq!(session.state(), FetchState::Loading);
        assert_eq!(
            session.complete_fetch(second, Ok(vec![])),
            ApplyOutcome::Applied(FetchState::Empty)
        );
    }

    #[tokio::test]
    async fn test_connected_wallet_button() {
        let (mut session, _) = session(1);
        session.on_wallet_change(Some(ADDR), Some("0x89")).await;
        assert!(!session.connected_wallet_button_visible());

        let other = "0x1d44f3bfc5b901c581886b940235cfb798ce4fc8";
        session.override_address(other).await;
        assert_eq!(session.address_override(), Some(other));
        assert!(session.connected_wallet_button_visible());
        assert_eq!(
            session.tooltip().unwrap(),
            format!("Uniswap V3 Liquidity Position for the wallet {} on polygon blockchain", other)
        );

        session.show_connected_wallet().await;
        assert_eq!(session.address_override(), None);
        assert_eq!(session.showing_address(), Some(ADDR));
    }
}
