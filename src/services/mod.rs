pub mod notifier;
pub mod position_source;
pub mod upstream_client;
pub mod v2_position_service;
pub mod v3_position_session;

pub use notifier::{NotificationQueue, Notifier, TracingNotifier};
pub use position_source::{PositionSource, ProxyClient, SourceError};
pub use upstream_client::{ProxyOutcome, UpstreamClient};
pub use v2_position_service::V2PositionOverview;
pub use v3_position_session::{ApplyOutcome, FetchState, FetchTicket, V3PositionSession, PAGE_SIZE};
