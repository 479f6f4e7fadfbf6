pub mod config;
pub mod display;
pub mod error;
pub mod handlers;
pub mod models;
pub mod security;
pub mod services;
pub mod utils;

pub use error::types::*;

use crate::config::Settings;
use crate::services::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let upstream = UpstreamClient::new(&settings.upstream)?;
        Ok(Self { settings, upstream })
    }
}
