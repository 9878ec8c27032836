//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::client::MastodonClient;
use crate::config::Config;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// HTTP client for Mastodon instances.
    pub client: MastodonClient,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = MastodonClient::new(config.fetch_timeout, config.allow_private_hosts)?;

        tracing::info!(
            fetch_timeout_secs = config.fetch_timeout.as_secs(),
            allow_private_hosts = config.allow_private_hosts,
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}
