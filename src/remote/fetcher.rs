//! Configuration endpoint client.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use super::transport::Transport;
use super::types::{ErrorDetail, FetchOutcome, RemoteConfig};

/// Fixed configuration endpoint queried at startup
pub const CONFIG_ENDPOINT: &str = "https://config.launchgate.app/";

/// Client for the configuration endpoint.
///
/// One GET per call, no retry, no caching. Classification of every way the
/// request can go lives here, so callers only ever match on `FetchOutcome`.
pub struct ConfigFetcher {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl ConfigFetcher {
    /// Create a fetcher against the built-in endpoint
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_endpoint(transport, CONFIG_ENDPOINT)
    }

    /// Create a fetcher against a custom endpoint (debugging/dev
    /// deployments only)
    pub fn with_endpoint(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch and classify the remote configuration. Single attempt; the
    /// caller decides whether and when to try again.
    pub async fn fetch(&self) -> FetchOutcome {
        // The endpoint is compiled in, so this only fires on a bad build
        let url = match Url::parse(&self.endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!("configuration endpoint {:?} does not parse: {}", self.endpoint, e);
                return FetchOutcome::Failed(ErrorDetail::config());
            }
        };

        let response = match self.transport.get_json(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("configuration fetch failed: {}", e);
                return FetchOutcome::Failed(ErrorDetail::transport(e.to_string()));
            }
        };

        if response.status == 429 {
            warn!("configuration endpoint is rate limiting");
            return FetchOutcome::RateLimited;
        }

        if !response.is_success() {
            warn!("configuration endpoint returned {}", response.status);
            return FetchOutcome::Failed(ErrorDetail::http(response.status));
        }

        let config: RemoteConfig = match serde_json::from_str(&response.body) {
            Ok(config) => config,
            Err(e) => {
                warn!("configuration body did not parse: {}", e);
                return FetchOutcome::Failed(ErrorDetail::parse(e.to_string()));
            }
        };

        let destination = config.url.filter(|u| !u.is_empty());
        debug!("configuration resolved, destination: {:?}", destination);
        FetchOutcome::Completed { destination }
    }
}
