//! Network seam for the configuration handshake.
//!
//! Both requests the resolver ever makes (the configuration GET and the
//! destination HEAD) go through the `Transport` trait, so components are
//! built against an injected transport instead of a shared global client
//! and tests can swap in an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Fixed timeout for both the configuration GET and the destination HEAD
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default user agent string
const DEFAULT_USER_AGENT: &str = concat!("launchgate/", env!("CARGO_PKG_VERSION"));

/// Transport operation result type
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-level failures, i.e. anything that prevented an HTTP status
/// from coming back. A timeout is not distinguished from other failures
/// anywhere downstream; the variants exist for log readability.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Minimal view of an HTTP response: the status plus the body text.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// The two requests the navigation flow is allowed to make.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a JSON resource, returning the status and body text
    async fn get_json(&self, url: &Url) -> TransportResult<WireResponse>;

    /// HEAD a resource, returning only the status
    async fn head(&self, url: &Url) -> TransportResult<u16>;
}

/// Production transport backed by a shared reqwest client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the fixed 10-second timeout
    pub fn new() -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &Url) -> TransportResult<WireResponse> {
        let request_id = Uuid::new_v4().to_string();
        debug!("GET {} (x-request-id: {})", url, request_id);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header("x-request-id", &request_id)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(WireResponse { status, body })
    }

    async fn head(&self, url: &Url) -> TransportResult<u16> {
        debug!("HEAD {}", url);

        let response = self.client.head(url.clone()).send().await?;
        let status = response.status().as_u16();
        debug!("HEAD {} -> {}", url, status);

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_response_success_range() {
        assert!(WireResponse { status: 200, body: String::new() }.is_success());
        assert!(WireResponse { status: 204, body: String::new() }.is_success());
        assert!(WireResponse { status: 299, body: String::new() }.is_success());
        assert!(!WireResponse { status: 199, body: String::new() }.is_success());
        assert!(!WireResponse { status: 301, body: String::new() }.is_success());
        assert!(!WireResponse { status: 429, body: String::new() }.is_success());
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Connect("refused".to_string()).to_string(),
            "connection failed: refused"
        );
    }
}
