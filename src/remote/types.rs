//! Outcome types for the remote configuration handshake.
//!
//! `ConfigFetcher` reduces every possible result of the configuration
//! request into a `FetchOutcome`, so downstream code only ever matches on
//! one enum instead of juggling transport, status, and parse errors.

use serde::{Deserialize, Deserializer};

/// Error domain for a malformed built-in endpoint URL
pub const DOMAIN_CONFIG: &str = "config";
/// Error domain for DNS, connection, and timeout failures
pub const DOMAIN_TRANSPORT: &str = "transport";
/// Error domain for non-success HTTP statuses
pub const DOMAIN_HTTP: &str = "http";
/// Error domain for malformed response bodies
pub const DOMAIN_PARSE: &str = "parse";

/// Sentinel code for failures that carry no HTTP status
pub const CODE_NON_HTTP: i32 = -1;

/// Classified result of one configuration fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchOutcome {
    /// No fetch has completed yet. This is only the resolver's pre-load
    /// default; `ConfigFetcher::fetch` never returns it.
    #[default]
    Pending,
    /// 2xx response with a parsed body. `destination` is `None` when the
    /// server supplied no redirect (field absent, null, non-string, or
    /// empty).
    Completed { destination: Option<String> },
    /// The server answered 429.
    RateLimited,
    /// Anything else: bad endpoint, transport failure, unexpected status,
    /// or an unparseable body.
    Failed(ErrorDetail),
}

/// What went wrong, reduced to three comparable fields.
///
/// Two values are equal iff domain, code, and message all match; nothing
/// of the underlying network error is retained beyond these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// One of the `DOMAIN_*` tags
    pub domain: &'static str,
    /// HTTP status, or -1 when no status was involved
    pub code: i32,
    /// Human-readable description, suitable for the failure view
    pub message: String,
}

impl ErrorDetail {
    /// The built-in endpoint string does not parse as a URL
    pub(crate) fn config() -> Self {
        Self {
            domain: DOMAIN_CONFIG,
            code: CODE_NON_HTTP,
            message: "Invalid configuration URL".to_string(),
        }
    }

    /// DNS failure, refused connection, timeout
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self {
            domain: DOMAIN_TRANSPORT,
            code: CODE_NON_HTTP,
            message: message.into(),
        }
    }

    /// Status outside 200-299 that is not a 429
    pub(crate) fn http(status: u16) -> Self {
        Self {
            domain: DOMAIN_HTTP,
            code: i32::from(status),
            message: format!("HTTP error {}", status),
        }
    }

    /// The response body was not the expected JSON object
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self {
            domain: DOMAIN_PARSE,
            code: CODE_NON_HTTP,
            message: format!("Malformed configuration response: {}", message.into()),
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.domain, self.code, self.message)
    }
}

/// Response envelope from the configuration endpoint.
///
/// The body is `{ "url": string | null | absent }`. A `url` of any other
/// JSON type counts as "no redirect", not as a parse failure; only a body
/// that is not a JSON object fails to deserialize.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, deserialize_with = "string_or_none")]
    pub url: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(ToOwned::to_owned))
}
