//! Remote configuration handshake.
//!
//! This module owns everything that talks to the network: the transport
//! seam, the configuration fetcher, and the outcome types the navigation
//! layer consumes.

#[cfg(test)]
pub(crate) mod fake;
mod fetcher;
mod transport;
mod types;

pub use fetcher::{ConfigFetcher, CONFIG_ENDPOINT};
pub use transport::{
    HttpTransport, Transport, TransportError, TransportResult, WireResponse, REQUEST_TIMEOUT_SECS,
};
pub use types::{
    ErrorDetail, FetchOutcome, RemoteConfig, CODE_NON_HTTP, DOMAIN_CONFIG, DOMAIN_HTTP,
    DOMAIN_PARSE, DOMAIN_TRANSPORT,
};
