//! In-memory transport for tests.
//!
//! Replies are scripted per URL and consumed in order. A reply can carry a
//! gate, which lets a test hold a request in flight while another cycle
//! runs to completion.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use url::Url;

use super::transport::{Transport, TransportError, TransportResult, WireResponse};

/// Two-sided handle for holding a scripted request in flight.
///
/// The transport signals `entered` once the request has claimed its reply,
/// then parks until the test fires `release`.
pub(crate) struct Gate {
    pub(crate) entered: Notify,
    pub(crate) release: Notify,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

enum Reply {
    Response(u16, String),
    Error(TransportError),
}

struct Scripted {
    reply: Reply,
    gate: Option<Arc<Gate>>,
}

/// Scriptable stand-in for `HttpTransport`.
#[derive(Default)]
pub(crate) struct FakeTransport {
    gets: Mutex<HashMap<String, VecDeque<Scripted>>>,
    heads: Mutex<HashMap<String, VecDeque<Scripted>>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a GET reply for `url` (URLs match after normalization,
    /// so include the trailing slash on host-only URLs)
    pub(crate) fn on_get(&self, url: &str, status: u16, body: &str) {
        self.push_get(url, Reply::Response(status, body.to_string()), None);
    }

    pub(crate) fn on_get_error(&self, url: &str, error: TransportError) {
        self.push_get(url, Reply::Error(error), None);
    }

    /// Script a GET reply that parks in flight until the returned gate
    /// is released
    pub(crate) fn on_get_gated(&self, url: &str, status: u16, body: &str) -> Arc<Gate> {
        let gate = Gate::new();
        self.push_get(url, Reply::Response(status, body.to_string()), Some(gate.clone()));
        gate
    }

    pub(crate) fn on_head(&self, url: &str, status: u16) {
        self.push_head(url, Reply::Response(status, String::new()), None);
    }

    pub(crate) fn on_head_error(&self, url: &str, error: TransportError) {
        self.push_head(url, Reply::Error(error), None);
    }

    fn push_get(&self, url: &str, reply: Reply, gate: Option<Arc<Gate>>) {
        self.gets
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Scripted { reply, gate });
    }

    fn push_head(&self, url: &str, reply: Reply, gate: Option<Arc<Gate>>) {
        self.heads
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Scripted { reply, gate });
    }

    fn claim(map: &Mutex<HashMap<String, VecDeque<Scripted>>>, method: &str, url: &Url) -> Scripted {
        map.lock()
            .unwrap()
            .get_mut(url.as_str())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted reply for {} {}", method, url))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, url: &Url) -> TransportResult<WireResponse> {
        let scripted = Self::claim(&self.gets, "GET", url);
        if let Some(gate) = scripted.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match scripted.reply {
            Reply::Response(status, body) => Ok(WireResponse { status, body }),
            Reply::Error(error) => Err(error),
        }
    }

    async fn head(&self, url: &Url) -> TransportResult<u16> {
        let scripted = Self::claim(&self.heads, "HEAD", url);
        if let Some(gate) = scripted.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match scripted.reply {
            Reply::Response(status, _) => Ok(status),
            Reply::Error(error) => Err(error),
        }
    }
}
