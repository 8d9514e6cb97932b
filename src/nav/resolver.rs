//! Navigation state machine with stale-cycle protection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use super::state::NavigationState;
use crate::remote::{ConfigFetcher, FetchOutcome, Transport};

/// Message shown when the configuration service answers 429
const RATE_LIMITED_MESSAGE: &str =
    "The service is temporarily unavailable. Please try again shortly.";

/// Drives `NavigationState` through one load cycle at a time.
///
/// The current state is published through a watch channel; consumers take
/// a snapshot with `state()` or follow transitions with `subscribe()`.
/// All mutation goes through `begin_load`/`retry`. Cycles are numbered,
/// and a cycle only gets to publish while it is still the newest one, so
/// a slow response can never overwrite the result of a later retry.
pub struct NavigationResolver {
    fetcher: ConfigFetcher,
    transport: Arc<dyn Transport>,
    state: watch::Sender<NavigationState>,
    cycle: AtomicU64,
}

impl NavigationResolver {
    /// Create a resolver against the built-in configuration endpoint
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let fetcher = ConfigFetcher::new(transport.clone());
        Self::with_fetcher(fetcher, transport)
    }

    /// Create a resolver with a custom-built fetcher
    pub fn with_fetcher(fetcher: ConfigFetcher, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(NavigationState::Splash);
        Self {
            fetcher,
            transport,
            state,
            cycle: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Follow state transitions as they are published
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    /// Run one load cycle: show the splash, fetch the configuration, and
    /// settle on a terminal state. Starting a newer cycle supersedes this
    /// one; a superseded cycle still runs its requests but publishes
    /// nothing.
    pub async fn begin_load(&self) {
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("cycle {}: load started", cycle);
        self.publish(cycle, NavigationState::Splash);

        let outcome = self.fetcher.fetch().await;
        let next = self.apply_outcome(outcome).await;
        debug!("cycle {}: settled on {}", cycle, next);
        self.publish(cycle, next);
    }

    /// User-initiated retry; identical to a fresh load
    pub async fn retry(&self) {
        self.begin_load().await;
    }

    async fn apply_outcome(&self, outcome: FetchOutcome) -> NavigationState {
        match outcome {
            FetchOutcome::Completed {
                destination: Some(destination),
            } => self.validate_destination(destination).await,
            FetchOutcome::Completed { destination: None } => {
                info!("no redirect requested, showing the primary interface");
                NavigationState::Primary
            }
            FetchOutcome::RateLimited => NavigationState::Failure {
                message: RATE_LIMITED_MESSAGE.to_string(),
            },
            FetchOutcome::Failed(cause) => {
                debug!("configuration fetch failed: {}", cause);
                NavigationState::Failure {
                    message: cause.message,
                }
            }
            // fetch() never produces Pending; hold the splash if it shows up
            FetchOutcome::Pending => NavigationState::Splash,
        }
    }

    /// The advertised destination is best-effort content: anything short
    /// of a parseable URL answering 2xx falls back to the primary
    /// interface instead of surfacing an error.
    async fn validate_destination(&self, destination: String) -> NavigationState {
        let url = match Url::parse(&destination) {
            Ok(url) => url,
            Err(e) => {
                warn!("destination {:?} does not parse, falling back: {}", destination, e);
                return NavigationState::Primary;
            }
        };

        match self.transport.head(&url).await {
            Ok(status) if (200..=299).contains(&status) => {
                info!("destination reachable, handing off to the browser view");
                NavigationState::Browser { destination }
            }
            Ok(status) => {
                warn!("destination answered {}, falling back", status);
                NavigationState::Primary
            }
            Err(e) => {
                warn!("destination unreachable, falling back: {}", e);
                NavigationState::Primary
            }
        }
    }

    /// Publish a transition unless a newer cycle has started since
    fn publish(&self, cycle: u64, next: NavigationState) {
        if self.cycle.load(Ordering::SeqCst) != cycle {
            debug!("cycle {}: superseded, dropping {}", cycle, next);
            return;
        }
        self.state.send_replace(next);
    }
}
