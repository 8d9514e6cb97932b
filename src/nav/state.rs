//! Navigation states rendered by the presentation layer.

/// Where the user lands after a load cycle.
///
/// Every cycle starts at `Splash` and settles on exactly one of the other
/// three states; a retry starts a new cycle back at `Splash`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// Resolution in flight
    #[default]
    Splash,
    /// Local interface; no usable redirect was supplied
    Primary,
    /// Remote destination that answered the reachability check
    Browser { destination: String },
    /// The configuration service itself could not be consulted; the
    /// presentation layer shows the message and offers a retry
    Failure { message: String },
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationState::Splash => write!(f, "splash"),
            NavigationState::Primary => write!(f, "primary"),
            NavigationState::Browser { destination } => write!(f, "browser: {}", destination),
            NavigationState::Failure { message } => write!(f, "failure: {}", message),
        }
    }
}
