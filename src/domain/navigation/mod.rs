use serde::{Deserialize, Serialize};

/// Where the console is sent when the session or a request can't continue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// No refresh credential was available
    Login,
    /// The refresh credential was rejected
    SessionExpired,
    /// The server denied access to a resource
    Forbidden,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Login => write!(f, "login"),
            Destination::SessionExpired => write!(f, "session_expired"),
            Destination::Forbidden => write!(f, "forbidden"),
        }
    }
}

/// Navigation port injected into the pipeline.
///
/// Implementations must not block; they are called from inside request futures.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Route table for the three destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPaths {
    pub login: String,
    pub session_expired: String,
    pub forbidden: String,
}

impl NavigationPaths {
    pub fn path_for(&self, destination: Destination) -> &str {
        match destination {
            Destination::Login => &self.login,
            Destination::SessionExpired => &self.session_expired,
            Destination::Forbidden => &self.forbidden,
        }
    }
}

impl Default for NavigationPaths {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            session_expired: "/session-expired".to_string(),
            forbidden: "/forbidden".to_string(),
        }
    }
}

/// Navigator that only reports the redirect, used by the CLI
pub struct LoggingNavigator {
    paths: NavigationPaths,
}

impl LoggingNavigator {
    pub fn new(paths: NavigationPaths) -> Self {
        Self { paths }
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, destination: Destination) {
        tracing::warn!(
            destination = %destination,
            path = %self.paths.path_for(destination),
            "Navigating away from current view"
        );
    }
}
