/// Outcome of a failed refresh episode.
///
/// Cloned once per queued caller, so every variant carries owned data only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh credential stored")]
    NoRefreshCredential,
    #[error("refresh rejected: {0}")]
    Rejected(String),
    #[error("refresh transport error: {0}")]
    Transport(String),
    #[error("refresh timed out")]
    Timeout,
    #[error("refresh abandoned before completion")]
    Abandoned,
}

impl RefreshError {
    /// Whether this outcome ends the session (credentials are cleared).
    ///
    /// Any failure of the refresh call itself does; only a leader cancelled
    /// before the call settled leaves the session in place.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            RefreshError::Rejected(_) | RefreshError::Transport(_) | RefreshError::Timeout
        )
    }
}
