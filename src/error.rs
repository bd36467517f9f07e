use reqwest::StatusCode;

use crate::domain::auth::RefreshError;

/// Main gateway error type, surfaced to callers of the request pipeline
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Authentication expired")]
    AuthenticationExpired,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authorization denied")]
    AuthorizationDenied,

    /// The refresh call failed and the session was ended
    #[error("Refresh rejected: {0}")]
    RefreshRejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Get the HTTP status code the remote API answered with, if any
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::AuthenticationExpired | Self::RefreshRejected(_) => Some(StatusCode::UNAUTHORIZED),
            Self::AuthorizationDenied => Some(StatusCode::FORBIDDEN),
            Self::Status { status, .. } => Some(*status),
            Self::NotAuthenticated | Self::Transport(_) | Self::Decode(_) | Self::Internal(_) => {
                None
            }
        }
    }

    /// Whether the whole session is gone, not just this request
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::RefreshRejected(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<RefreshError> for GatewayError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::NoRefreshCredential => GatewayError::NotAuthenticated,
            RefreshError::Rejected(msg) => GatewayError::RefreshRejected(msg),
            RefreshError::Transport(_) | RefreshError::Timeout => {
                GatewayError::RefreshRejected(err.to_string())
            }
            RefreshError::Abandoned => GatewayError::Internal(err.to_string()),
        }
    }
}

/// Custom result type for the gateway
pub type GatewayResult<T> = Result<T, GatewayError>;
