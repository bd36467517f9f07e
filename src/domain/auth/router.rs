use reqwest::StatusCode;
use std::sync::Arc;

use crate::domain::navigation::{Destination, Navigator};

/// Classification of an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 403: valid credential, insufficient privilege
    AuthorizationFailure,
    /// 401 on a request that has not been replayed yet
    AuthenticationExpiry,
    /// 401 on a request that was already replayed once
    UnrecoverableAuthentication,
    /// Anything else
    Generic,
}

/// Post-receive hook that classifies responses and fires the forbidden redirect
pub struct FailureRouter {
    navigator: Arc<dyn Navigator>,
}

impl FailureRouter {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Pure classification. `None` means the response is not a failure.
    pub fn classify(status: StatusCode, retried: bool) -> Option<FailureClass> {
        if status.is_success() || status.is_informational() || status.is_redirection() {
            return None;
        }

        let class = match status {
            StatusCode::FORBIDDEN => FailureClass::AuthorizationFailure,
            StatusCode::UNAUTHORIZED if retried => FailureClass::UnrecoverableAuthentication,
            StatusCode::UNAUTHORIZED => FailureClass::AuthenticationExpiry,
            _ => FailureClass::Generic,
        };

        Some(class)
    }

    /// Classify and run the side effect owned by the router.
    ///
    /// Authentication expiry is left to the refresh coordinator.
    pub fn route(&self, status: StatusCode, retried: bool) -> Option<FailureClass> {
        let class = Self::classify(status, retried)?;

        match class {
            FailureClass::AuthorizationFailure => {
                tracing::warn!(status = %status.as_u16(), "Authorization denied");
                self.navigator.navigate(Destination::Forbidden);
            }
            FailureClass::UnrecoverableAuthentication => {
                tracing::warn!("Authentication failed again after refresh, giving up");
            }
            FailureClass::AuthenticationExpiry | FailureClass::Generic => {}
        }

        Some(class)
    }
}
