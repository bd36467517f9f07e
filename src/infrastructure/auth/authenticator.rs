use reqwest::RequestBuilder;
use std::sync::Arc;

use super::request_id::{RequestId, X_REQUEST_ID};
use crate::infrastructure::repositories::{CredentialKey, CredentialStore};

/// Pre-send hook that stamps outgoing requests with the access credential
pub struct RequestAuthenticator {
    store: Arc<dyn CredentialStore>,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Access credential currently in the store
    pub fn current_token(&self) -> Option<String> {
        self.store.get(CredentialKey::AccessToken)
    }

    /// Attach `Authorization: Bearer <token>` and the request id.
    ///
    /// Without a token the request goes out unauthenticated and the server's
    /// 401 is handled by the failure router.
    pub fn authenticate(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
        request_id: &RequestId,
    ) -> RequestBuilder {
        let builder = builder.header(X_REQUEST_ID, request_id.as_str());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}
