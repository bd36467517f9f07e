use async_trait::async_trait;

use super::TokenRefresher;
use crate::domain::auth::{CredentialPair, RefreshError, RefreshTokenRequest};

pub const DEFAULT_REFRESH_TOKEN_PATH: &str = "/v1/auth/refresh-token";

/// HTTP client for the remote token-refresh endpoint
pub struct RefreshTokenClient {
    refresh_url: String,
    http_client: reqwest::Client,
}

impl RefreshTokenClient {
    pub fn new(base_url: &str, refresh_path: &str, http_client: reqwest::Client) -> Self {
        Self {
            refresh_url: format!("{}{}", base_url.trim_end_matches('/'), refresh_path),
            http_client,
        }
    }

    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }
}

#[async_trait]
impl TokenRefresher for RefreshTokenClient {
    /// Exchange the refresh credential for a new pair
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        let response = self
            .http_client
            .post(&self.refresh_url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RefreshError::Transport(format!("Token refresh request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RefreshError::Rejected(format!(
                "Token refresh failed with status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json::<CredentialPair>()
            .await
            .map_err(|e| RefreshError::Rejected(format!("Failed to parse refresh response: {}", e)))
    }
}
