pub mod refresh_token;

pub use refresh_token::RefreshTokenClient;

use crate::domain::auth::{CredentialPair, RefreshError};
use async_trait::async_trait;

/// Exchanges a refresh credential for a new credential pair.
///
/// The call must go out without the `Authorization` header of the
/// request pipeline.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError>;
}
