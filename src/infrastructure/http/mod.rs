pub mod request;
pub mod response;

pub use request::ApiRequest;
pub use response::ApiResponse;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::auth::{CredentialPair, FailureClass, FailureRouter, RefreshCoordinator};
use crate::domain::navigation::Navigator;
use crate::error::{GatewayError, GatewayResult};
use crate::infrastructure::auth::{RequestAuthenticator, RequestId};
use crate::infrastructure::config::Config;
use crate::infrastructure::oauth::{RefreshTokenClient, TokenRefresher};
use crate::infrastructure::repositories::{CredentialKey, CredentialStore};

/// Authenticated client for the console's remote API.
///
/// Every call goes through the same pipeline: stamp the access credential,
/// send, classify the response. An expired credential is recovered through
/// the shared [`RefreshCoordinator`] and the call is replayed once.
pub struct ApiGateway {
    base_url: String,
    http_client: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    authenticator: RequestAuthenticator,
    coordinator: Arc<RefreshCoordinator>,
    router: FailureRouter,
}

impl ApiGateway {
    pub fn new(
        base_url: &str,
        http_client: reqwest::Client,
        store: Arc<dyn CredentialStore>,
        coordinator: Arc<RefreshCoordinator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            authenticator: RequestAuthenticator::new(store.clone()),
            store,
            coordinator,
            router: FailureRouter::new(navigator),
        }
    }

    /// Wire the full pipeline against the configured API
    pub fn from_config(
        config: &Config,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> GatewayResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let refresher: Arc<dyn TokenRefresher> = Arc::new(RefreshTokenClient::new(
            &config.api_base_url,
            &config.refresh_token_path,
            http_client.clone(),
        ));
        let coordinator = Arc::new(
            RefreshCoordinator::new(store.clone(), refresher, navigator.clone())
                .with_refresh_timeout(config.refresh_timeout()),
        );

        Ok(Self::new(
            &config.api_base_url,
            http_client,
            store,
            coordinator,
            navigator,
        ))
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Store the pair obtained from a login
    pub fn sign_in(&self, pair: &CredentialPair) {
        self.store.set_pair(pair);
        tracing::info!("Signed in");
    }

    /// Explicit logout: forget both credentials
    pub fn sign_out(&self) {
        self.store.clear_all();
        tracing::info!("Signed out");
    }

    pub fn is_signed_in(&self) -> bool {
        self.store.get(CredentialKey::RefreshToken).is_some()
    }

    /// Run a request through the pipeline
    pub async fn execute(&self, mut request: ApiRequest) -> GatewayResult<ApiResponse> {
        let request_id = RequestId::generate();
        let mut token = self.authenticator.current_token();

        loop {
            let response = self.dispatch(&request, token.as_deref(), &request_id).await?;

            match self.router.route(response.status, request.is_retried()) {
                None => return Ok(response),
                Some(FailureClass::AuthorizationFailure) => {
                    return Err(GatewayError::AuthorizationDenied)
                }
                Some(FailureClass::UnrecoverableAuthentication) => {
                    return Err(GatewayError::AuthenticationExpired)
                }
                Some(FailureClass::Generic) => return Err(response.into_status_error()),
                Some(FailureClass::AuthenticationExpiry) => {
                    request.mark_retried();
                    let refreshed = self.coordinator.recover(token.as_deref()).await?;
                    tracing::debug!(
                        request_id = %request_id,
                        path = %request.path(),
                        "Replaying request with refreshed credential"
                    );
                    token = Some(refreshed);
                }
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        request_id: &RequestId,
    ) -> GatewayResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path());
        let mut builder = self.http_client.request(request.method().clone(), &url);

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let builder = self.authenticator.authenticate(builder, token, request_id);

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                method = %request.method(),
                path = %request.path(),
                error = %e,
                "Request failed before a response arrived"
            );
            GatewayError::from(e)
        })?;

        let response = ApiResponse::from_response(response).await?;

        tracing::debug!(
            request_id = %request_id,
            method = %request.method(),
            path = %request.path(),
            status = %response.status.as_u16(),
            retried = request.is_retried(),
            "Response received"
        );

        Ok(response)
    }

    pub async fn get(&self, path: &str) -> GatewayResult<ApiResponse> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.get(path).await?.json()
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> GatewayResult<ApiResponse> {
        self.execute(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> GatewayResult<ApiResponse> {
        self.execute(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> GatewayResult<ApiResponse> {
        self.execute(ApiRequest::patch(path).with_json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> GatewayResult<ApiResponse> {
        self.execute(ApiRequest::delete(path)).await
    }
}
