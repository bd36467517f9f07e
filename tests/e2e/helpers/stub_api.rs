use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const REFRESH_PATH: &str = "/v1/auth/refresh-token";

/// A request as the stub API saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

struct IssuedCredentials {
    access: String,
    refresh: Option<String>,
}

/// In-process stand-in for the console's remote API.
///
/// Starts out honouring the pair `(T1, R1)`; each successful refresh rotates
/// to `(T{n}, R{n})`.
pub struct StubApi {
    credentials: Mutex<IssuedCredentials>,
    generation: AtomicUsize,
    refresh_calls: AtomicUsize,
    refresh_fails: AtomicBool,
    refresh_delay: Mutex<Duration>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            credentials: Mutex::new(IssuedCredentials {
                access: "T1".to_string(),
                refresh: Some("R1".to_string()),
            }),
            generation: AtomicUsize::new(1),
            refresh_calls: AtomicUsize::new(0),
            refresh_fails: AtomicBool::new(false),
            refresh_delay: Mutex::new(Duration::from_millis(100)),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route(REFRESH_PATH, post(refresh_token))
            .route("/v1/students", get(list_students))
            .route("/v1/students/stubborn", get(always_unauthorized))
            .route("/v1/posts", post(create_post))
            .route("/v1/finances", get(forbidden))
            .route("/v1/documents/missing", get(missing_document))
            .with_state(self.clone())
    }

    /// Stop accepting the current access token
    pub fn expire_access_token(&self) {
        self.credentials.lock().access = "revoked".to_string();
    }

    pub fn reject_refresh(&self) {
        self.refresh_fails.store(true, Ordering::SeqCst);
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock() = delay;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }

    pub fn seen_on(&self, path: &str) -> Vec<SeenRequest> {
        self.seen().into_iter().filter(|r| r.path == path).collect()
    }

    fn record(&self, path: &str, headers: &HeaderMap) -> Option<String> {
        let authorization = header(headers, AUTHORIZATION.as_str());
        self.seen.lock().push(SeenRequest {
            path: path.to_string(),
            authorization: authorization.clone(),
            request_id: header(headers, "x-request-id"),
        });
        authorization
    }

    fn authorize(&self, path: &str, headers: &HeaderMap) -> Result<(), Response> {
        let authorization = self.record(path, headers);
        let credentials = self.credentials.lock();

        match authorization.as_deref().and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) if token == credentials.access => Ok(()),
            _ => Err(unauthorized()),
        }
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired" })),
    )
        .into_response()
}

async fn refresh_token(
    State(api): State<Arc<StubApi>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    api.refresh_calls.fetch_add(1, Ordering::SeqCst);
    api.record(REFRESH_PATH, &headers);

    let delay = *api.refresh_delay.lock();
    tokio::time::sleep(delay).await;

    let presented = body
        .get("refreshToken")
        .and_then(|v| v.as_str())
        .map(|v| v.to_string());

    let mut credentials = api.credentials.lock();
    if api.refresh_fails.load(Ordering::SeqCst) || presented != credentials.refresh {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
            .into_response();
    }

    let generation = api.generation.fetch_add(1, Ordering::SeqCst) + 1;
    credentials.access = format!("T{}", generation);
    credentials.refresh = Some(format!("R{}", generation));

    Json(json!({
        "accessToken": credentials.access,
        "refreshToken": credentials.refresh,
    }))
    .into_response()
}

async fn list_students(
    State(api): State<Arc<StubApi>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = api.authorize("/v1/students", &headers) {
        return response;
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "page": page,
        "items": [
            { "id": 1, "name": "Ana Souza", "university": "University of Toronto" },
            { "id": 2, "name": "Minh Tran", "university": "Monash University" }
        ]
    }))
    .into_response()
}

async fn always_unauthorized(State(api): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    api.record("/v1/students/stubborn", &headers);
    unauthorized()
}

async fn create_post(
    State(api): State<Arc<StubApi>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = api.authorize("/v1/posts", &headers) {
        return response;
    }
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn forbidden(State(api): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    if let Err(response) = api.authorize("/v1/finances", &headers) {
        return response;
    }
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "Insufficient privileges" })),
    )
        .into_response()
}

async fn missing_document(State(api): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    if let Err(response) = api.authorize("/v1/documents/missing", &headers) {
        return response;
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Document not found" })),
    )
        .into_response()
}
