use console_gateway::domain::auth::CredentialPair;
use console_gateway::domain::navigation::{Destination, Navigator};
use console_gateway::infrastructure::config::Config;
use console_gateway::infrastructure::http::ApiGateway;
use console_gateway::infrastructure::repositories::{CredentialStore, MemoryCredentialStore};
use parking_lot::Mutex;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod stub_api;

use stub_api::StubApi;

/// Navigator that remembers every redirect
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Destination> {
        self.visited.lock().clone()
    }

    pub fn count(&self, destination: Destination) -> usize {
        self.visited.lock().iter().filter(|d| **d == destination).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.visited.lock().push(destination);
    }
}

pub struct TestContext {
    pub api: Arc<StubApi>,
    pub base_url: String,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub gateway: Arc<ApiGateway>,
}

impl TestContext {
    /// A second gateway over the same stub API, backed by the given store
    pub fn gateway_with_store(&self, store: Arc<dyn CredentialStore>) -> ApiGateway {
        let config = Config::for_base_url(&self.base_url);
        ApiGateway::from_config(&config, store, self.navigator.clone())
            .expect("Failed to build gateway")
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let api = Arc::new(StubApi::new());

            // Start stub API
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            let app = api
                .router()
                .layer(tower_http::trace::TraceLayer::new_for_http());
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Console starts signed in with the pair the stub honours
            let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new(
                "T1", "R1",
            )));
            let navigator = Arc::new(RecordingNavigator::default());

            let config = Config::for_base_url(&base_url);
            let gateway = ApiGateway::from_config(&config, store.clone(), navigator.clone())
                .expect("Failed to build gateway");

            Self {
                api,
                base_url,
                store,
                navigator,
                gateway: Arc::new(gateway),
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Stub server task ends with the test runtime
        }
    }
}
