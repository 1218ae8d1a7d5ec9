//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which starts a [`wiremock`] backend and wires an
//! [`ApiClient`] to it with an in-memory token store and a navigator whose
//! redirects can be inspected.

#![allow(dead_code)]

use std::sync::Arc;

use marquee::session::{ApiClient, MemoryTokenStore, Navigator, TokenStore};
use parking_lot::Mutex;
use wiremock::MockServer;

/// Navigator that records every redirect it is asked to perform.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

/// A mock backend plus a client pointed at it.
pub struct TestHarness {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

impl TestHarness {
    /// Harness with no session token stored.
    pub async fn new() -> Self {
        Self::build(MemoryTokenStore::new()).await
    }

    /// Harness with `token` already stored.
    pub async fn with_token(token: &str) -> Self {
        Self::build(MemoryTokenStore::with_token(token)).await
    }

    async fn build(store: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::default());
        let client = ApiClient::new(
            format!("{}/api", server.uri()),
            store.clone(),
            navigator.clone(),
        )
        .expect("mock server URI is a valid base URL");

        Self {
            server,
            store,
            navigator,
            client: Arc::new(client),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }
}
