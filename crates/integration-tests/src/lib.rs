//! End-to-end tests for the QuickCart storefront.
//!
//! Each test starts its own in-process server on an ephemeral port, backed
//! by an in-memory store and zero simulated latency, and talks to it over
//! HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart` - Cart mutations, coupon and pricing
//! - `checkout` - Checkout gating, order placement, validation
//! - `recurring` - Auth-gated recurring items

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use quickcart_storefront::catalog::Catalog;
use quickcart_storefront::config::StorefrontConfig;
use quickcart_storefront::state::AppState;
use quickcart_storefront::storage::{KeyValueStore, MemoryStore};
use reqwest::{Client, Response, redirect};
use serde_json::Value;
use tokio::net::TcpListener;

/// A storefront served on `127.0.0.1` for the lifetime of the test.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    server: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the catalog fails to load or the listener cannot bind.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let config = StorefrontConfig {
            auth_latency: Duration::ZERO,
            order_latency: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = AppState::new(config, Catalog::embedded().unwrap(), &store).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = quickcart_storefront::app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are asserted on, not followed.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: format!("http://{addr}"),
            client,
            server,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// POST `body` as JSON to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    #[allow(clippy::unwrap_used)]
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// DELETE `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails to send.
    #[allow(clippy::unwrap_used)]
    pub async fn delete(&self, path: &str) -> Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Parse a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
#[allow(clippy::unwrap_used)]
pub async fn json(response: Response) -> Value {
    response.json().await.unwrap()
}

/// Read a decimal serialized as a JSON string.
///
/// # Panics
///
/// Panics if the value is not a decimal string.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}
