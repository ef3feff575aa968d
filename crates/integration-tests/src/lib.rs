//! Integration tests for the aCommerce client.
//!
//! Every test runs against a local `wiremock` server standing in for all
//! three aCommerce roots, so no credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p acommerce-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `token_cache` - Token issuance, caching and expiry
//! - `inventory_pagination` - Full inventory scans and their guards
//! - `orders_shipping` - Sales and shipping order round trips
//! - `environment` - Production/sandbox host selection

#![cfg_attr(not(test), forbid(unsafe_code))]

use acommerce_client::{
    AcommerceClient, AcommerceConfig, Credentials, Environment, MemoryTokenCache, TokenCache,
};
use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Username used by [`MockAcommerce`] clients.
pub const USERNAME: &str = "np-ops";
/// API key used by [`MockAcommerce`] clients.
pub const API_KEY: &str = "k3y";

/// A mock aCommerce deployment.
pub struct MockAcommerce {
    pub server: MockServer,
}

impl MockAcommerce {
    /// Start a server with nothing mounted.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Start a server whose identity endpoint issues `token`.
    pub async fn with_token(token: &str) -> Self {
        let mock = Self::start().await;
        mock.issue_token(token, None).await;
        mock
    }

    /// Mount an identity endpoint that issues `token`, at most `times` times
    /// if given.
    pub async fn issue_token(&self, token: &str, times: Option<u64>) {
        let mock = Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": { "token_id": token }
            })));
        let mock = match times {
            Some(times) => mock.expect(times),
            None => mock,
        };
        mock.mount(&self.server).await;
    }

    /// Sandbox configuration with every root pointed at this server.
    pub fn config(&self) -> AcommerceConfig {
        AcommerceConfig::new(Credentials::new(
            USERNAME,
            SecretString::from(API_KEY),
            Environment::Sandbox,
        ))
        .with_all_base_urls(&self.server.uri())
    }

    /// Client with a fresh map-backed cache.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub fn client(&self) -> AcommerceClient<MemoryTokenCache> {
        self.client_with_cache(self.config(), MemoryTokenCache::new())
    }

    /// Client with a caller-supplied config and cache.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[allow(clippy::expect_used)]
    pub fn client_with_cache<C: TokenCache + Clone>(
        &self,
        config: AcommerceConfig,
        cache: C,
    ) -> AcommerceClient<C> {
        AcommerceClient::with_cache(config, cache).expect("Failed to build aCommerce client")
    }

    /// Number of requests received on `path`.
    pub async fn hits(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }
}
