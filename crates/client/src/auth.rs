//! aCommerce authentication module.
//!
//! Exchanges a username and API key for a subject token at the identity
//! endpoint and keeps it in the injected [`TokenCache`] until it goes stale.
//!
//! # Failure semantics
//!
//! A rejection from the identity endpoint (any 4xx) is not an error here: the
//! token manager yields `Ok(None)` and caches nothing. Requests made without a
//! token are rejected by the resource endpoint and surface as
//! [`AcommerceError::Unauthorized`] on that call instead.

use std::time::Duration;

use acommerce_core::Endpoint;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::cache::TokenCache;
use crate::config::{AcommerceConfig, Credentials};
use crate::error::{AcommerceError, truncate_body};

/// Token issuance path on the identity root.
const TOKEN_PATH: &str = "identity/token";

/// Request body for the identity endpoint.
#[derive(Serialize)]
struct AuthRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthBody<'a> {
    api_key_credentials: ApiKeyCredentials<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiKeyCredentials<'a> {
    username: &'a str,
    api_key: &'a str,
}

/// Response from the identity endpoint.
#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<IssuedToken>,
}

#[derive(Deserialize)]
struct IssuedToken {
    #[serde(default)]
    token_id: Option<String>,
}

/// Obtains subject tokens and caches them per credential pair.
///
/// There is no lock around refresh: concurrent callers holding the same
/// credentials may each authenticate once when the entry is stale. The last
/// write wins.
#[derive(Clone)]
pub struct TokenManager<C> {
    http: reqwest::Client,
    token_url: String,
    credentials: Credentials,
    ttl: Duration,
    cache: C,
}

impl<C: TokenCache> TokenManager<C> {
    /// Create a token manager for the credentials in `config`.
    pub fn new(http: reqwest::Client, config: &AcommerceConfig, cache: C) -> Self {
        Self {
            http,
            token_url: format!("{}/{TOKEN_PATH}", config.base_url(Endpoint::Identity)),
            credentials: config.credentials.clone(),
            ttl: config.token_ttl,
            cache,
        }
    }

    /// Credentials this manager authenticates with.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The cache this manager reads from and writes to.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Get a usable token, authenticating when the cache has none.
    ///
    /// Returns `Ok(None)` when the identity endpoint rejects the credentials.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError::Network` on transport failures and
    /// `AcommerceError::Auth` when the identity endpoint fails without
    /// rejecting the credentials (5xx, unreadable body).
    #[instrument(skip(self), fields(username = %self.credentials.username))]
    pub async fn token(&self) -> Result<Option<SecretString>, AcommerceError> {
        let key = self.credentials.cache_key();

        if let Some(cached) = self.cache.get(&key).await {
            if !cached.is_expired() {
                debug!("Token cache hit");
                return Ok(Some(cached.token));
            }
            debug!("Cached token expired");
        }

        let Some(token) = self.authenticate().await? else {
            return Ok(None);
        };

        self.cache.put(key, token.clone(), self.ttl).await;
        debug!(ttl_secs = self.ttl.as_secs(), "Token cached");

        Ok(Some(token))
    }

    /// Drop the cached token so the next call authenticates again.
    #[instrument(skip(self), fields(username = %self.credentials.username))]
    pub async fn forget(&self) {
        self.cache.remove(&self.credentials.cache_key()).await;
    }

    /// Authenticate with the identity endpoint, bypassing the cache.
    ///
    /// Returns `Ok(None)` if the credentials are rejected or the response
    /// carries no token.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError::Network` on transport failures and
    /// `AcommerceError::Auth` on server errors or an undecodable success body.
    #[instrument(skip(self), fields(username = %self.credentials.username))]
    pub async fn authenticate(&self) -> Result<Option<SecretString>, AcommerceError> {
        let response = self
            .http
            .post(&self.token_url)
            .json(&AuthRequest {
                auth: AuthBody {
                    api_key_credentials: ApiKeyCredentials {
                        username: &self.credentials.username,
                        api_key: self.credentials.api_key.expose_secret(),
                    },
                },
            })
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let auth_response: AuthResponse = serde_json::from_str(&body).map_err(|e| {
                AcommerceError::Auth(format!("unreadable identity response: {e}"))
            })?;

            let token_id = auth_response.token.and_then(|t| t.token_id);
            if token_id.is_none() {
                warn!("Identity endpoint returned no token_id");
            }
            Ok(token_id.map(SecretString::from))
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                "aCommerce rejected credentials"
            );
            Ok(None)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(AcommerceError::Auth(format!(
                "HTTP {status}: {}",
                truncate_body(&error_text)
            )))
        }
    }
}

impl<C> std::fmt::Debug for TokenManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
