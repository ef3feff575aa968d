//! aCommerce REST API client.
//!
//! Every request asks the [`TokenManager`] for a subject token, attaches it as
//! `X-Subject-Token`, and maps the response to either a decoded value or an
//! [`AcommerceError`].

use std::sync::Arc;

use acommerce_core::Endpoint;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::TokenManager;
use crate::cache::{MokaTokenCache, TokenCache};
use crate::config::{AcommerceConfig, Credentials};
use crate::error::{AcommerceError, truncate_body};

/// Header carrying the subject token on authenticated requests.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// aCommerce API client.
///
/// Cheap to clone; clones share the HTTP connection pool and token cache.
///
/// # Authentication
///
/// Tokens are fetched lazily on the first request and kept in the cache `C`
/// for the configured TTL.
#[derive(Clone)]
pub struct AcommerceClient<C = MokaTokenCache> {
    inner: Arc<AcommerceClientInner<C>>,
}

struct AcommerceClientInner<C> {
    client: reqwest::Client,
    config: AcommerceConfig,
    tokens: TokenManager<C>,
}

impl AcommerceClient<MokaTokenCache> {
    /// Create a client with its own in-memory token cache.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the user agent is
    /// not a valid header value.
    pub fn new(config: AcommerceConfig) -> Result<Self, AcommerceError> {
        Self::with_cache(config, MokaTokenCache::new())
    }
}

impl<C: TokenCache + Clone> AcommerceClient<C> {
    /// Create a client that stores tokens in `cache`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the user agent is
    /// not a valid header value.
    pub fn with_cache(config: AcommerceConfig, cache: C) -> Result<Self, AcommerceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| AcommerceError::InvalidHeader(format!("user agent: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for aCommerce requests");
        }

        Ok(Self::from_parts(client, config, cache))
    }

    /// Same endpoints, HTTP pool and cache, different account.
    ///
    /// The new credentials get their own cache key, so tokens never leak
    /// between accounts.
    #[must_use]
    pub fn with_credentials(
        &self,
        username: impl Into<String>,
        api_key: impl Into<SecretString>,
    ) -> Self {
        let mut config = self.inner.config.clone();
        config.credentials =
            Credentials::new(username, api_key, self.inner.config.environment());

        Self::from_parts(
            self.inner.client.clone(),
            config,
            self.inner.tokens.cache().clone(),
        )
    }

    fn from_parts(client: reqwest::Client, config: AcommerceConfig, cache: C) -> Self {
        let tokens = TokenManager::new(client.clone(), &config, cache);
        Self {
            inner: Arc::new(AcommerceClientInner {
                client,
                config,
                tokens,
            }),
        }
    }
}

impl<C: TokenCache> AcommerceClient<C> {
    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &AcommerceConfig {
        &self.inner.config
    }

    /// Token manager used for every request.
    #[must_use]
    pub fn tokens(&self) -> &TokenManager<C> {
        &self.inner.tokens
    }

    /// Get the current subject token, authenticating if needed.
    ///
    /// Returns `Ok(None)` when the credentials are rejected.
    ///
    /// # Errors
    ///
    /// See [`TokenManager::token`].
    pub async fn token(&self) -> Result<Option<SecretString>, AcommerceError> {
        self.inner.tokens.token().await
    }

    /// Absolute URL for `path` on `endpoint`.
    #[must_use]
    pub fn url(&self, endpoint: Endpoint, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.config.base_url(endpoint),
            path.trim_start_matches('/')
        )
    }

    /// Send a request and decode the JSON response.
    ///
    /// An empty success body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns `AcommerceError::Unauthorized` for 401/403,
    /// `AcommerceError::NotFound` for 404, `AcommerceError::Http` for any
    /// other non-success status, `AcommerceError::Network` on transport
    /// failures and `AcommerceError::Parse` if the body does not decode as `T`.
    pub async fn send<T, B>(
        &self,
        method: Method,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, AcommerceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.execute(method, endpoint, path, query, body).await?;
        decode_json(response).await
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`AcommerceClient::send`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<T, AcommerceError> {
        self.send::<T, ()>(Method::GET, endpoint, path, &[], None).await
    }

    /// `PUT` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`AcommerceClient::send`].
    pub async fn put<T, B>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &B,
    ) -> Result<T, AcommerceError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::PUT, endpoint, path, &[], Some(body)).await
    }

    /// Send an authenticated request and return the successful response.
    ///
    /// When no token is available the request goes out without
    /// `X-Subject-Token` and the endpoint's rejection is returned as
    /// `AcommerceError::Unauthorized`.
    #[instrument(skip(self, query, body))]
    pub(crate) async fn execute<B>(
        &self,
        method: Method,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, AcommerceError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let token = self.inner.tokens.token().await?;

        let mut request = self
            .inner
            .client
            .request(method, self.url(endpoint, path));

        if let Some(token) = token {
            request = request.header(SUBJECT_TOKEN_HEADER, subject_token_header(&token)?);
        } else {
            debug!("No subject token available, sending unauthenticated request");
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status(response).await
    }
}

impl<C> std::fmt::Debug for AcommerceClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcommerceClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Build a sensitive header value from the token.
fn subject_token_header(token: &SecretString) -> Result<HeaderValue, AcommerceError> {
    let mut value = HeaderValue::from_str(token.expose_secret())
        .map_err(|e| AcommerceError::InvalidHeader(format!("subject token: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Pass success responses through, turn everything else into an error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AcommerceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .map(|text| truncate_body(&text))
        .unwrap_or_default();

    tracing::error!(
        status = %status,
        body = %body,
        "aCommerce API returned non-success status"
    );

    let status = status.as_u16();
    Err(match status {
        401 | 403 => AcommerceError::Unauthorized { status, body },
        404 => AcommerceError::NotFound(body),
        _ => AcommerceError::Http { status, body },
    })
}

/// Decode a JSON body, treating an empty body as `null`.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AcommerceError> {
    let text = response.text().await?;
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };

    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate_body(text),
            "Failed to parse aCommerce response"
        );
        AcommerceError::Parse(e)
    })
}
