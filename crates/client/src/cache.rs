//! Token cache abstraction.
//!
//! The client never owns a process-wide store. Callers inject a [`TokenCache`]
//! and decide how widely it is shared: one per client, one per process, or a
//! fake in tests.
//!
//! Two implementations ship with the crate:
//!
//! - [`MokaTokenCache`] - bounded in-memory cache with per-entry expiry (default)
//! - [`MemoryTokenCache`] - plain map behind a lock, handy for inspecting in tests

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

/// Upper bound on distinct credential pairs held by [`MokaTokenCache`].
const MAX_CACHED_CREDENTIALS: u64 = 1000;

/// Cache key derived from a username and API key.
///
/// Plain concatenation, not a hash. Implements `Debug` manually because the
/// key embeds the API key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for the given credential pair.
    #[must_use]
    pub fn for_credentials(username: &str, api_key: &SecretString) -> Self {
        Self(format!("acommerce-{username}{}", api_key.expose_secret()))
    }

    /// Raw key, for caches that persist outside the process.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CacheKey([REDACTED])")
    }
}

/// A token together with the instant it stops being usable.
#[derive(Clone)]
pub struct CachedToken {
    /// Value sent as `X-Subject-Token`.
    pub token: SecretString,
    /// When the cache entry goes stale.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Token that expires `ttl` from now.
    #[must_use]
    pub fn new(token: SecretString, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { token, expires_at }
    }

    /// Whether the entry has gone stale.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time left before expiry, zero when already stale.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Key-value store for issued tokens with get / put-with-ttl semantics.
///
/// Implementations must be cheap to share; the client calls them on every
/// request. Expired entries may still be returned, the client checks
/// [`CachedToken::is_expired`] itself.
pub trait TokenCache: Send + Sync {
    /// Look up the token for `key`.
    fn get(&self, key: &CacheKey) -> impl Future<Output = Option<CachedToken>> + Send;

    /// Store `token` under `key` for `ttl`, replacing any previous entry.
    fn put(
        &self,
        key: CacheKey,
        token: SecretString,
        ttl: Duration,
    ) -> impl Future<Output = ()> + Send;

    /// Drop the entry for `key`, if any.
    fn remove(&self, key: &CacheKey) -> impl Future<Output = ()> + Send;
}

impl<T: TokenCache> TokenCache for Arc<T> {
    fn get(&self, key: &CacheKey) -> impl Future<Output = Option<CachedToken>> + Send {
        (**self).get(key)
    }

    fn put(
        &self,
        key: CacheKey,
        token: SecretString,
        ttl: Duration,
    ) -> impl Future<Output = ()> + Send {
        (**self).put(key, token, ttl)
    }

    fn remove(&self, key: &CacheKey) -> impl Future<Output = ()> + Send {
        (**self).remove(key)
    }
}

// =============================================================================
// MokaTokenCache
// =============================================================================

/// Expire each entry at its own `expires_at`.
struct TokenExpiry;

impl Expiry<CacheKey, CachedToken> for TokenExpiry {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CachedToken,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.remaining())
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CachedToken,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.remaining())
    }
}

/// In-memory token cache backed by `moka`.
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct MokaTokenCache {
    cache: Cache<CacheKey, CachedToken>,
}

impl MokaTokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHED_CREDENTIALS)
            .expire_after(TokenExpiry)
            .build();
        Self { cache }
    }
}

impl Default for MokaTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MokaTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaTokenCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl TokenCache for MokaTokenCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedToken> {
        self.cache.get(key).await
    }

    async fn put(&self, key: CacheKey, token: SecretString, ttl: Duration) {
        self.cache.insert(key, CachedToken::new(token, ttl)).await;
    }

    async fn remove(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }
}

// =============================================================================
// MemoryTokenCache
// =============================================================================

/// Map-backed token cache.
///
/// Entries are never evicted; staleness is left to the caller. Cloning shares
/// the underlying map.
#[derive(Clone, Default)]
pub struct MemoryTokenCache {
    entries: Arc<RwLock<HashMap<CacheKey, CachedToken>>>,
}

impl MemoryTokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for MemoryTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenCache").finish_non_exhaustive()
    }
}

impl TokenCache for MemoryTokenCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedToken> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: CacheKey, token: SecretString, ttl: Duration) {
        self.entries
            .write()
            .await
            .insert(key, CachedToken::new(token, ttl));
    }

    async fn remove(&self, key: &CacheKey) {
        self.entries.write().await.remove(key);
    }
}
