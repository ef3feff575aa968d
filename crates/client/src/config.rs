//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACOM_USERNAME` - aCommerce API username
//! - `ACOM_APIKEY` - aCommerce API key
//!
//! ## Optional
//! - `ACOM_PRODUCTION` - `true` for production hosts, `false` for sandbox (default: true)
//! - `ACOM_CACHE_DURATION` - Token cache lifetime in seconds (default: 7200)
//! - `ACOM_USER_AGENT` - `User-Agent` sent with every request
//!   (default: `APP_NAME`, then `acommerce-rs`)
//! - `ACOM_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `ACOM_MAX_PAGES` - Upper bound on pages fetched by a full inventory scan (default: 1000)
//! - `ACOM_ACCEPT_INVALID_CERTS` - Skip TLS certificate verification (default: false)
//!
//! ## Optional (base URL overrides)
//! - `ACOM_IDENTITY_URL` - Identity root (token issuance)
//! - `ACOM_FULFILLMENT_URL` - Fulfillment root (merchants, inventory, sales orders)
//! - `ACOM_SHIPPING_URL` - Shipping root (shipping orders)

use std::time::Duration;

use acommerce_core::{Endpoint, Environment};
use secrecy::SecretString;
use thiserror::Error;

use crate::cache::CacheKey;

/// Default token lifetime: two hours from the moment of caching.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_PAGES: u32 = 1000;
const DEFAULT_USER_AGENT: &str = "acommerce-rs";

/// Fragments that show up in copy-pasted sample credentials (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API credentials for one aCommerce account.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct Credentials {
    /// API username
    pub username: String,
    /// API key
    pub api_key: SecretString,
    /// Production or sandbox
    pub environment: Environment,
}

impl Credentials {
    /// Create credentials for `environment`.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<SecretString>,
        environment: Environment,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            environment,
        }
    }

    /// Deterministic token cache key for this username and key.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_credentials(&self.username, &self.api_key)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Per-endpoint base URL overrides.
#[derive(Debug, Clone, Default)]
pub struct BaseUrlOverrides {
    pub identity: Option<String>,
    pub fulfillment: Option<String>,
    pub shipping: Option<String>,
}

impl BaseUrlOverrides {
    const fn get(&self, endpoint: Endpoint) -> Option<&String> {
        match endpoint {
            Endpoint::Identity => self.identity.as_ref(),
            Endpoint::Fulfillment => self.fulfillment.as_ref(),
            Endpoint::Shipping => self.shipping.as_ref(),
        }
    }

    const fn slot(&mut self, endpoint: Endpoint) -> &mut Option<String> {
        match endpoint {
            Endpoint::Identity => &mut self.identity,
            Endpoint::Fulfillment => &mut self.fulfillment,
            Endpoint::Shipping => &mut self.shipping,
        }
    }
}

/// aCommerce client configuration.
#[derive(Debug, Clone)]
pub struct AcommerceConfig {
    /// Account credentials and environment
    pub credentials: Credentials,
    /// How long an issued token is cached
    pub token_ttl: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum pages fetched by a full inventory scan
    pub max_pages: u32,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Base URL overrides (tests, staging proxies)
    pub base_urls: BaseUrlOverrides,
}

impl AcommerceConfig {
    /// Configuration with defaults for everything but the credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token_ttl: DEFAULT_TOKEN_TTL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
            accept_invalid_certs: false,
            base_urls: BaseUrlOverrides::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required =
            |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let username = required("ACOM_USERNAME")?;
        let api_key = required("ACOM_APIKEY")?;
        warn_if_placeholder(&api_key, "ACOM_APIKEY");

        let production = parse_or(&lookup, "ACOM_PRODUCTION", true, parse_bool)?;
        let environment = Environment::from_production_flag(production);

        let mut config = Self::new(Credentials::new(username, api_key, environment));
        config.token_ttl = Duration::from_secs(parse_or(
            &lookup,
            "ACOM_CACHE_DURATION",
            DEFAULT_TOKEN_TTL.as_secs(),
            |s| s.parse::<u64>().map_err(|e| e.to_string()),
        )?);
        config.timeout = Duration::from_secs(parse_or(
            &lookup,
            "ACOM_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
            |s| s.parse::<u64>().map_err(|e| e.to_string()),
        )?);
        config.max_pages = parse_or(&lookup, "ACOM_MAX_PAGES", DEFAULT_MAX_PAGES, |s| {
            match s.parse::<u32>() {
                Ok(0) => Err("must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(e) => Err(e.to_string()),
            }
        })?;
        config.accept_invalid_certs =
            parse_or(&lookup, "ACOM_ACCEPT_INVALID_CERTS", false, parse_bool)?;
        config.user_agent = lookup("ACOM_USER_AGENT")
            .or_else(|| lookup("APP_NAME"))
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        for (endpoint, key) in [
            (Endpoint::Identity, "ACOM_IDENTITY_URL"),
            (Endpoint::Fulfillment, "ACOM_FULFILLMENT_URL"),
            (Endpoint::Shipping, "ACOM_SHIPPING_URL"),
        ] {
            if let Some(raw) = lookup(key) {
                url::Url::parse(&raw)
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
                *config.base_urls.slot(endpoint) = Some(raw);
            }
        }

        Ok(config)
    }

    /// Point `endpoint` at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, endpoint: Endpoint, url: impl Into<String>) -> Self {
        *self.base_urls.slot(endpoint) = Some(url.into());
        self
    }

    /// Point all three endpoints at the same base URL.
    #[must_use]
    pub fn with_all_base_urls(self, url: &str) -> Self {
        Endpoint::ALL
            .into_iter()
            .fold(self, |config, endpoint| config.with_base_url(endpoint, url))
    }

    /// Returns the configured environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.credentials.environment
    }

    /// Base URL for `endpoint`, without a trailing slash.
    #[must_use]
    pub fn base_url(&self, endpoint: Endpoint) -> &str {
        self.base_urls
            .get(endpoint)
            .map_or_else(
                || self.environment().base_url(endpoint),
                String::as_str,
            )
            .trim_end_matches('/')
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| {
        parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
    })
}

/// Log a warning when a secret looks like a sample value.
fn warn_if_placeholder(secret: &str, var_name: &str) {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        tracing::warn!("{var_name} appears to be a placeholder (contains '{pattern}')");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y-9f2a"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.username, "np-ops");
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.token_ttl, Duration::from_secs(7200));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.user_agent, "acommerce-rs");
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_missing_username() {
        let result = AcommerceConfig::from_lookup(lookup_from(&[("ACOM_APIKEY", "k3y")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ACOM_USERNAME"));
    }

    #[test]
    fn test_sandbox_flag_selects_sandbox_hosts() {
        let config = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("ACOM_PRODUCTION", "false"),
        ]))
        .unwrap();

        assert_eq!(config.environment(), Environment::Sandbox);
        for endpoint in Endpoint::ALL {
            assert!(config.base_url(endpoint).ends_with("acommercedev.com"));
        }
    }

    #[test]
    fn test_invalid_boolean() {
        let result = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("ACOM_PRODUCTION", "maybe"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref v, _)) if v == "ACOM_PRODUCTION"
        ));
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let result = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("ACOM_MAX_PAGES", "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref v, _)) if v == "ACOM_MAX_PAGES"
        ));
    }

    #[test]
    fn test_user_agent_falls_back_to_app_name() {
        let config = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("APP_NAME", "Naked Pineapple"),
        ]))
        .unwrap();
        assert_eq!(config.user_agent, "Naked Pineapple");
    }

    #[test]
    fn test_base_url_override_and_trailing_slash() {
        let config = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("ACOM_SHIPPING_URL", "http://127.0.0.1:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(Endpoint::Shipping), "http://127.0.0.1:9000");
        assert_eq!(
            config.base_url(Endpoint::Identity),
            "https://api.acommerce.asia"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = AcommerceConfig::from_lookup(lookup_from(&[
            ("ACOM_USERNAME", "np-ops"),
            ("ACOM_APIKEY", "k3y"),
            ("ACOM_IDENTITY_URL", "not a url"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref v, _)) if v == "ACOM_IDENTITY_URL"
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_api_key() {
        let credentials = Credentials::new(
            "np-ops",
            SecretString::from("super_secret_api_key"),
            Environment::Sandbox,
        );

        let debug_output = format!("{credentials:?}");

        assert!(debug_output.contains("np-ops"));
        assert!(debug_output.contains("Sandbox"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool(" 0 "), Ok(false));
        assert!(parse_bool("").is_err());
    }
}
