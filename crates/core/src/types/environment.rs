//! API environments and endpoint roots.
//!
//! aCommerce runs separate production and sandbox hosts for each of its
//! three API roots. A single environment flag selects all three at once.

use serde::{Deserialize, Serialize};

/// Which aCommerce deployment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live hosts under `acommerce.asia`.
    #[default]
    Production,
    /// Development hosts under `acommercedev.com`.
    Sandbox,
}

impl Environment {
    /// Select an environment from the boolean "production" flag.
    #[must_use]
    pub const fn from_production_flag(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    /// Whether this is the production environment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Base URL of `endpoint` in this environment (no trailing slash).
    #[must_use]
    pub const fn base_url(self, endpoint: Endpoint) -> &'static str {
        match (self, endpoint) {
            (Self::Production, Endpoint::Identity) => "https://api.acommerce.asia",
            (Self::Production, Endpoint::Fulfillment) => "https://fulfillment.api.acommerce.asia",
            (Self::Production, Endpoint::Shipping) => "https://shipping.api.acommerce.asia",
            (Self::Sandbox, Endpoint::Identity) => "https://api.acommercedev.com",
            (Self::Sandbox, Endpoint::Fulfillment) => "https://fulfillment.api.acommercedev.com",
            (Self::Sandbox, Endpoint::Shipping) => "https://shipping.api.acommercedev.com",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// Error returned when a string names no known [`Environment`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid environment: {0} (expected `production` or `sandbox`)")]
pub struct ParseEnvironmentError(String);

impl std::str::FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// One of the three aCommerce API roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Token issuance (`identity/token`).
    Identity,
    /// Merchants, inventory allocation and sales orders.
    Fulfillment,
    /// Shipping orders.
    Shipping,
}

impl Endpoint {
    /// All endpoints, in a fixed order.
    pub const ALL: [Self; 3] = [Self::Identity, Self::Fulfillment, Self::Shipping];
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Fulfillment => write!(f, "fulfillment"),
            Self::Shipping => write!(f, "shipping"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_uses_only_sandbox_hosts() {
        for endpoint in Endpoint::ALL {
            let url = Environment::Sandbox.base_url(endpoint);
            assert!(url.ends_with("acommercedev.com"), "{endpoint}: {url}");
        }
    }

    #[test]
    fn test_production_uses_only_production_hosts() {
        for endpoint in Endpoint::ALL {
            let url = Environment::Production.base_url(endpoint);
            assert!(url.ends_with("acommerce.asia"), "{endpoint}: {url}");
        }
    }

    #[test]
    fn test_from_production_flag() {
        assert_eq!(Environment::from_production_flag(true), Environment::Production);
        assert_eq!(Environment::from_production_flag(false), Environment::Sandbox);
        assert!(Environment::default().is_production());
    }

    #[test]
    fn test_environment_round_trips_through_display() {
        for env in [Environment::Production, Environment::Sandbox] {
            assert_eq!(env.to_string().parse::<Environment>(), Ok(env));
        }
        assert_eq!(" Sandbox".parse::<Environment>(), Ok(Environment::Sandbox));

        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(err.to_string().starts_with("invalid environment: staging"));
    }
}
