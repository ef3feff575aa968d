//! Subcommand implementations.

use std::io::{Read, Write};

use acommerce_client::{
    AcommerceClient, AcommerceConfig, AcommerceError, ConfigError, Environment, PartialInventory,
};
use serde::Serialize;
use thiserror::Error;

pub mod inventory;
pub mod merchants;
pub mod orders;
pub mod shipping;
pub mod token;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("aCommerce error: {0}")]
    Api(#[from] AcommerceError),

    #[error(transparent)]
    Partial(#[from] PartialInventory),

    #[error("Credentials were rejected by the identity service")]
    NoToken,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Build a client from the environment, forcing sandbox hosts if asked.
pub fn client(sandbox: bool) -> Result<AcommerceClient, CommandError> {
    let mut config = AcommerceConfig::from_env()?;
    if sandbox {
        config.credentials.environment = Environment::Sandbox;
    }
    tracing::debug!(environment = %config.environment(), "Loaded aCommerce configuration");
    Ok(AcommerceClient::new(config)?)
}

/// Write `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    write_json(&mut std::io::stdout().lock(), value)
}

fn write_json<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    value: &T,
) -> Result<(), CommandError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_body(path: &str) -> Result<serde_json::Value, CommandError> {
    let raw = if path == "-" {
        let mut raw = String::new();
        std::io::stdin().lock().read_to_string(&mut raw).map(|_| raw)
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|source| CommandError::Read {
        path: path.to_string(),
        source,
    })?;

    parse_body(path, &raw)
}

fn parse_body(path: &str, raw: &str) -> Result<serde_json::Value, CommandError> {
    serde_json::from_str(raw).map_err(|source| CommandError::InvalidJson {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_is_pretty_with_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({ "sku": "NP-TEE-M" })).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"sku\": \"NP-TEE-M\"\n}\n"
        );
    }

    #[test]
    fn test_parse_body_reports_path() {
        let err = parse_body("order.json", "{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON in order.json"));
    }

    #[test]
    fn test_read_body_missing_file() {
        let err = read_body("/nonexistent/acom-order.json").unwrap_err();
        assert!(matches!(err, CommandError::Read { .. }));
    }
}
