//! `acom token`

use acommerce_client::{AcommerceClient, Environment};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{CommandError, print_json};

#[derive(Serialize)]
struct TokenReport<'a> {
    issued: bool,
    environment: Environment,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

/// Authenticate and print whether a token was issued.
///
/// The token is only printed with `show`. A rejection still prints the report
/// before failing.
pub async fn check(client: &AcommerceClient, show: bool) -> Result<(), CommandError> {
    let token = client.token().await?;
    let credentials = &client.config().credentials;

    print_json(&TokenReport {
        issued: token.is_some(),
        environment: credentials.environment,
        username: &credentials.username,
        token: token
            .as_ref()
            .filter(|_| show)
            .map(ExposeSecret::expose_secret),
    })?;

    if token.is_none() {
        return Err(CommandError::NoToken);
    }
    Ok(())
}
