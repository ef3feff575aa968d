//! Error taxonomy for the aCommerce client.

use thiserror::Error;

/// Maximum number of response body characters kept in an error.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 500;

/// Errors that can occur when interacting with the aCommerce API.
#[derive(Debug, Error)]
pub enum AcommerceError {
    /// The identity endpoint failed for a reason other than rejecting the
    /// credentials (server error, undecodable body).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A resource endpoint rejected the request token (or its absence).
    #[error("Unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A resource endpoint returned a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure (connection, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Pagination ran past the configured page budget.
    #[error("Pagination stopped after {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },

    /// The `Link` header pointed back at a page that was already fetched.
    #[error("Pagination revisited page {page}")]
    PageRevisited { page: u32 },

    /// A value could not be used as an HTTP header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl AcommerceError {
    /// Whether this error means the caller is not (or no longer) authenticated.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Unauthorized { .. })
    }

    /// HTTP status carried by the error, if the server produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Shorten a response body for inclusion in an error or log line.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
