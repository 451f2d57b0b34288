//! HTTP client construction, request URL derivation, and error mapping.

use std::time::Duration;

use reqwest::Url;

use crate::error::{Result, TokenError};

/// Query parameter carrying the service URL on token requests.
pub const SERVICE_URL_PARAM: &str = "url";

/// Build the reqwest client used for token requests.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(2)
        .user_agent(concat!("resttoken/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TokenError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Derive the token request URL: `token_url` with `url=<service_url>` appended.
///
/// Existing query parameters on `token_url` are preserved and the service URL
/// is percent-encoded.
pub fn refresh_url(token_url: &str, service_url: &str) -> Result<Url> {
    Url::parse_with_params(token_url, &[(SERVICE_URL_PARAM, service_url)])
        .map_err(|e| TokenError::Configuration(format!("invalid token URL {token_url:?}: {e}")))
}

/// Map a reqwest failure to a transport or timeout error.
pub fn transport_error(error: reqwest::Error, timeout: Duration) -> TokenError {
    if error.is_timeout() {
        TokenError::Timeout(timeout_millis(timeout))
    } else {
        TokenError::Transport(error.to_string())
    }
}

/// Whole milliseconds in `timeout`, saturating at `u64::MAX`.
pub fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Build the error for a non-success response.
pub fn status_to_error(status: u16, body: &str) -> TokenError {
    TokenError::status(status, body.trim())
}
