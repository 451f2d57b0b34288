//! Configuration system (layered: code > env > config file).

pub mod file;

pub use file::{default_config_path, ConfigLayer};

use std::fmt;
use std::path::Path;
use std::time::Duration;

use bon::Builder;

use crate::error::Result;

/// Token endpoint used when none is configured.
pub const DEFAULT_TOKEN_URL: &str = "https://stream.watsonplatform.net/authorization/api/v1/token";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint and credential settings for a [`TokenManager`](crate::token::TokenManager).
///
/// Empty strings are accepted as-is; validating credentials is left to the
/// caller.
///
/// # Example
/// ```
/// use resttoken::config::TokenConfig;
///
/// let config = TokenConfig::builder()
///     .service_url("https://stream.watsonplatform.net/speech-to-text/api")
///     .username("user")
///     .password("secret")
///     .build();
/// assert_eq!(config.service_url(), "https://stream.watsonplatform.net/speech-to-text/api");
/// ```
#[derive(Clone, Builder)]
pub struct TokenConfig {
    #[builder(into, default = DEFAULT_TOKEN_URL.to_string())]
    token_url: String,
    #[builder(into)]
    service_url: String,
    #[builder(into)]
    username: String,
    #[builder(into)]
    password: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("token_url", &self.token_url)
            .field("service_url", &self.service_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TokenConfig {
    /// Load from `RESTTOKEN_*` environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        ConfigLayer::from_env()?.into_config()
    }

    /// Load the config file (default path when `path` is `None`), then
    /// overlay environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(path)?.into_config()
    }

    /// Same as [`TokenConfig::load`] but returns the merged layer so callers
    /// can overlay explicit values before validation.
    pub fn load_layers(path: Option<&Path>) -> Result<ConfigLayer> {
        let file_layer = match path {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::from_file(default_config_path())?,
        };
        Ok(file_layer.overlay(ConfigLayer::from_env()?))
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenConfig {
        TokenConfig::builder()
            .service_url("https://svc.example.com/api")
            .username("alice")
            .password("hunter2")
            .build()
    }

    #[test]
    fn builder_applies_defaults() {
        let config = sample();
        assert_eq!(config.token_url(), DEFAULT_TOKEN_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.username(), "alice");
        assert_eq!(config.password(), "hunter2");
    }

    #[test]
    fn builder_overrides_token_url_and_timeout() {
        let config = TokenConfig::builder()
            .token_url("http://localhost:9000/token")
            .service_url("svc")
            .username("u")
            .password("p")
            .timeout(Duration::from_millis(250))
            .build();
        assert_eq!(config.token_url(), "http://localhost:9000/token");
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn empty_credentials_are_accepted() {
        let config = TokenConfig::builder()
            .service_url("")
            .username("")
            .password("")
            .build();
        assert_eq!(config.service_url(), "");
        assert_eq!(config.username(), "");
    }
}
