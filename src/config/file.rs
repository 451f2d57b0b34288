//! Partial configuration layers read from TOML files and the environment.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::TokenConfig;
use crate::error::{Result, TokenError};

pub const ENV_TOKEN_URL: &str = "RESTTOKEN_TOKEN_URL";
pub const ENV_SERVICE_URL: &str = "RESTTOKEN_SERVICE_URL";
pub const ENV_USERNAME: &str = "RESTTOKEN_USERNAME";
pub const ENV_PASSWORD: &str = "RESTTOKEN_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "RESTTOKEN_TIMEOUT_SECS";

/// One layer of optional settings. Later layers win when overlaid.
///
/// The TOML file format uses the same field names:
///
/// ```toml
/// token_url = "https://stream.watsonplatform.net/authorization/api/v1/token"
/// service_url = "https://stream.watsonplatform.net/text-to-speech/api"
/// username = "user"
/// password = "secret"
/// timeout_secs = 10
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub token_url: Option<String>,
    pub service_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("token_url", &self.token_url)
            .field("service_url", &self.service_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ConfigLayer {
    /// Read a layer from a TOML file. A missing file is an empty layer.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(TokenError::Configuration(format!(
                    "cannot read {}: {err}",
                    path.display()
                )))
            }
        };
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(toml::from_str(&raw)?)
    }

    /// Read a layer from `RESTTOKEN_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let var = |name: &str| std::env::var(name).ok();

        let timeout_secs = match var(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                TokenError::Configuration(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}"))
            })?),
            None => None,
        };

        Ok(Self {
            token_url: var(ENV_TOKEN_URL),
            service_url: var(ENV_SERVICE_URL),
            username: var(ENV_USERNAME),
            password: var(ENV_PASSWORD),
            timeout_secs,
        })
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn overlay(self, other: ConfigLayer) -> Self {
        Self {
            token_url: other.token_url.or(self.token_url),
            service_url: other.service_url.or(self.service_url),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate that required fields are present and build a [`TokenConfig`].
    pub fn into_config(self) -> Result<TokenConfig> {
        let missing = |field: &str| TokenError::Configuration(format!("missing {field}"));
        if self.timeout_secs == Some(0) {
            return Err(TokenError::Configuration(
                "timeout_secs must be positive".to_string(),
            ));
        }

        Ok(TokenConfig::builder()
            .maybe_token_url(self.token_url)
            .service_url(self.service_url.ok_or_else(|| missing("service_url"))?)
            .username(self.username.ok_or_else(|| missing("username"))?)
            .password(self.password.ok_or_else(|| missing("password"))?)
            .maybe_timeout(self.timeout_secs.map(Duration::from_secs))
            .build())
    }
}

/// Default config file path (`~/.resttoken/config.toml`).
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".resttoken"))
        .unwrap_or_else(|| PathBuf::from(".resttoken"))
        .join("config.toml")
}
