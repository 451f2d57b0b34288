//! Error types for resttoken.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for token refreshes and configuration.
///
/// `Clone` so one in-flight refresh result can be handed to every caller
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Token endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl TokenError {
    /// Create a status error from a non-success response.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Status { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether a caller-driven retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Server
        ) || self.status_code() == Some(429)
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Api if self.status_code() == Some(429) => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::Api => RecoverySuggestion::ContactSupport,
        }
    }
}

impl From<toml::de::Error> for TokenError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(format!("invalid config file: {error}"))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_maps_to_authentication() {
        let err = TokenError::status(401, "bad credentials");
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::CheckCredentials);
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Token endpoint returned status 401: bad credentials"
        );
    }

    #[test]
    fn server_and_transport_errors_are_retryable() {
        assert!(TokenError::status(503, "").is_retryable());
        assert!(TokenError::Transport("connection refused".into()).is_retryable());
        assert!(TokenError::Timeout(500).is_retryable());
        assert!(TokenError::status(429, "").is_retryable());
        assert!(!TokenError::Configuration("missing username".into()).is_retryable());
    }

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(
            TokenError::Timeout(10).recovery_suggestion().to_string(),
            "increase_timeout"
        );
    }

    #[test]
    fn status_code_only_for_status_errors() {
        assert_eq!(TokenError::status(404, "nope").status_code(), Some(404));
        assert_eq!(TokenError::Timeout(1).status_code(), None);
    }
}
