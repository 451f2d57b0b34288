//! Token retrieval and refresh.

pub mod callbacks;
pub mod manager;

pub use callbacks::RefreshCallbacks;
pub use manager::TokenManager;

use chrono::{DateTime, Utc};

/// A token returned by the token endpoint.
///
/// The value is opaque: whatever body the endpoint returned on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub obtained_at: DateTime<Utc>,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            obtained_at: Utc::now(),
        }
    }
}
