//! Convenience re-exports for common use.

pub use crate::config::TokenConfig;
pub use crate::error::{Result, TokenError};
pub use crate::token::{RefreshCallbacks, Token, TokenManager};
