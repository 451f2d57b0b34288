//! resttoken: short-lived service tokens over HTTP Basic auth.
//!
//! A [`TokenManager`](token::TokenManager) requests a token from a token
//! endpoint (`GET {token_url}?url={service_url}` with Basic credentials),
//! keeps the returned body as the current token, and refreshes it on demand.
//! Concurrent refreshes share a single outbound request.
//!
//! # Quick Start
//!
//! ```no_run
//! use resttoken::prelude::*;
//!
//! # async fn example() -> resttoken::error::Result<()> {
//! let config = TokenConfig::from_env()?;
//! let manager = TokenManager::new(config)?;
//! let token = manager.refresh().await?;
//! println!("{token}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod prelude;
pub mod token;

#[cfg(feature = "cli")]
pub mod cli;
