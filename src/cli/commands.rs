//! Command handlers for `resttoken fetch` and `resttoken config`.

use super::{render_config, ConfigArgs};
use crate::token::TokenManager;

/// Handle `resttoken fetch`: refresh once and print the token to stdout.
pub async fn handle_fetch(args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve()?;
    let manager = TokenManager::new(config)?;
    let token = manager.refresh().await.inspect_err(|err| {
        tracing::debug!(
            retryable = err.is_retryable(),
            suggestion = %err.recovery_suggestion(),
            "fetch failed"
        );
    })?;
    println!("{token}");
    Ok(())
}

/// Handle `resttoken config`: print the resolved configuration.
pub fn handle_config(args: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve()?;
    print!("{}", render_config(&config));
    Ok(())
}
