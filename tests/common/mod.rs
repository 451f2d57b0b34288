//! Shared test helpers for token endpoint tests.

#![allow(dead_code)]

use std::time::Duration;

use resttoken::config::TokenConfig;
use resttoken::token::TokenManager;
use wiremock::MockServer;

pub const SERVICE_URL: &str = "https://stream.watsonplatform.net/speech-to-text/api";
pub const USERNAME: &str = "watson-user";
pub const PASSWORD: &str = "watson-pass";
pub const TOKEN_PATH: &str = "/authorization/api/v1/token";

pub fn config_for(server: &MockServer) -> TokenConfig {
    config_with_timeout(server, Duration::from_secs(5))
}

pub fn config_with_timeout(server: &MockServer, timeout: Duration) -> TokenConfig {
    TokenConfig::builder()
        .token_url(format!("{}{TOKEN_PATH}", server.uri()))
        .service_url(SERVICE_URL)
        .username(USERNAME)
        .password(PASSWORD)
        .timeout(timeout)
        .build()
}

pub fn manager_for(server: &MockServer) -> TokenManager {
    TokenManager::new(config_for(server)).expect("build manager")
}

/// Poll `condition` every few milliseconds until it holds or `limit` passes.
pub async fn wait_until(limit: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
