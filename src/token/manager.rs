use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Url;
use tokio::task::JoinHandle;

use super::callbacks::RefreshCallbacks;
use super::Token;
use crate::config::TokenConfig;
use crate::error::{Result, TokenError};
use crate::http;

type InFlight = Shared<BoxFuture<'static, Result<String>>>;

/// Retrieves, stores, and refreshes a service token.
///
/// The token is fetched with `GET {token_url}?url={service_url}` using HTTP
/// Basic credentials; the response body is kept as the current token.
/// Refreshes are single-flight: calls made while a request is pending share
/// its result instead of issuing another request.
///
/// Cloning is cheap and every clone shares the same token.
///
/// # Example
/// ```no_run
/// use resttoken::config::TokenConfig;
/// use resttoken::token::TokenManager;
///
/// # async fn example() -> resttoken::error::Result<()> {
/// let config = TokenConfig::builder()
///     .service_url("https://stream.watsonplatform.net/speech-to-text/api")
///     .username("user")
///     .password("secret")
///     .build();
/// let manager = TokenManager::new(config)?;
/// let token = manager.refresh().await?;
/// assert_eq!(manager.token(), Some(token));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: TokenConfig,
    client: reqwest::Client,
    current: RwLock<Option<Token>>,
    refreshing: AtomicBool,
    retries: AtomicU32,
    in_flight: Mutex<Option<InFlight>>,
}

impl TokenManager {
    /// Create a manager with its own HTTP client honoring `config.timeout()`.
    pub fn new(config: TokenConfig) -> Result<Self> {
        let client = http::build_client(config.timeout())?;
        Ok(Self::with_client(config, client))
    }

    /// Create a manager that sends requests through `client`.
    pub fn with_client(config: TokenConfig, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                client,
                current: RwLock::new(None),
                refreshing: AtomicBool::new(false),
                retries: AtomicU32::new(0),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.inner.config
    }

    /// The current token value, `None` until the first successful refresh.
    pub fn token(&self) -> Option<String> {
        self.current().map(|token| token.value)
    }

    /// The current token with the time it was obtained.
    pub fn current(&self) -> Option<Token> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True while a refresh request is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::SeqCst)
    }

    /// Caller-owned retry counter. The manager never changes it on its own.
    pub fn retries(&self) -> u32 {
        self.inner.retries.load(Ordering::SeqCst)
    }

    /// Increment the retry counter, returning the new value.
    pub fn record_retry(&self) -> u32 {
        self.inner.retries.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn reset_retries(&self) {
        self.inner.retries.store(0, Ordering::SeqCst);
    }

    /// The URL a refresh will request.
    pub fn refresh_url(&self) -> Result<Url> {
        self.inner.refresh_url()
    }

    /// Fetch a new token and store it.
    ///
    /// On failure the previous token (if any) is kept. If a refresh is
    /// already pending, this waits for it and returns its result. The request
    /// runs on its own task, so dropping this future does not abandon it.
    /// Must be called from within a tokio runtime.
    pub async fn refresh(&self) -> Result<String> {
        let pending = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!(
                        service_url = %self.inner.config.service_url(),
                        "joining in-flight token refresh"
                    );
                    pending.clone()
                }
                None => {
                    self.inner.refreshing.store(true, Ordering::SeqCst);
                    let handle = tokio::spawn(Arc::clone(&self.inner).run_refresh());
                    let pending = async move {
                        handle.await.unwrap_or_else(|err| {
                            Err(TokenError::Transport(format!(
                                "refresh task ended unexpectedly: {err}"
                            )))
                        })
                    }
                    .boxed()
                    .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Refresh on the current tokio runtime and report through `callbacks`.
    ///
    /// Exactly one callback runs, once. Must be called from within a tokio
    /// runtime.
    pub fn spawn_refresh(&self, callbacks: RefreshCallbacks) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let result = manager.refresh().await;
            callbacks.deliver(result.map(|_| ()));
        })
    }
}

impl Inner {
    fn refresh_url(&self) -> Result<Url> {
        http::refresh_url(self.config.token_url(), self.config.service_url())
    }

    async fn run_refresh(self: Arc<Self>) -> Result<String> {
        // Clears the flag and slot on every exit, including task cancellation.
        let _in_flight = InFlightGuard(&self);
        let result = self.fetch().await;

        if let Ok(value) = &result {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Some(Token::new(value.clone()));
        }

        match &result {
            Ok(value) => tracing::info!(
                service_url = %self.config.service_url(),
                token_len = value.len(),
                "token refreshed"
            ),
            Err(err) => tracing::warn!(
                service_url = %self.config.service_url(),
                category = %err.category(),
                error = %err,
                "token refresh failed"
            ),
        }
        result
    }

    async fn fetch(&self) -> Result<String> {
        let url = self.refresh_url()?;
        let timeout = self.config.timeout();
        tracing::debug!(url = %url, "requesting token");

        let response = self
            .client
            .get(url)
            .basic_auth(self.config.username(), Some(self.config.password()))
            .send()
            .await
            .map_err(|e| http::transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http::status_to_error(status.as_u16(), &body));
        }

        response
            .text()
            .await
            .map_err(|e| http::transport_error(e, timeout))
    }
}

struct InFlightGuard<'a>(&'a Inner);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Flag and slot change together under the lock.
        let mut slot = self.0.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take();
        self.0.refreshing.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("config", &self.inner.config)
            .field("has_token", &self.current().is_some())
            .field("refreshing", &self.is_refreshing())
            .field("retries", &self.retries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn manager(token_url: &str) -> TokenManager {
        let config = TokenConfig::builder()
            .token_url(token_url)
            .service_url("https://svc.example.com/api")
            .username("user")
            .password("pass")
            .build();
        TokenManager::new(config).unwrap()
    }

    #[test]
    fn new_manager_starts_idle_without_token() {
        let manager = manager("http://localhost/token");
        assert_eq!(manager.token(), None);
        assert!(!manager.is_refreshing());
        assert_eq!(manager.retries(), 0);
    }

    #[test]
    fn retry_counter_is_caller_driven() {
        let manager = manager("http://localhost/token");
        assert_eq!(manager.record_retry(), 1);
        assert_eq!(manager.record_retry(), 2);
        assert_eq!(manager.clone().retries(), 2);
        manager.reset_retries();
        assert_eq!(manager.retries(), 0);
    }

    #[test]
    fn refresh_url_does_not_accumulate() {
        let manager = manager("http://localhost/token");
        let first = manager.refresh_url().unwrap();
        let second = manager.refresh_url().unwrap();
        assert_eq!(first, second);
        assert_eq!(manager.config().token_url(), "http://localhost/token");
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", manager("http://localhost/token"));
        assert!(!rendered.contains("pass\""));
        assert!(rendered.contains("has_token: false"));
    }

    #[tokio::test]
    async fn invalid_token_url_fails_and_resets_state() {
        let manager = manager("not a url");
        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, TokenError::Configuration(_)));
        assert!(!manager.is_refreshing());
        assert_eq!(manager.token(), None);

        // A second attempt starts a new request rather than reusing the old result.
        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, TokenError::Configuration(_)));
    }

    #[tokio::test]
    async fn spawn_refresh_delivers_failure_once() {
        let manager = manager("not a url");
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let (on_ok, on_err) = (seen.clone(), seen.clone());

        manager
            .spawn_refresh(
                RefreshCallbacks::new()
                    .on_success(move || on_ok.lock().unwrap().push("success".to_string()))
                    .on_failure(move |err| on_err.lock().unwrap().push(err.to_string())),
            )
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("Configuration error"));
    }
}
