use std::fmt;

use crate::error::TokenError;

type SuccessFn = Box<dyn FnOnce() + Send + 'static>;
type FailureFn = Box<dyn FnOnce(TokenError) + Send + 'static>;

/// Optional completion handlers for [`TokenManager::spawn_refresh`](super::TokenManager::spawn_refresh).
///
/// Exactly one of the two handlers runs, at most once, on whichever tokio
/// worker finishes the refresh.
///
/// # Example
/// ```no_run
/// use resttoken::token::RefreshCallbacks;
///
/// let callbacks = RefreshCallbacks::new()
///     .on_success(|| println!("token refreshed"))
///     .on_failure(|err| eprintln!("refresh failed: {err}"));
/// ```
#[derive(Default)]
pub struct RefreshCallbacks {
    on_success: Option<SuccessFn>,
    on_failure: Option<FailureFn>,
}

impl RefreshCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_failure(mut self, f: impl FnOnce(TokenError) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    pub(crate) fn deliver(self, result: Result<(), TokenError>) {
        match result {
            Ok(()) => {
                if let Some(f) = self.on_success {
                    f();
                }
            }
            Err(err) => {
                if let Some(f) = self.on_failure {
                    f(err);
                }
            }
        }
    }
}

impl fmt::Debug for RefreshCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCallbacks")
            .field("on_success", &self.on_success.as_ref().map(|_| ".."))
            .field("on_failure", &self.on_failure.as_ref().map(|_| ".."))
            .finish()
    }
}
