//! Retry policy for mutating API calls
//!
//! Jamf Pro instances shed load under pressure, so transient failures
//! (network errors, timeouts, 429, 5xx) get retried with exponential
//! backoff inside a caller-supplied deadline. Terminal failures (4xx,
//! auth, validation) propagate immediately.

use std::future::Future;
use std::time::{Duration, Instant};

use tfbridge::Context;
use thiserror::Error;

use crate::api::ApiError;

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RetryError {
    #[error(transparent)]
    Terminal(ApiError),

    #[error("operation did not succeed within {elapsed:?} ({attempts} attempts): {last_error}")]
    Timeout {
        attempts: u32,
        elapsed: Duration,
        last_error: ApiError,
    },

    #[error("deadline already spent before the first attempt")]
    DeadlineSpent,

    #[error("operation cancelled")]
    Cancelled,
}

impl RetryError {
    /// The underlying API error, when one was observed
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            RetryError::Terminal(e) => Some(e),
            RetryError::Timeout { last_error, .. } => Some(last_error),
            _ => None,
        }
    }
}

/// Run `operation` until it succeeds, fails terminally, or the deadline is
/// spent. Each invocation owns its attempt counter and backoff; nothing is
/// shared across concurrent resource operations.
pub async fn execute_with_retry<T, F, Fut>(
    ctx: &Context,
    deadline: Duration,
    operation: F,
) -> Result<T, RetryError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if deadline.is_zero() {
        return Err(RetryError::DeadlineSpent);
    }

    let started = Instant::now();
    let mut backoff = INITIAL_BACKOFF;
    let mut attempts: u32 = 0;
    let mut done = ctx.done();

    loop {
        if ctx.is_cancelled() {
            return Err(RetryError::Cancelled);
        }

        attempts += 1;
        let last_error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(RetryError::Terminal(e)),
            Err(e) => e,
        };

        let elapsed = started.elapsed();
        if elapsed + backoff >= deadline {
            return Err(RetryError::Timeout {
                attempts,
                elapsed,
                last_error,
            });
        }

        tracing::debug!(
            "transient failure ({}), retrying in {:?} (attempt {})",
            last_error,
            backoff,
            attempts
        );

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = done.changed() => return Err(RetryError::Cancelled),
        }

        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}
