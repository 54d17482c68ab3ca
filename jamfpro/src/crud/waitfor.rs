//! Availability polling for freshly mutated resources
//!
//! Jamf Pro acknowledges a create before the object is readable on every
//! node of a clustered instance. The poller re-reads until the object is
//! visible, treating `NotFound` as the normal not-yet-propagated signal.

use std::future::Future;
use std::time::{Duration, Instant};

use tfbridge::Context;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("{resource} with ID {id} was not available after {waited:?}")]
    Timeout {
        resource: String,
        id: String,
        waited: Duration,
    },

    #[error("availability check failed: {0}")]
    Failed(ApiError),

    #[error("availability wait cancelled")]
    Cancelled,
}

/// Poll `check` until the entity is visible or the deadline is spent.
/// Only `NotFound` keeps the loop going; any other failure aborts.
pub async fn wait_until_available<T, F, Fut>(
    ctx: &Context,
    resource: &str,
    id: &str,
    check: F,
    poll_interval: Duration,
    deadline: Duration,
) -> Result<T, WaitError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let started = Instant::now();
    let mut done = ctx.done();

    loop {
        if ctx.is_cancelled() {
            return Err(WaitError::Cancelled);
        }

        match check().await {
            Ok(entity) => return Ok(entity),
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "{} with ID {} not yet visible, polling again in {:?}",
                    resource,
                    id,
                    poll_interval
                );
            }
            Err(e) => return Err(WaitError::Failed(e)),
        }

        if started.elapsed() + poll_interval >= deadline {
            return Err(WaitError::Timeout {
                resource: resource.to_string(),
                id: id.to_string(),
                waited: started.elapsed(),
            });
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = done.changed() => return Err(WaitError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn not_found() -> ApiError {
        ApiError::NotFound {
            path: "/api/v1/packages/7".to_string(),
        }
    }

    #[tokio::test]
    async fn entity_becomes_visible_after_a_few_polls() {
        let calls = AtomicU32::new(0);
        let ctx = Context::new();

        let result = wait_until_available(
            &ctx,
            "Package",
            "7",
            || async {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 | 2 => Err(not_found()),
                    _ => Ok("visible"),
                }
            },
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(result.unwrap(), "visible");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn deadline_expiry_yields_timeout() {
        let ctx = Context::new();

        let result: Result<(), _> = wait_until_available(
            &ctx,
            "Package",
            "7",
            || async { Err(not_found()) },
            Duration::from_millis(20),
            Duration::from_millis(60),
        )
        .await;

        match result {
            Err(WaitError::Timeout { resource, id, .. }) => {
                assert_eq!(resource, "Package");
                assert_eq!(id, "7");
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hard_failure_aborts_immediately() {
        let calls = AtomicU32::new(0);
        let ctx = Context::new();

        let result: Result<(), _> = wait_until_available(
            &ctx,
            "Webhook",
            "3",
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::AuthError)
            },
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .await;

        assert!(matches!(result, Err(WaitError::Failed(ApiError::AuthError))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_aborts_the_wait() {
        let ctx = Context::new();
        ctx.cancel();

        let result: Result<(), _> = wait_until_available(
            &ctx,
            "Account",
            "1",
            || async { Err(not_found()) },
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .await;

        assert!(matches!(result, Err(WaitError::Cancelled)));
    }
}
