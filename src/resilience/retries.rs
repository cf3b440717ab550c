//! Retry logic.
//!
//! # Responsibilities
//! - Re-run a fallible async operation while its error is retryable
//! - Wait between attempts according to an [`ExponentialBackoff`]
//! - Report each retry to a caller-supplied hook (for logging)
//!
//! # Design Decisions
//! - `max_retries` counts re-attempts, so 3 retries means 4 calls
//! - Retryability is a predicate supplied by the caller; the helper knows
//!   nothing about HTTP
//! - The last error is returned unchanged once attempts run out

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::ExponentialBackoff;
use crate::resilience::sleep::Sleeper;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: ExponentialBackoff,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: ExponentialBackoff) -> Self {
        Self { max_retries, backoff }
    }

    /// Total calls allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, ExponentialBackoff::from(config))
    }
}

/// Passed to the on-retry hook before each wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based retry ordinal; the call that follows is attempt `iteration + 1`.
    pub iteration: u32,
    /// How long the helper is about to wait.
    pub delay: Duration,
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's retries are spent.
///
/// `operation` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, Op, Fut, P, H>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    is_retryable: P,
    mut on_retry: H,
    mut operation: Op,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    H: FnMut(RetryAttempt, &E),
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt > policy.max_retries || !is_retryable(&err) {
                    return Err(err);
                }

                let retry = RetryAttempt {
                    iteration: attempt,
                    delay: policy.backoff.delay(attempt),
                };
                on_retry(retry, &err);
                sleeper.sleep(retry.delay).await;
                attempt += 1;
            }
        }
    }
}
