//! The retrying caller.
//!
//! # Data Flow
//! ```text
//! GET /call
//!     → RetryingCaller::call
//!     → retry_with_backoff (up to max_retries + 1 attempts)
//!         → UpstreamClient::fetch (GET upstream path)
//!         → on Upstream/Transport error: log iteration, wait, go again
//!     → body of the first success, or the last error
//! ```

pub mod client;

pub use client::UpstreamClient;

use std::sync::Arc;

use crate::http::response::AppError;
use crate::resilience::{retry_with_backoff, RetryPolicy, Sleeper};

/// Calls the upstream, retrying failures with exponential backoff.
#[derive(Clone)]
pub struct RetryingCaller {
    upstream: UpstreamClient,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingCaller {
    pub fn new(upstream: UpstreamClient, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            upstream,
            policy,
            sleeper,
        }
    }

    /// Same caller, waiting through `sleeper` instead.
    pub fn with_sleeper(self, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { sleeper, ..self }
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the call chain for one inbound request.
    pub async fn call(&self, request_id: &str) -> Result<String, AppError> {
        let upstream = &self.upstream;

        retry_with_backoff(
            &self.policy,
            self.sleeper.as_ref(),
            AppError::is_retryable,
            |retry, err| {
                tracing::info!(
                    request_id = %request_id,
                    iteration = retry.iteration,
                    delay = ?retry.delay,
                    error = %err,
                    "Retrying upstream call"
                );
            },
            move |attempt| {
                tracing::debug!(request_id = %request_id, attempt, uri = %upstream.uri(), "Calling upstream");
                upstream.fetch(request_id)
            },
        )
        .await
    }
}
