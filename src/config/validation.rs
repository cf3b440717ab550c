//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem found is
//! reported, not just the first.

use std::net::SocketAddr;

use axum::http::Uri;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url `{0}` must be an absolute http URI")]
    BaseUrl(String),

    #[error("upstream.path `{0}` must start with '/'")]
    Path(String),

    #[error("flaky.failure_threshold {0} is outside [0, 1]")]
    Threshold(f64),

    #[error("retries.factor must be at least 1")]
    Factor,

    #[error("retries.base_delay_ms {base} exceeds retries.max_delay_ms {max}")]
    DelayBounds { base: u64, max: u64 },

    #[error("timeouts.request_secs must be greater than 0")]
    RequestTimeout,

    #[error("observability.log_level `{0}` is not a valid filter")]
    LogLevel(String),
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let base_ok = config
        .upstream
        .base_url
        .parse::<Uri>()
        .map(|uri| uri.scheme_str() == Some("http") && uri.authority().is_some())
        .unwrap_or(false);
    if !base_ok {
        errors.push(ValidationError::BaseUrl(config.upstream.base_url.clone()));
    }

    if !config.upstream.path.starts_with('/') {
        errors.push(ValidationError::Path(config.upstream.path.clone()));
    }

    let threshold = config.flaky.failure_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ValidationError::Threshold(threshold));
    }

    if config.retries.factor < 1 {
        errors.push(ValidationError::Factor);
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::DelayBounds {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
