//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → retries.rs (run, classify failure, decide whether to go again)
//!     → backoff.rs (how long to wait before retry n)
//!     → sleep.rs (wait, on the Tokio timer or a test recorder)
//! ```
//!
//! # Design Decisions
//! - No jitter: delays are a pure function of the retry ordinal
//! - No circuit breaker and no per-attempt timeout

pub mod backoff;
pub mod retries;
pub mod sleep;

pub use backoff::ExponentialBackoff;
pub use retries::{retry_with_backoff, RetryAttempt, RetryPolicy};
pub use sleep::{RecordingSleeper, Sleeper, TokioSleeper};
