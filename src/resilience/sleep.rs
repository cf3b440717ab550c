//! Pluggable waiting between retries.
//!
//! Production code sleeps on the Tokio timer; tests swap in a
//! [`RecordingSleeper`] to observe delays without spending them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Something that can wait for a duration.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }
}

/// Returns immediately and remembers every requested delay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
        futures_util::future::ready(()).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_sleeper_keeps_order() {
        let sleeper = RecordingSleeper::new();
        let handle = sleeper.clone();
        sleeper.sleep(Duration::from_millis(5)).await;
        sleeper.sleep(Duration::from_millis(1)).await;
        assert_eq!(
            handle.delays(),
            vec![Duration::from_millis(5), Duration::from_millis(1)]
        );
    }

    #[tokio::test]
    async fn tokio_sleeper_waits() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
