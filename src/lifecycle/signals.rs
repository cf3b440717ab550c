//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on unix, SIGTERM both mean "drain and exit".

use std::io;

use crate::lifecycle::Shutdown;

/// Resolves once SIGINT or SIGTERM arrives.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

/// Resolves once Ctrl+C arrives.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Wait for a signal, then trigger `shutdown`.
pub async fn trigger_on_signal(shutdown: Shutdown) {
    match wait_for_signal().await {
        Ok(()) => tracing::info!("Termination signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for signals, shutting down"),
    }
    shutdown.trigger();
}
