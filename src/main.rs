//! flaky-retry
//!
//! ```text
//!     Client ── GET /call ──▶ ┌──────────────────────────────┐
//!                             │ RetryingCaller               │
//!                             │  attempt 1 ──▶ GET /sometimes ──┐
//!                             │  wait 200ms                  │  │
//!                             │  attempt 2 ──▶ GET /sometimes ──┤  FlakyEndpoint
//!                             │  wait 400ms                  │  │  (fails when draw < 0.7)
//!                             │  attempt 3 ──▶ GET /sometimes ──┤
//!                             │  wait 800ms                  │  │
//!                             │  attempt 4 ──▶ GET /sometimes ──┘
//!     Client ◀── body ─────── └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use flaky_retry::config::{read_or_default, validate_config, ConfigError};
use flaky_retry::lifecycle::{trigger_on_signal, Shutdown};
use flaky_retry::observability::init_logging;
use flaky_retry::HttpServer;

#[derive(Parser)]
#[command(name = "flaky-retry")]
#[command(about = "Flaky endpoint plus a retrying caller", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.base_url.
    #[arg(short, long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = read_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = cli.upstream {
        config.upstream.base_url = upstream;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "flaky-retry starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.target(),
        max_retries = config.retries.max_retries,
        base_delay_ms = config.retries.base_delay_ms,
        failure_threshold = config.flaky.failure_threshold,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(trigger_on_signal(shutdown));

    HttpServer::new(config)?.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
