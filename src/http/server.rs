//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and drain on shutdown

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::InvalidUri;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::flaky::{DrawSource, FlakyEndpoint, RandomDraws};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::resilience::{RetryPolicy, Sleeper, TokioSleeper};
use crate::upstream::{RetryingCaller, UpstreamClient};

/// Startup failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream URI: {0}")]
    InvalidUpstream(#[from] InvalidUri),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flaky: FlakyEndpoint,
    pub draws: Arc<dyn DrawSource>,
    pub caller: RetryingCaller,
}

/// HTTP server exposing `/sometimes` and `/call`.
pub struct HttpServer {
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with random draws and real sleeps.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let policy = RetryPolicy::from(&config.retries);

        let state = AppState {
            flaky: FlakyEndpoint::new(config.flaky.failure_threshold),
            draws: Arc::new(RandomDraws),
            caller: RetryingCaller::new(upstream, policy, Arc::new(TokioSleeper)),
        };

        Ok(Self { config, state })
    }

    /// Replace the draw source used by `/sometimes`.
    pub fn with_draws(mut self, draws: Arc<dyn DrawSource>) -> Self {
        self.state.draws = draws;
        self
    }

    /// Replace how `/call` waits between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.state.caller = self.state.caller.with_sleeper(sleeper);
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )));

        Router::new()
            .route("/sometimes", get(handlers::sometimes))
            .route("/call", get(handlers::call))
            .with_state(self.state.clone())
            .layer(middleware)
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.state.caller.upstream().uri(),
            max_retries = self.state.caller.policy().max_retries,
            "HTTP server starting"
        );

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
