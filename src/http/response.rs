//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Define the error kinds a handler can end with
//! - Map each kind to a status and body at the handler boundary
//!
//! # Design Decisions
//! - Relayed upstream errors keep the upstream's exact status and body
//! - Local failures (simulated or internal) become 503 with the message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything a request can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// The flaky endpoint's intentional failure.
    #[error("I failed {draw}")]
    SimulatedFailure { draw: f64 },

    /// The upstream answered with a non-2xx status.
    #[error("upstream responded {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// The upstream could not be reached.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// Anything else that went wrong locally.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Whether calling the upstream again might help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Upstream { .. } | AppError::Transport(_))
    }

    /// Status and body sent to the client.
    pub fn status_and_body(&self) -> (StatusCode, String) {
        match self {
            AppError::Upstream { status, body } => (*status, body.clone()),
            other => (StatusCode::SERVICE_UNAVAILABLE, other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream { status, body } => {
                tracing::error!(status = status.as_u16(), body = %body, "Error from upstream");
            }
            other => {
                tracing::error!(message = %other, "Request failed");
            }
        }

        self.status_and_body().into_response()
    }
}
