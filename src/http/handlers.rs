//! Endpoint handlers.

use axum::extract::State;
use axum::http::HeaderMap;

use crate::http::request::request_id;
use crate::http::response::AppError;
use crate::http::server::AppState;

/// `GET /sometimes`: succeeds only when the draw clears the threshold.
pub async fn sometimes(State(state): State<AppState>) -> Result<String, AppError> {
    state.flaky.roll(state.draws.as_ref())
}

/// `GET /call`: calls `/sometimes` through the retrying caller.
pub async fn call(State(state): State<AppState>, headers: HeaderMap) -> Result<String, AppError> {
    let request_id = request_id(&headers);
    state.caller.call(&request_id).await
}
