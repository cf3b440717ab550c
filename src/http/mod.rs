//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / propagate request ID)
//!     → handlers.rs (/sometimes, /call)
//!     → response.rs (AppError → status + body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::AppError;
pub use server::{AppState, HttpServer, ServerError};
