//! Flaky endpoint and retrying caller.
//!
//! `GET /sometimes` fails most of the time; `GET /call` calls it through a
//! client that retries with exponential backoff.

pub mod config;
pub mod flaky;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
