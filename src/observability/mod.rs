//! Observability subsystem.
//!
//! Structured `tracing` events only. Request spans come from tower-http's
//! `TraceLayer` and carry the request ID, which is also forwarded to the
//! upstream so both sides of a `/call` line up in the logs.

pub mod logging;

pub use logging::init_logging;
