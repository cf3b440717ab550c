//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file means the reference behaviour
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_or_default, ConfigError};
pub use schema::{
    FlakyConfig, ListenerConfig, ObservabilityConfig, RetryConfig, ServiceConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
