//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (OTEL_SERVICE_NAME, HTTP_PORT, ...)
//!     → validation.rs (semantic checks for the service role)
//!     → ServiceConfig (validated, immutable)
//!     → passed by value/Arc to each component at construction
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackConfig, ExportProtocol, FrontConfig, ListenerConfig, ServiceConfig, ServiceRole,
    TelemetryConfig,
};
