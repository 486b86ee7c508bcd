//! Postal-code weather services with end-to-end distributed tracing.

// Services
pub mod back;
pub mod front;

// Core subsystems
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod providers;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ServiceConfig, ServiceRole};
pub use domain::{PostalCode, WeatherResult};
pub use error::{StartupError, WeatherError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
