//! External lookup providers used by the back service.
//!
//! # Data Flow
//! ```text
//! PostalCode
//!     → CityLookup (viacep.rs)      → city name | NotFound | Failed
//!     → WeatherProvider (weatherapi.rs) → current °C | error
//! ```
//!
//! # Design Decisions
//! - Each provider sits behind a trait so the pipeline can be driven by fakes
//! - Provider-specific response rules (such as the "not found" marker) stay
//!   inside the provider implementation

pub mod viacep;
pub mod weatherapi;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PostalCode;

pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

/// Failure to turn a postal code into a city.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CityLookupError {
    /// The provider says the code does not exist.
    #[error("postal code not found")]
    NotFound,

    /// Transport error, bad status, or a payload of unexpected shape.
    #[error("{0}")]
    Failed(String),
}

/// Failure to fetch the current temperature for a city.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct WeatherLookupError(pub String);

/// Resolves postal codes to city names.
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn city(&self, cep: &PostalCode) -> Result<String, CityLookupError>;
}

/// Reports the current temperature of a city in Celsius.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_celsius(&self, city: &str) -> Result<f64, WeatherLookupError>;
}
