//! Error types.
//!
//! Two channels that never mix:
//! - [`WeatherError`]: request-scoped, terminal for one request, always
//!   rendered as an HTTP status and a plain-text message.
//! - [`StartupError`]: process-scoped, returned from `main` before any
//!   listener is bound.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::observability::{record_error, ErrorRecorded, TelemetryError};

/// Failure of a single weather request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid json")]
    InvalidJson,

    #[error("invalid zipcode")]
    InvalidFormat,

    #[error("can not find zipcode")]
    CityNotFound,

    /// The detail is logged but never sent to the caller.
    #[error("error while searching for city")]
    LookupFailed { detail: String },

    #[error("error while searching for weather: {0}")]
    WeatherFailed(String),

    /// Front service could not reach the back service.
    #[error("error while searching for weather")]
    UpstreamUnavailable { detail: String },
}

impl WeatherError {
    pub fn status(&self) -> StatusCode {
        match self {
            WeatherError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WeatherError::InvalidJson => StatusCode::BAD_REQUEST,
            WeatherError::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,
            WeatherError::CityNotFound => StatusCode::NOT_FOUND,
            WeatherError::LookupFailed { .. }
            | WeatherError::WeatherFailed(_)
            | WeatherError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        match &self {
            WeatherError::LookupFailed { detail } => {
                tracing::error!(error = %detail, "City lookup failed");
            }
            WeatherError::UpstreamUnavailable { detail } => {
                tracing::error!(error = %detail, "Back service unreachable");
            }
            WeatherError::WeatherFailed(detail) => {
                tracing::error!(error = %detail, "Weather lookup failed");
            }
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        record_error(&tracing::Span::current(), &self);

        let mut response = (self.status(), self.to_string()).into_response();
        response.extensions_mut().insert(ErrorRecorded);
        response
    }
}

/// Fatal error raised while bringing a service up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry initialization failed: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
