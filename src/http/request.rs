//! Inbound request intake shared by both services.
//!
//! # Responsibilities
//! - Reject any method other than POST
//! - Read and decode the `{"cep": ...}` body
//! - Validate the postal code format
//!
//! # Design Decisions
//! - Checks run in a fixed order: method, then body, then format
//! - The submitted code is recorded on the request span before validation,
//!   so rejected inputs are visible in the trace

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
};

use crate::domain::{PostalCode, PostalCodeRequest};
use crate::error::WeatherError;

/// Turn an inbound request into a validated postal code.
pub async fn read_postal_code(request: Request<Body>, body_limit: usize) -> Result<PostalCode, WeatherError> {
    if request.method() != Method::POST {
        return Err(WeatherError::MethodNotAllowed);
    }

    let bytes = to_bytes(request.into_body(), body_limit)
        .await
        .map_err(|_| WeatherError::InvalidJson)?;
    // A bare `null` body carries no code at all.
    let payload: PostalCodeRequest = serde_json::from_slice::<Option<PostalCodeRequest>>(&bytes)
        .map_err(|_| WeatherError::InvalidJson)?
        .unwrap_or_default();

    tracing::Span::current().record("cep", payload.cep.as_str());

    PostalCode::parse(&payload.cep).ok_or(WeatherError::InvalidFormat)
}
