use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, Response},
    response::IntoResponse,
};
use tracing::Instrument;

use crate::domain::{PostalCode, PostalCodeRequest};
use crate::error::WeatherError;
use crate::http::{read_postal_code, TracedClient};
use crate::observability::{record_error, step_span};

/// Application state injected into the front service handler.
#[derive(Clone)]
pub struct FrontState {
    pub client: TracedClient,
    pub back_url: Arc<str>,
    pub label: Arc<str>,
    pub body_limit: usize,
}

/// `/weather` on the front service.
pub async fn weather(State(state): State<FrontState>, request: Request<Body>) -> Response<Body> {
    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn forward(state: &FrontState, request: Request<Body>) -> Result<Response<Body>, WeatherError> {
    let cep = read_postal_code(request, state.body_limit).await?;

    let span = step_span(&state.label, "searchWeather", cep.as_str());
    let outcome = relay(state, &cep).instrument(span.clone()).await;
    if let Err(e) = &outcome {
        record_error(&span, e);
    }
    outcome
}

/// Send the code to the back service and copy its answer.
async fn relay(state: &FrontState, cep: &PostalCode) -> Result<Response<Body>, WeatherError> {
    let payload = PostalCodeRequest {
        cep: cep.as_str().to_string(),
    };

    let upstream = state
        .client
        .post_json(&state.back_url, &payload)
        .await
        .map_err(|e| WeatherError::UpstreamUnavailable { detail: e.to_string() })?;

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let body = upstream
        .bytes()
        .await
        .map_err(|e| WeatherError::UpstreamUnavailable { detail: e.to_string() })?;

    tracing::info!(cep = %cep, status = status.as_u16(), "Relaying back service response");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
