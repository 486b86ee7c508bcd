use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::back::pipeline::WeatherPipeline;
use crate::error::WeatherError;
use crate::http::read_postal_code;

/// Application state injected into the back service handler.
#[derive(Clone)]
pub struct BackState {
    pub pipeline: WeatherPipeline,
    pub body_limit: usize,
}

/// `/weather` on the back service.
pub async fn weather(State(state): State<BackState>, request: Request<Body>) -> Response {
    match resolve(&state, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn resolve(state: &BackState, request: Request<Body>) -> Result<Response, WeatherError> {
    let cep = read_postal_code(request, state.body_limit).await?;
    let result = state.pipeline.run(&cep).await?;

    tracing::Span::current().record("weather", result.summary().as_str());
    tracing::info!(cep = %cep, city = %result.city, "Weather served");

    Ok((StatusCode::OK, Json(result)).into_response())
}
