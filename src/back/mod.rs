//! Back service: postal code → city → temperature.
//!
//! # Data Flow
//! ```text
//! POST /weather {"cep": "..."}
//!     → http/request.rs (405 / 400 / 422)
//!     → pipeline.rs searchCity   (404 / 500)
//!     → pipeline.rs searchWeather (500)
//!     → 200 {"city", "temp_C", "temp_F", "temp_K"}
//! ```

pub mod handler;
pub mod pipeline;

use std::sync::Arc;

use axum::{routing::any, Router};

use crate::config::ServiceConfig;
use crate::http::TracedClient;
use crate::providers::{ViaCepClient, WeatherApiClient};

pub use handler::BackState;
pub use pipeline::WeatherPipeline;

/// Routes of the back service, carrying their state.
pub fn routes(state: BackState) -> Router {
    Router::new()
        .route("/weather", any(handler::weather))
        .with_state(state)
}

/// Wire the real providers from configuration.
pub fn state_from_config(config: &ServiceConfig, client: TracedClient) -> BackState {
    let cities = ViaCepClient::new(client.clone(), config.back.cep_url_template.clone());
    let weather = WeatherApiClient::new(client, config.back.weather_url.clone(), config.back.weather_api_key.clone());

    BackState {
        pipeline: WeatherPipeline::new(Arc::new(cities), Arc::new(weather), config.request_name.as_str()),
        body_limit: config.listener.max_body_bytes,
    }
}
