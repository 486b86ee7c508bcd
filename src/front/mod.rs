//! Front service: validate, then forward to the back service.
//!
//! # Data Flow
//! ```text
//! POST /weather {"cep": "..."}
//!     → http/request.rs (405 / 400 / 422)
//!     → handler.rs searchWeather span
//!         → http/client.rs POST back_service_url (traceparent injected)
//!     → upstream status + body relayed verbatim
//!       (500 if the back service cannot be reached)
//! ```

pub mod handler;

use std::sync::Arc;

use axum::{routing::any, Router};

use crate::config::ServiceConfig;
use crate::http::TracedClient;

pub use handler::FrontState;

/// Routes of the front service, carrying their state.
pub fn routes(state: FrontState) -> Router {
    Router::new()
        .route("/weather", any(handler::weather))
        .with_state(state)
}

pub fn state_from_config(config: &ServiceConfig, client: TracedClient) -> FrontState {
    FrontState {
        client,
        back_url: Arc::from(config.front.back_service_url.as_str()),
        label: Arc::from(config.request_name.as_str()),
        body_limit: config.listener.max_body_bytes,
    }
}
