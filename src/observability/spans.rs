//! Span construction for inbound requests and pipeline steps.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{field::Empty, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::observability::propagation::extract_context;

/// Creates the root span of every inbound request.
///
/// The span is named by the configured request label and continues the
/// caller's trace when a `traceparent` header is present.
#[derive(Debug, Clone)]
pub struct RequestSpan {
    label: Arc<str>,
}

impl RequestSpan {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self { label: label.into() }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        let span = tracing::info_span!(
            "request",
            otel.name = %self.label,
            otel.kind = "server",
            otel.status_code = Empty,
            otel.status_message = Empty,
            http.request.method = %request.method(),
            url.path = %request.uri().path(),
            http.response.status_code = Empty,
            request_id = %request_id,
            cep = Empty,
            weather = Empty,
        );

        let _ = span.set_parent(extract_context(request.headers()));
        span
    }
}

/// Response extension set when a handler already marked the request span
/// as failed with its own message.
#[derive(Debug, Clone, Copy)]
pub struct ErrorRecorded;

/// Records the response status on the request span.
///
/// Server errors that no handler marked (framework rejections, panics
/// caught by layers) still flag the span as failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStatus;

impl<B> OnResponse<B> for RecordStatus {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("http.response.status_code", status.as_u16());
        if status.is_server_error() && response.extensions().get::<ErrorRecorded>().is_none() {
            record_error(span, &status);
        }
        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Request finished"
        );
    }
}

/// Child span for one pipeline step, named `"<label> - <step>"`.
pub fn step_span(label: &str, step: &str, cep: &str) -> Span {
    tracing::info_span!(
        "step",
        otel.name = %format!("{} - {}", label, step),
        otel.status_code = Empty,
        otel.status_message = Empty,
        cep = %cep,
        city = Empty,
        weather = Empty,
    )
}

/// Mark `span` as failed with `message`.
pub fn record_error(span: &Span, message: &dyn std::fmt::Display) {
    span.record("otel.status_code", "ERROR");
    span.record("otel.status_message", tracing::field::display(message));
}
