//! Outbound HTTP client with trace-context injection.
//!
//! # Responsibilities
//! - Open a client span per outbound call
//! - Inject that span's context as `traceparent` so the callee nests under it
//! - Record the upstream status on the span
//!
//! # Design Decisions
//! - Wraps `reqwest::Client`; callers never touch headers for tracing
//! - Only host and path are recorded: query strings may carry API keys
//! - No client-side timeout beyond the transport defaults; dropping the
//!   future (client disconnect) cancels the call

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::{field::Empty, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::observability::{inject_context, record_error};

/// A `reqwest::Client` that propagates the current trace.
#[derive(Debug, Clone)]
pub struct TracedClient {
    inner: Client,
}

impl TracedClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(Client::builder().build()?))
    }

    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }

    /// `GET url` with optional query parameters.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
        self.execute(self.inner.get(url).query(query)).await
    }

    /// `POST url` with a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Response, reqwest::Error> {
        self.execute(self.inner.request(Method::POST, url).json(body)).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        let mut request = builder.build()?;

        let method = request.method().clone();
        let host = request.url().host_str().unwrap_or_default().to_string();
        let path = request.url().path().to_string();

        let span = tracing::info_span!(
            "http.client",
            otel.name = %format!("HTTP {}", method),
            otel.kind = "client",
            otel.status_code = Empty,
            otel.status_message = Empty,
            http.request.method = %method,
            server.address = %host,
            url.path = %path,
            http.response.status_code = Empty,
        );

        inject_context(&span.context(), request.headers_mut());

        tracing::debug!(parent: &span, host = %host, path = %path, "Requesting upstream");

        match self.inner.execute(request).instrument(span.clone()).await {
            Ok(response) => {
                span.record("http.response.status_code", response.status().as_u16());
                Ok(response)
            }
            Err(e) => {
                record_error(&span, &e);
                Err(e)
            }
        }
    }
}
