//! Distributed tracing pipeline.
//!
//! # Responsibilities
//! - Verify the collector is reachable before serving traffic
//! - Build the OTLP span exporter (gRPC or HTTP/protobuf)
//! - Batch completed spans off the request path
//! - Flush pending spans on shutdown
//!
//! # Design Decisions
//! - Every request is sampled (`AlwaysOn`)
//! - A collector that cannot be reached within the connect timeout is fatal
//! - W3C Trace Context is the only propagation format

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracer, SdkTracerProvider},
    Resource,
};
use thiserror::Error;
use tokio::net::TcpStream;

use crate::config::{ExportProtocol, TelemetryConfig};

/// Startup failure of the trace pipeline.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid collector endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to connect to collector at {endpoint}: {source}")]
    CollectorUnreachable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} connecting to collector at {endpoint}")]
    CollectorTimeout { endpoint: String, timeout: Duration },

    #[error("failed to create trace exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
}

/// Owns the tracer provider; flushes and shuts it down when dropped.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flush batched spans and stop the exporter.
    pub fn shutdown(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.force_flush() {
                tracing::warn!(error = %e, "Failed to flush pending spans");
            }
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Tracer provider shutdown failed");
            }
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Connect to the collector and build the provider and tracer.
///
/// Fails when the collector cannot be reached within `connect_timeout_ms`.
pub async fn init_tracer_provider(
    config: &TelemetryConfig,
    service_name: &str,
) -> Result<(SdkTracer, TelemetryGuard), TelemetryError> {
    let endpoint = config.endpoint().to_string();
    let timeout = Duration::from_millis(config.connect_timeout_ms);

    probe_collector(&endpoint, timeout).await?;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .build()?,
        ExportProtocol::Http => SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint.clone())
            .build()?,
    };

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    Ok((tracer, TelemetryGuard { provider: Some(provider) }))
}

/// Open and drop a TCP connection to the collector.
async fn probe_collector(endpoint: &str, timeout: Duration) -> Result<(), TelemetryError> {
    let authority = collector_authority(endpoint)?;

    match tokio::time::timeout(timeout, TcpStream::connect(&authority)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(source)) => Err(TelemetryError::CollectorUnreachable {
            endpoint: endpoint.to_string(),
            source,
        }),
        Err(_) => Err(TelemetryError::CollectorTimeout {
            endpoint: endpoint.to_string(),
            timeout,
        }),
    }
}

/// `host:port` of an endpoint URL, defaulting the port from the scheme.
fn collector_authority(endpoint: &str) -> Result<String, TelemetryError> {
    let invalid = |reason: String| TelemetryError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = url::Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    let host = url.host_str().ok_or_else(|| invalid("missing host".to_string()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("missing port".to_string()))?;

    Ok(format!("{}:{}", host.trim_start_matches('[').trim_end_matches(']'), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_authority() {
        assert_eq!(collector_authority("http://otel-collector:4317").unwrap(), "otel-collector:4317");
        assert_eq!(collector_authority("http://localhost:4318/v1/traces").unwrap(), "localhost:4318");
        assert_eq!(collector_authority("https://collector.example.com").unwrap(), "collector.example.com:443");
        assert!(matches!(
            collector_authority("otel-collector:4317"),
            Err(TelemetryError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_fatal() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = TelemetryConfig {
            grpc_endpoint: format!("http://{}", addr),
            connect_timeout_ms: 1000,
            ..TelemetryConfig::default()
        };

        let err = init_tracer_provider(&config, "test").await.err().unwrap();
        assert!(matches!(
            err,
            TelemetryError::CollectorUnreachable { .. } | TelemetryError::CollectorTimeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_reachable_collector_builds_provider() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let config = TelemetryConfig {
            protocol: ExportProtocol::Http,
            http_endpoint: format!("http://{}/v1/traces", addr),
            ..TelemetryConfig::default()
        };

        let (_tracer, mut guard) = init_tracer_provider(&config, "test").await.unwrap();
        drop(listener);
        guard.shutdown();
    }
}
