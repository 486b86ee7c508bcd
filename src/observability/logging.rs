//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global subscriber
//! - Bridge `tracing` spans into OpenTelemetry spans
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level
//! - The OpenTelemetry layer has its own INFO filter so a quiet log level
//!   never drops spans from the trace

use opentelemetry_sdk::trace::SdkTracer;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber; `tracer` is `None` before telemetry is up.
pub fn init_logging(log_level: &str, tracer: Option<SdkTracer>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cep_weather={},tower_http=info", log_level).into());

    let otel_layer = tracer.map(|tracer| {
        tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_filter(LevelFilter::INFO)
    });

    let result = tracing_subscriber::registry()
        .with(otel_layer)
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
