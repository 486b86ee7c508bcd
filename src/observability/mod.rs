//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → spans.rs (root span, parent extracted from traceparent)
//!     → pipeline steps (child spans: searchCity, searchWeather)
//!     → http/client.rs (client span, traceparent injected)
//!
//! tracing spans
//!     → logging.rs (fmt layer + tracing-opentelemetry layer)
//!     → tracing.rs (batch processor → OTLP exporter → collector)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing`; spans double as OTel spans
//! - Context propagation lives at the transport layer only
//! - Span export never blocks request handling

pub mod logging;
pub mod propagation;
pub mod spans;
pub mod tracing;

pub use logging::init_logging;
pub use propagation::{extract_context, inject_context};
pub use spans::{record_error, step_span, ErrorRecorded, RecordStatus, RequestSpan};
pub use self::tracing::{init_tracer_provider, TelemetryError, TelemetryGuard};
