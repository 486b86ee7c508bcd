//! Trace context continuity across the front and back services.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::any;
use axum::Router;
use opentelemetry::trace::{SpanId, Status, TraceId, TracerProvider as _};
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use tower::ServiceExt;
use tracing_subscriber::layer::SubscriberExt;

use cep_weather::config::ServiceConfig;
use cep_weather::http::HttpServer;
use cep_weather::lifecycle::Shutdown;
use cep_weather::{back, front};
use cep_weather_sdk::WeatherClient;

mod common;

const INCOMING_TRACE: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
const INCOMING_SPAN: &str = "00f067aa0ba902b7";

/// Install a thread-local subscriber that exports every finished span to memory.
fn capture() -> (InMemorySpanExporter, SdkTracerProvider, tracing::subscriber::DefaultGuard) {
    let exporter = InMemorySpanExporter::default();
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("trace-propagation-test")));
    let guard = tracing::subscriber::set_default(subscriber);
    (exporter, provider, guard)
}

fn attr(span: &SpanData, key: &str) -> Option<String> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.as_str().into_owned())
}

fn named<'a>(spans: &'a [SpanData], name: &str) -> &'a SpanData {
    spans
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no span named {name:?} in {:?}", spans.iter().map(|s| &s.name).collect::<Vec<_>>()))
}

#[tokio::test]
async fn test_back_continues_incoming_trace() {
    let (exporter, _provider, _guard) = capture();

    let mut config = ServiceConfig::default();
    config.request_name = "back-request".into();
    let (state, _) = common::fake_back_state(&config);
    let app = HttpServer::build_router(back::routes(state), &config);

    let request = Request::builder()
        .method("POST")
        .uri("/weather")
        .header("content-type", "application/json")
        .header("traceparent", format!("00-{}-{}-01", INCOMING_TRACE, INCOMING_SPAN))
        .body(Body::from(r#"{"cep":"29902-555"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
    let _ = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let spans = exporter.get_finished_spans().unwrap();
    let trace_id = TraceId::from_hex(INCOMING_TRACE).unwrap();
    assert!(spans.iter().all(|s| s.span_context.trace_id() == trace_id));

    let root = named(&spans, "back-request");
    assert_eq!(root.parent_span_id, SpanId::from_hex(INCOMING_SPAN).unwrap());
    assert_eq!(attr(root, "cep").as_deref(), Some("29902-555"));
    assert!(attr(root, "weather").unwrap().starts_with("Weather in Linhares: 28.5C"));

    let root_id = root.span_context.span_id();
    let city = named(&spans, "back-request - searchCity");
    let weather = named(&spans, "back-request - searchWeather");
    assert_eq!(city.parent_span_id, root_id);
    assert_eq!(weather.parent_span_id, root_id);
    assert_eq!(attr(city, "city").as_deref(), Some("Linhares"));
    assert!(attr(weather, "weather").is_some());
}

#[tokio::test]
async fn test_rejected_request_still_marks_root_span() {
    let (exporter, _provider, _guard) = capture();

    let config = ServiceConfig::default();
    let (state, _) = common::fake_back_state(&config);
    let app = HttpServer::build_router(back::routes(state), &config);

    let request = Request::builder()
        .method("POST")
        .uri("/weather")
        .body(Body::from(r#"{"cep":"123"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 422);
    let _ = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let spans = exporter.get_finished_spans().unwrap();
    let root = named(&spans, &config.request_name);
    assert_eq!(root.parent_span_id, SpanId::INVALID);
    assert!(matches!(root.status, Status::Error { .. }));
    assert!(!spans.iter().any(|s| s.name.ends_with("searchCity")));
}

#[tokio::test]
async fn test_front_and_back_share_one_trace() {
    let (exporter, _provider, _guard) = capture();
    let shutdown = Shutdown::new();

    let mut back_config = ServiceConfig::default();
    back_config.request_name = "back-request".into();
    let (state, _) = common::fake_back_state(&back_config);
    let back_addr = common::spawn_service(back::routes(state), &back_config, &shutdown).await;

    let mut front_config = ServiceConfig::default();
    front_config.request_name = "front-request".into();
    front_config.front.back_service_url = format!("http://{}/weather", back_addr);
    let state = front::state_from_config(&front_config, common::client());
    let front_addr = common::spawn_service(front::routes(state), &front_config, &shutdown).await;

    let outcome = WeatherClient::new(&format!("http://{}", front_addr))
        .lookup("72547240")
        .await
        .unwrap();
    assert_eq!(outcome.status, 200);

    // Root spans close once their response bodies finish streaming.
    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown.trigger();

    let spans = exporter.get_finished_spans().unwrap();
    let front_root = named(&spans, "front-request");
    let trace_id = front_root.span_context.trace_id();
    assert!(spans.iter().all(|s| s.span_context.trace_id() == trace_id));

    let forward = named(&spans, "front-request - searchWeather");
    assert_eq!(forward.parent_span_id, front_root.span_context.span_id());

    let outbound = named(&spans, "HTTP POST");
    assert_eq!(outbound.parent_span_id, forward.span_context.span_id());

    let back_root = named(&spans, "back-request");
    assert_eq!(back_root.parent_span_id, outbound.span_context.span_id());
    assert_eq!(
        named(&spans, "back-request - searchCity").parent_span_id,
        back_root.span_context.span_id()
    );
}

fn error_description(span: &SpanData) -> Option<String> {
    match &span.status {
        Status::Error { description } => Some(description.to_string()),
        _ => None,
    }
}

#[tokio::test]
async fn test_server_errors_mark_root_span() {
    let (exporter, _provider, _guard) = capture();

    let mut config = ServiceConfig::default();
    config.request_name = "bare-request".into();
    let routes = Router::new().route("/weather", any(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let app = HttpServer::build_router(routes, &config);

    let response = app
        .oneshot(Request::builder().method("POST").uri("/weather").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let _ = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let spans = exporter.get_finished_spans().unwrap();
    let root = named(&spans, "bare-request");
    assert_eq!(error_description(root).as_deref(), Some("500 Internal Server Error"));
}

#[tokio::test]
async fn test_handler_error_message_survives_status_recording() {
    let (exporter, _provider, _guard) = capture();

    let mut config = ServiceConfig::default();
    config.request_name = "back-request".into();
    let (state, _) = common::fake_back_state(&config);
    let app = HttpServer::build_router(back::routes(state), &config);

    let request = Request::builder()
        .method("POST")
        .uri("/weather")
        .body(Body::from(r#"{"cep":"00000000"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 500);
    let _ = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let spans = exporter.get_finished_spans().unwrap();
    let root = named(&spans, "back-request");
    assert_eq!(error_description(root).as_deref(), Some("error while searching for city"));
}
