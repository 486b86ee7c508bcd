//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cep_weather::back::{BackState, WeatherPipeline};
use cep_weather::config::ServiceConfig;
use cep_weather::domain::PostalCode;
use cep_weather::http::{HttpServer, TracedClient};
use cep_weather::lifecycle::Shutdown;
use cep_weather::providers::{CityLookup, CityLookupError, WeatherLookupError, WeatherProvider};

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the request head (request line and headers) and returns the
/// status and JSON body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 16 * 1024];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();

                        let (status, body) = f(head).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A ViaCEP stand-in: two known codes, everything else `{"erro": true}`.
pub async fn start_mock_viacep(calls: Arc<AtomicUsize>) -> SocketAddr {
    start_programmable_backend(move |head| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let path = head.split_whitespace().nth(1).unwrap_or_default().to_string();
            match path.as_str() {
                "/ws/29902555/json/" => (200, r#"{"cep":"29902-555","localidade":"Linhares","uf":"ES"}"#.into()),
                "/ws/72547240/json/" => (200, r#"{"cep":"72547-240","localidade":"Brasília","uf":"DF"}"#.into()),
                _ => (200, r#"{"erro": true}"#.into()),
            }
        }
    })
    .await
}

/// A WeatherAPI stand-in answering with a fixed temperature per city.
pub async fn start_mock_weather(api_key: &'static str) -> SocketAddr {
    start_programmable_backend(move |head| async move {
        let target = head.split_whitespace().nth(1).unwrap_or_default().to_string();
        if !target.contains(&format!("key={}", api_key)) {
            return (401, r#"{"error":{"code":2006,"message":"API key is invalid."}}"#.into());
        }
        if target.contains("q=Linhares") {
            (200, r#"{"location":{"name":"Linhares"},"current":{"temp_c":28.5}}"#.into())
        } else if target.contains("q=Bras%C3%ADlia") {
            (200, r#"{"location":{"name":"Brasilia"},"current":{"temp_c":21.0}}"#.into())
        } else {
            (400, r#"{"error":{"code":1006,"message":"No matching location found."}}"#.into())
        }
    })
    .await
}

/// Serve `routes` with the ambient layers on an ephemeral port.
pub async fn spawn_service(routes: Router, config: &ServiceConfig, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(routes, config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    addr
}

/// In-process city lookup.
pub struct FakeCities {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CityLookup for FakeCities {
    async fn city(&self, cep: &PostalCode) -> Result<String, CityLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match cep.digits().as_str() {
            "29902555" => Ok("Linhares".to_string()),
            "72547240" => Ok("Brasília".to_string()),
            "00000000" => Err(CityLookupError::Failed("unexpected status 502 Bad Gateway".into())),
            _ => Err(CityLookupError::NotFound),
        }
    }
}

/// In-process weather provider.
pub struct FakeWeather;

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current_celsius(&self, city: &str) -> Result<f64, WeatherLookupError> {
        match city {
            "Linhares" => Ok(28.5),
            "Brasília" => Ok(21.0),
            _ => Err(WeatherLookupError("unexpected status 400 Bad Request".into())),
        }
    }
}

/// Back service state wired to the in-process fakes.
pub fn fake_back_state(config: &ServiceConfig) -> (BackState, Arc<FakeCities>) {
    let cities = Arc::new(FakeCities { calls: AtomicUsize::new(0) });
    let pipeline = WeatherPipeline::new(cities.clone(), Arc::new(FakeWeather), config.request_name.as_str());
    (
        BackState {
            pipeline,
            body_limit: config.listener.max_body_bytes,
        },
        cities,
    )
}

/// Outbound client for services under test, ignoring any system proxy.
pub fn client() -> TracedClient {
    TracedClient::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
}
