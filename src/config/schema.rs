//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by both
//! services. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a front or back service process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name reported to the trace collector (`service.name`).
    pub service_name: String,

    /// Label of the root span opened for every inbound request.
    pub request_name: String,

    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Trace export and logging settings.
    pub telemetry: TelemetryConfig,

    /// Front service settings.
    pub front: FrontConfig,

    /// Back service settings.
    pub back: BackConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "cep-weather".to_string(),
            request_name: "weather-request".to_string(),
            listener: ListenerConfig::default(),
            telemetry: TelemetryConfig::default(),
            front: FrontConfig::default(),
            back: BackConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest request body accepted before the body is rejected as invalid.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Wire protocol used to ship spans to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    Http,
}

/// Trace export and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Which collector endpoint the exporter talks to.
    pub protocol: ExportProtocol,

    /// OTLP/gRPC collector endpoint.
    pub grpc_endpoint: String,

    /// OTLP/HTTP collector endpoint, including the `/v1/traces` path.
    pub http_endpoint: String,

    /// Bound on establishing the collector connection at startup.
    pub connect_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            protocol: ExportProtocol::Grpc,
            grpc_endpoint: "http://localhost:4317".to_string(),
            http_endpoint: "http://localhost:4318/v1/traces".to_string(),
            connect_timeout_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// The endpoint matching the configured protocol.
    pub fn endpoint(&self) -> &str {
        match self.protocol {
            ExportProtocol::Grpc => &self.grpc_endpoint,
            ExportProtocol::Http => &self.http_endpoint,
        }
    }
}

/// Front service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontConfig {
    /// Full URL of the back service's weather endpoint.
    pub back_service_url: String,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            back_service_url: "http://localhost:8181/weather".to_string(),
        }
    }
}

/// Back service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackConfig {
    /// Postal-code lookup URL; `{cep}` is replaced by the eight digits.
    pub cep_url_template: String,

    /// Current-weather endpoint; key and city are sent as query parameters.
    pub weather_url: String,

    /// API key for the weather provider.
    pub weather_api_key: String,
}

impl Default for BackConfig {
    fn default() -> Self {
        Self {
            cep_url_template: "https://viacep.com.br/ws/{cep}/json/".to_string(),
            weather_url: "http://api.weatherapi.com/v1/current.json".to_string(),
            weather_api_key: String::new(),
        }
    }
}

/// Which of the two services a process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Front,
    Back,
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceRole::Front => write!(f, "front"),
            ServiceRole::Back => write!(f, "back"),
        }
    }
}
