//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::{ExportProtocol, ServiceConfig, ServiceRole};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration for `role`, from a TOML file when given, then apply
/// process environment overrides and validate.
pub fn load_config(path: Option<&Path>, role: ServiceRole) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content)?
        }
        None => ServiceConfig::default(),
    };

    let mut errors = apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Err(found) = validate_config(&config, role) {
        errors.extend(found);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Overlay the environment variables the deployment sets.
///
/// `lookup` returns the value of a variable, or `None` when unset. Values
/// that cannot be applied are returned instead of being dropped.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Vec<ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("OTEL_SERVICE_NAME") {
        config.service_name = v;
    }
    if let Some(v) = get("REQUEST_NAME_OTEL") {
        config.request_name = v;
    }
    if let Some(v) = get("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.grpc_endpoint = with_scheme(&v);
    }
    if let Some(v) = get("OTEL_EXPORTER_OTLP_HTTP_ENDPOINT") {
        config.telemetry.http_endpoint = with_scheme(&v);
    }
    if let Some(v) = get("OTEL_EXPORTER_OTLP_PROTOCOL") {
        match v.as_str() {
            "grpc" => config.telemetry.protocol = ExportProtocol::Grpc,
            "http" | "http/protobuf" => config.telemetry.protocol = ExportProtocol::Http,
            other => errors.push(ValidationError::new(
                "OTEL_EXPORTER_OTLP_PROTOCOL",
                format!("unknown protocol '{}', expected grpc or http/protobuf", other),
            )),
        }
    }
    if let Some(v) = get("HTTP_PORT") {
        config.listener.bind_address = listen_address(&v);
    }
    if let Some(v) = get("WEATHER_API_KEY") {
        config.back.weather_api_key = v;
    }
    if let Some(v) = get("BACK_SERVICE_URL") {
        config.front.back_service_url = v;
    }
    if let Some(v) = get("CEP_URL_TEMPLATE") {
        config.back.cep_url_template = v;
    }
    if let Some(v) = get("WEATHER_API_URL") {
        config.back.weather_url = v;
    }

    errors
}

/// Normalize a listen address.
///
/// Accepts `":8080"` and bare `"8080"` as well as a full socket address.
pub fn listen_address(value: &str) -> String {
    let value = value.trim();
    if let Some(port) = value.strip_prefix(':') {
        format!("0.0.0.0:{}", port)
    } else if value.chars().all(|c| c.is_ascii_digit()) {
        format!("0.0.0.0:{}", value)
    } else {
        value.to_string()
    }
}

/// Collector endpoints are often given as `host:port`.
fn with_scheme(value: &str) -> String {
    if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    }
}
