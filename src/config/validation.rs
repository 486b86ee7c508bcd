//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Check role-specific requirements (API key for the back service)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{ServiceConfig, ServiceRole};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for the given service role.
pub fn validate_config(config: &ServiceConfig, role: ServiceRole) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service_name.trim().is_empty() {
        errors.push(ValidationError::new("service_name", "must not be empty"));
    }
    if config.request_name.trim().is_empty() {
        errors.push(ValidationError::new("request_name", "must not be empty"));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than zero"));
    }
    check_url(&mut errors, "telemetry.endpoint", config.telemetry.endpoint());
    if config.telemetry.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("telemetry.connect_timeout_ms", "must be greater than zero"));
    }

    match role {
        ServiceRole::Front => {
            check_url(&mut errors, "front.back_service_url", &config.front.back_service_url);
        }
        ServiceRole::Back => {
            if !config.back.cep_url_template.contains("{cep}") {
                errors.push(ValidationError::new("back.cep_url_template", "must contain a {cep} placeholder"));
            } else {
                let sample = config.back.cep_url_template.replace("{cep}", "00000000");
                check_url(&mut errors, "back.cep_url_template", &sample);
            }
            check_url(&mut errors, "back.weather_url", &config.back.weather_url);
            if config.back.weather_api_key.trim().is_empty() {
                errors.push(ValidationError::new("back.weather_api_key", "must be set (WEATHER_API_KEY)"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if url.host_str().is_some() => {}
        Ok(_) => errors.push(ValidationError::new(field, format!("'{}' has no host", value))),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}' is not a URL: {}", value, e))),
    }
}
