//! Postal-code lookup against a ViaCEP-compatible API.
//!
//! The provider answers 200 for well-formed codes it does not know, with a
//! body of `{"erro": true}` (older deployments send `"true"` as a string).
//! Known codes carry the city in `localidade`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::PostalCode;
use crate::http::TracedClient;
use crate::providers::{CityLookup, CityLookupError};

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    localidade: Option<String>,
}

impl ViaCepResponse {
    fn into_city(self) -> Result<String, CityLookupError> {
        if is_not_found_marker(self.erro.as_ref()) {
            return Err(CityLookupError::NotFound);
        }

        match self.localidade {
            Some(city) if !city.trim().is_empty() => Ok(city),
            _ => Err(CityLookupError::Failed("response has no locality".to_string())),
        }
    }
}

fn is_not_found_marker(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::String(s)) => s != "false",
        Some(_) => true,
    }
}

/// City lookup client.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: TracedClient,
    url_template: String,
}

impl ViaCepClient {
    /// `url_template` must contain `{cep}`.
    pub fn new(client: TracedClient, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    fn url_for(&self, cep: &PostalCode) -> String {
        self.url_template.replace("{cep}", &cep.digits())
    }
}

#[async_trait]
impl CityLookup for ViaCepClient {
    async fn city(&self, cep: &PostalCode) -> Result<String, CityLookupError> {
        let response = self
            .client
            .get(&self.url_for(cep), &[])
            .await
            .map_err(|e| CityLookupError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CityLookupError::Failed(format!("unexpected status {}", status)));
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| CityLookupError::Failed(e.to_string()))?;

        body.into_city()
    }
}
