//! Current-weather lookup against a WeatherAPI-compatible endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::http::TracedClient;
use crate::providers::{WeatherLookupError, WeatherProvider};

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

/// Weather provider client.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: TracedClient,
    url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(client: TracedClient, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn current_celsius(&self, city: &str) -> Result<f64, WeatherLookupError> {
        // reqwest escapes the city name when encoding the query.
        let query = [("key", self.api_key.as_str()), ("aqi", "no"), ("q", city)];
        let response = self
            .client
            .get(&self.url, &query)
            .await
            .map_err(|e| WeatherLookupError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherLookupError(format!("unexpected status {}", status)));
        }

        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| WeatherLookupError(e.without_url().to_string()))?;

        Ok(body.current.temp_c)
    }
}
