//! Sequential city → weather lookup.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::{PostalCode, WeatherResult};
use crate::error::WeatherError;
use crate::observability::{record_error, step_span};
use crate::providers::{CityLookup, CityLookupError, WeatherProvider};

impl From<CityLookupError> for WeatherError {
    fn from(err: CityLookupError) -> Self {
        match err {
            CityLookupError::NotFound => WeatherError::CityNotFound,
            CityLookupError::Failed(detail) => WeatherError::LookupFailed { detail },
        }
    }
}

/// Resolves a validated postal code to a [`WeatherResult`].
///
/// Each stage runs in its own child span of the request span. The weather
/// stage never runs unless the city stage succeeded.
#[derive(Clone)]
pub struct WeatherPipeline {
    cities: Arc<dyn CityLookup>,
    weather: Arc<dyn WeatherProvider>,
    label: Arc<str>,
}

impl WeatherPipeline {
    pub fn new(cities: Arc<dyn CityLookup>, weather: Arc<dyn WeatherProvider>, label: impl Into<Arc<str>>) -> Self {
        Self {
            cities,
            weather,
            label: label.into(),
        }
    }

    pub async fn run(&self, cep: &PostalCode) -> Result<WeatherResult, WeatherError> {
        let city = self.search_city(cep).await?;
        let celsius = self.search_weather(cep, &city).await?;

        let result = WeatherResult::from_celsius(city, celsius);
        tracing::debug!(weather = %result.summary(), "Weather resolved");
        Ok(result)
    }

    async fn search_city(&self, cep: &PostalCode) -> Result<String, WeatherError> {
        let span = step_span(&self.label, "searchCity", cep.as_str());

        let outcome = self.cities.city(cep).instrument(span.clone()).await;
        match &outcome {
            Ok(city) => {
                span.record("city", city.as_str());
            }
            Err(e) => record_error(&span, e),
        }
        outcome.map_err(WeatherError::from)
    }

    async fn search_weather(&self, cep: &PostalCode, city: &str) -> Result<f64, WeatherError> {
        let span = step_span(&self.label, "searchWeather", cep.as_str());
        span.record("city", city);

        match self.weather.current_celsius(city).instrument(span.clone()).await {
            Ok(celsius) => {
                let summary = WeatherResult::from_celsius(city, celsius).summary();
                span.record("weather", summary.as_str());
                Ok(celsius)
            }
            Err(e) => {
                record_error(&span, &e);
                Err(WeatherError::WeatherFailed(e.0))
            }
        }
    }
}
