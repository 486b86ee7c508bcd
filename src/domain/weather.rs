//! Weather result and temperature scale conversion.

use serde::{Deserialize, Serialize};

/// Celsius to Fahrenheit.
pub fn fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Celsius to Kelvin, using the whole-degree offset the API has always returned.
pub fn kelvin(celsius: f64) -> f64 {
    celsius + 273.0
}

/// Response body of the back service on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl WeatherResult {
    pub fn from_celsius(city: impl Into<String>, celsius: f64) -> Self {
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: fahrenheit(celsius),
            temp_k: kelvin(celsius),
        }
    }

    /// One-line description recorded on the request span.
    pub fn summary(&self) -> String {
        format!(
            "Weather in {}: {:.1}C, {:.1}F, {:.1}K",
            self.city, self.temp_c, self.temp_f, self.temp_k
        )
    }
}
