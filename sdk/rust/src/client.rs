use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LookupRequest<'a> {
    pub cep: &'a str,
}

/// Successful answer of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

/// Raw status and body as returned by the service.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub status: StatusCode,
    pub body: String,
}

impl LookupOutcome {
    /// Decode the body as a report. Only meaningful for a 200.
    pub fn report(&self) -> Result<WeatherReport, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .pool_max_idle_per_host(0)
                .no_proxy()
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a postal code and return whatever the service answered.
    pub async fn lookup(&self, cep: &str) -> Result<LookupOutcome, reqwest::Error> {
        let resp = self.client
            .post(format!("{}/weather", self.base_url))
            .json(&LookupRequest { cep })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        Ok(LookupOutcome { status, body })
    }

    /// Submit a postal code, failing on any non-200 answer.
    pub async fn weather(&self, cep: &str) -> Result<WeatherReport, Box<dyn std::error::Error>> {
        let outcome = self.lookup(cep).await?;
        if outcome.status != StatusCode::OK {
            return Err(format!("Service returned error status {}: {}", outcome.status, outcome.body).into());
        }
        Ok(outcome.report()?)
    }

    /// Send an arbitrary method and body, for exercising the error paths.
    pub async fn raw(&self, method: reqwest::Method, body: &str) -> Result<LookupOutcome, reqwest::Error> {
        let resp = self.client
            .request(method, format!("{}/weather", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        Ok(LookupOutcome { status, body })
    }
}
