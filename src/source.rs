//! Remote weather source.
//!
//! Fetches the current conditions for one city from an OpenWeatherMap-compatible
//! endpoint. Every failure is recoverable: the scheduler logs it and repeats the
//! last good reading.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::measurement::Measurement;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("weather source unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather source returned {0}")]
    Status(StatusCode),
    #[error("malformed weather payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather payload has no condition entry")]
    MissingCondition,
    #[error("humidity {0} outside 0-100")]
    HumidityOutOfRange(i64),
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self) -> Result<Measurement, FetchError>;
}

/// Wire format of `/data/2.5/weather`. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    /// hPa
    pub pressure: i64,
    /// Kelvin
    pub temp: f64,
    /// Percent
    pub humidity: i64,
}

impl TryFrom<CurrentWeather> for Measurement {
    type Error = FetchError;

    fn try_from(payload: CurrentWeather) -> Result<Self, Self::Error> {
        let condition = payload
            .weather
            .into_iter()
            .next()
            .ok_or(FetchError::MissingCondition)?
            .description;

        let humidity = u8::try_from(payload.main.humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or(FetchError::HumidityOutOfRange(payload.main.humidity))?;

        Ok(Measurement::from_kelvin(
            payload.main.pressure,
            payload.main.temp,
            humidity,
            condition,
        ))
    }
}

/// Decodes a response body into a measurement.
pub fn parse_payload(body: &[u8]) -> Result<Measurement, FetchError> {
    let payload: CurrentWeather = serde_json::from_slice(body)?;
    Measurement::try_from(payload)
}

#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub city: String,
    pub timeout: Duration,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            city: String::new(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    city: String,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/data/2.5/weather", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            city: config.city,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self) -> Result<Measurement, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", self.city.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), city = %self.city, "Weather payload received");
        parse_payload(&body)
    }
}
