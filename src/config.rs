//! Startup configuration from command-line flags or the environment.

use std::time::Duration;

use clap::Parser;

use crate::source::{DEFAULT_BASE_URL, OpenWeatherConfig};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug, Clone)]
#[command(name = "hyperweather")]
#[command(about = "Rolling pressure history with threshold weather forecasts")]
pub struct Config {
    /// OpenWeatherMap API key
    #[arg(long, env = "APIkey", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// City query, e.g. "Rome,IT"
    #[arg(long, env = "CityCode", default_value = "")]
    pub city: String,

    /// HTTP port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Seconds between samples
    #[arg(long, env = "HYPERWEATHER_INTERVAL_SECS", default_value = "180")]
    pub interval_secs: u64,

    /// Weather request timeout in seconds
    #[arg(long, env = "HYPERWEATHER_FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// Weather service base URL
    #[arg(long, env = "HYPERWEATHER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Host and port for the listener; the host may be a name like `localhost`.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port())
    }

    pub fn source(&self) -> OpenWeatherConfig {
        OpenWeatherConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            city: self.city.clone(),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}
