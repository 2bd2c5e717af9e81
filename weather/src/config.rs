use anyhow::Context;
use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Deserialize)]
pub struct Settings {
    pub weather: WeatherSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSettings {
    pub host: String,
    pub api_key: Secret<String>,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>().context("Failed to deserialize settings to weather settings")
    }
}
