mod config;

use crate::config::Settings;
use anyhow::Context;
use entities::cities::ZipCode;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use shared_kernel::http_client::HttpClient;
use url::Url;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const STORM_CONDITIONS: [&str; 2] = ["thunderstorm", "tornado"];

/// Current conditions for a city, reduced to what the alert message uses.
#[derive(Clone, Debug)]
pub struct CurrentWeather {
    pub temperature_f: i64,
    pub humidity_pct: u8,
    pub descriptions: Vec<String>,
}

impl CurrentWeather {
    /// Severe wind can bring an eruv down after the morning check.
    pub fn storm_warning(&self) -> bool {
        self.descriptions.iter().any(|description| {
            STORM_CONDITIONS
                .iter()
                .any(|condition| description.to_lowercase().contains(condition))
        })
    }
}

#[derive(Deserialize)]
struct CurrentWeatherResponse {
    main: MainMeasurements,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Deserialize)]
struct MainMeasurements {
    temp: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

// The API reports temperature in Kelvin.
fn fahrenheit(kelvin: f64) -> i64 {
    (1.8 * (kelvin - 273.15) + 32.0) as i64
}

pub struct WeatherApi {
    host: Url,
    api_key: Secret<String>,
}

impl WeatherApi {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?.weather;
        let host = Url::parse(&settings.host)
            .with_context(|| format!("Invalid weather host {}", &settings.host))?;
        Ok(Self::with_host(host, settings.api_key))
    }

    pub fn with_host(host: Url, api_key: Secret<String>) -> Self {
        Self { host, api_key }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn current_by_zip_code(&self, zip_code: &ZipCode) -> anyhow::Result<CurrentWeather> {
        let mut url = self
            .host
            .join(CURRENT_WEATHER_PATH)
            .context("Failed to build the current weather url")?;
        url.query_pairs_mut()
            .append_pair("zip", &format!("{zip_code},us"))
            .append_pair("appid", self.api_key.expose_secret());

        let response = HttpClient::get_json::<CurrentWeatherResponse>(url)
            .await
            .with_context(|| format!("Failed to fetch current weather for {zip_code}"))?;

        Ok(CurrentWeather {
            temperature_f: fahrenheit(response.main.temp),
            humidity_pct: response.main.humidity,
            descriptions: response
                .weather
                .into_iter()
                .map(|condition| condition.description)
                .collect(),
        })
    }
}
