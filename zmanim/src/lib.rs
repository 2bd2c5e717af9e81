mod config;

use crate::config::Settings;
use anyhow::Context;
use entities::cities::ZipCode;
use serde::Deserialize;
use shared_kernel::http_client::HttpClient;
use url::Url;

const SHABBAT_PATH: &str = "/shabbat/";

/// The upcoming Shabbat entries for a zip code, as ready-to-send titles
/// ("Candle lighting: 7:13pm", "Havdalah (50 min): 8:09pm", "Parshas Noach").
#[derive(Clone, Debug, Default)]
pub struct ShabbatTimes {
    pub candle_lighting: Option<String>,
    pub havdalah: Option<String>,
    pub parsha: Option<String>,
}

impl ShabbatTimes {
    /// A week with no Torah portion listed is a holiday week.
    pub fn is_holiday(&self) -> bool {
        self.parsha.is_none()
    }
}

#[derive(Deserialize)]
struct ShabbatResponse {
    #[serde(default)]
    items: Vec<ShabbatItem>,
}

#[derive(Deserialize)]
struct ShabbatItem {
    title: String,
    category: String,
}

impl From<ShabbatResponse> for ShabbatTimes {
    fn from(response: ShabbatResponse) -> Self {
        let mut times = ShabbatTimes::default();
        for item in response.items {
            let slot = match item.category.as_str() {
                "candles" => &mut times.candle_lighting,
                "havdalah" => &mut times.havdalah,
                "parashat" => &mut times.parsha,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(item.title);
            }
        }
        times
    }
}

pub struct ZmanimApi {
    host: Url,
    havdalah_minutes: u32,
}

impl ZmanimApi {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?.zmanim;
        let host = Url::parse(&settings.host)
            .with_context(|| format!("Invalid zmanim host {}", &settings.host))?;
        Ok(Self::with_host(host, settings.havdalah_minutes))
    }

    pub fn with_host(host: Url, havdalah_minutes: u32) -> Self {
        Self {
            host,
            havdalah_minutes,
        }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn upcoming_shabbat(&self, zip_code: &ZipCode) -> anyhow::Result<ShabbatTimes> {
        let mut url = self
            .host
            .join(SHABBAT_PATH)
            .context("Failed to build the shabbat times url")?;
        url.query_pairs_mut()
            .append_pair("cfg", "json")
            .append_pair("zip", &zip_code.inner())
            .append_pair("m", &self.havdalah_minutes.to_string())
            // Ashkenazi transliterations.
            .append_pair("a", "on");

        let response = HttpClient::get_json::<ShabbatResponse>(url)
            .await
            .with_context(|| format!("Failed to fetch shabbat times for {zip_code}"))?;

        let times = ShabbatTimes::from(response);
        if times.havdalah.is_none() {
            tracing::warn!("No havdalah time listed for {zip_code}");
        }
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn shabbat_times_are_picked_out_by_category() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SHABBAT_PATH))
            .and(query_param("cfg", "json"))
            .and(query_param("zip", "33162"))
            .and(query_param("m", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Hebcal Miami August 2019",
                "items": [
                    { "title": "Candle lighting: 7:40pm", "category": "candles" },
                    { "title": "Parshas Eikev", "category": "parashat" },
                    { "title": "Havdalah (50 min): 8:45pm", "category": "havdalah" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = Url::parse(&server.uri()).unwrap();
        let api = ZmanimApi::with_host(host, 50);
        let zip_code = ZipCode::try_from("33162".to_string()).unwrap();

        let times = api.upcoming_shabbat(&zip_code).await.unwrap();

        assert_eq!(times.candle_lighting.as_deref(), Some("Candle lighting: 7:40pm"));
        assert_eq!(times.havdalah.as_deref(), Some("Havdalah (50 min): 8:45pm"));
        assert_eq!(times.parsha.as_deref(), Some("Parshas Eikev"));
        assert!(!times.is_holiday());
    }

    #[tokio::test]
    async fn a_week_without_a_parsha_is_a_holiday() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SHABBAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "title": "Candle lighting: 7:40pm", "category": "candles" },
                    { "title": "Pesach I", "category": "holiday" }
                ]
            })))
            .mount(&server)
            .await;

        let host = Url::parse(&server.uri()).unwrap();
        let api = ZmanimApi::with_host(host, 50);
        let zip_code = ZipCode::try_from("33162".to_string()).unwrap();

        let times = api.upcoming_shabbat(&zip_code).await.unwrap();

        assert!(times.is_holiday());
        assert!(times.havdalah.is_none());
    }
}
