use crate::auth::{ServiceAccountKey, ServiceAccountTokens};
use crate::configuration::Settings;
use crate::rows;
use crate::rows::StatusRow;
use anyhow::Context;
use entities::cities::{CityName, ZipCode};
use entities::subscribers::Subscriber;
use serde::Deserialize;
use serde_json::json;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use url::Url;

const STATUS_RANGE: &str = "Status!A2:C";
const SUBSCRIBERS_RANGE: &str = "Subscribers!A2:C";
const RABBIS_RANGE: &str = "Rabbis!A2:D";

/// The alerts spreadsheet, read and written through the Sheets values API.
pub struct SheetsRepository {
    host: Url,
    spreadsheet_id: String,
    tokens: ServiceAccountTokens,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_cells: u32,
}

impl SheetsRepository {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?.spreadsheet;
        let host = Url::parse(&settings.host)
            .with_context(|| format!("Invalid spreadsheet host {}", &settings.host))?;
        let auth_host = Url::parse(&settings.auth_host)
            .with_context(|| format!("Invalid auth host {}", &settings.auth_host))?;
        let key = ServiceAccountKey::from_file(&settings.service_account_key_file)?;
        Ok(Self::with_settings(
            host,
            auth_host,
            settings.spreadsheet_id,
            key,
        ))
    }

    pub fn with_settings(
        host: Url,
        auth_host: Url,
        spreadsheet_id: String,
        key: ServiceAccountKey,
    ) -> Self {
        let token_url = auth_host
            .join("/token")
            .expect("Expected the token url to be valid");
        Self {
            host,
            spreadsheet_id,
            tokens: ServiceAccountTokens::new(key, token_url),
        }
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn status_rows(&self) -> anyhow::Result<Vec<StatusRow>> {
        let values = self.values(STATUS_RANGE).await?;
        Ok(rows::status_rows(values))
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn subscribers(&self) -> anyhow::Result<Vec<Subscriber>> {
        let values = self.values(SUBSCRIBERS_RANGE).await?;
        Ok(rows::subscriber_rows(values))
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn zip_codes(&self) -> anyhow::Result<HashMap<CityName, ZipCode>> {
        let values = self.values(RABBIS_RANGE).await?;
        Ok(rows::zip_codes(values))
    }

    /// Rewrite a city's `Last Notified` cell with the status that was just
    /// delivered to its subscribers.
    #[tracing::instrument(err, skip(self, row), fields(city = %row.city), level = "info")]
    pub async fn record_notified_status(&self, row: &StatusRow) -> anyhow::Result<()> {
        let range = format!("Status!C{}", row.row);
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = json!({ "values": [[row.current_status.inner()]] });
        let response = HttpClient::put_json::<UpdateValuesResponse>(url, self.auth_headers().await?, body)
            .await
            .with_context(|| format!("Failed to update {range} for {}", row.city))?;
        tracing::debug!("Updated {} cells in {range}", response.updated_cells);
        Ok(())
    }

    async fn values(&self, range: &str) -> anyhow::Result<Vec<Vec<String>>> {
        let url = self.values_url(range)?;
        let response = HttpClient::get_with_headers::<ValueRange>(url, self.auth_headers().await?)
            .await
            .with_context(|| format!("Failed to read the {range} range"))?;
        Ok(response.values)
    }

    fn values_url(&self, range: &str) -> anyhow::Result<Url> {
        self.host
            .join(&format!(
                "/v4/spreadsheets/{}/values/{range}",
                self.spreadsheet_id
            ))
            .with_context(|| format!("Failed to build the values url for {range}"))
    }

    async fn auth_headers(&self) -> anyhow::Result<HashMap<&'static str, String>> {
        let token = self.tokens.bearer_token().await?;
        Ok(HashMap::from([("Authorization", format!("Bearer {token}"))]))
    }
}
