use anyhow::Context;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Deserialize)]
pub struct Settings {
    pub spreadsheet: SpreadsheetSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpreadsheetSettings {
    pub host: String,
    pub auth_host: String,
    pub spreadsheet_id: String,
    pub service_account_key_file: String,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>().context("Failed to deserialize settings to spreadsheet settings")
    }
}
