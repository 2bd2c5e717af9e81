use anyhow::Context;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Deserialize)]
pub struct Settings {
    pub delivery: DeliverySettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeliverySettings {
    /// Compose and log every message without sending or updating the sheet.
    pub dry_run: bool,
    /// Sleep 0-2 seconds between sends.
    pub delayed_send: bool,
    pub include_candle_lighting: bool,
    pub include_havdalah: bool,
    pub donation_note: Option<DonationNote>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DonationNote {
    pub cities: Vec<String>,
    pub note: String,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            dry_run: false,
            delayed_send: false,
            include_candle_lighting: true,
            include_havdalah: true,
            donation_note: None,
        }
    }
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>().context("Failed to deserialize settings to delivery settings")
    }
}
