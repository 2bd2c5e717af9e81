use anyhow::Context;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Deserialize)]
pub struct Settings {
    pub zmanim: ZmanimSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ZmanimSettings {
    pub host: String,
    pub havdalah_minutes: u32,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>().context("Failed to deserialize settings to zmanim settings")
    }
}
