use anyhow::Context;
use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Deserialize)]
pub struct Settings {
    pub sms: SmsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmsSettings {
    pub host: String,
    pub account_sid: String,
    pub auth_token: Secret<String>,
    pub sender_number: String,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>().context("Failed to deserialize settings to sms settings")
    }
}
