pub mod config;

use crate::config::{DeliverySettings, Settings};
use entities::cities::{CityName, ZipCode};
use entities::subscribers::{PhoneNumber, Subscriber};
use google_sheets::{SheetsRepository, StatusRow};
use itertools::Itertools;
use notifications::contracts::send_notification::sms::SmsNotificationInteractor;
use notifications::contracts::send_notification::{
    ShabbatSchedule, StatusNotification, WeatherReport,
};
use notifications::message;
use notifications::message::MessageOptions;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use weather::{CurrentWeather, WeatherApi};
use zmanim::{ShabbatTimes, ZmanimApi};

/// A city whose status moved since subscribers were last notified.
#[derive(Debug)]
pub struct StatusChange {
    pub row: StatusRow,
    pub zip_code: Option<ZipCode>,
    pub subscribers: Vec<PhoneNumber>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub cities_notified: usize,
    pub messages_sent: usize,
}

/// The set of cities to notify this pass.
///
/// A city qualifies when its current status is decided (not `Pending`) and
/// differs from the status subscribers last heard about.
pub fn detect_status_changes(
    status_rows: Vec<StatusRow>,
    zip_codes: &HashMap<CityName, ZipCode>,
    subscribers: &[Subscriber],
) -> Vec<StatusChange> {
    status_rows
        .into_iter()
        .filter_map(|row| {
            if row.current_status.is_pending() {
                tracing::debug!("Skipping {}: status is still pending", row.city);
                return None;
            }
            if row.last_notified.as_ref() == Some(&row.current_status) {
                tracing::debug!("Skipping {}: status is unchanged", row.city);
                return None;
            }

            let zip_code = zip_codes.get(&row.city).cloned();
            if zip_code.is_none() {
                tracing::warn!("No zip code listed for {}", row.city);
            }

            let subscribers = subscribers
                .iter()
                .filter(|subscriber| subscriber.subscribes_to(&row.city))
                .map(|subscriber| subscriber.phone_number.clone())
                .collect_vec();

            Some(StatusChange {
                row,
                zip_code,
                subscribers,
            })
        })
        .collect_vec()
}

pub struct StatusChangeNotifier {
    repository: SheetsRepository,
    sms: SmsNotificationInteractor,
    weather: WeatherApi,
    zmanim: ZmanimApi,
    options: DeliverySettings,
}

impl StatusChangeNotifier {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_dependencies(
            SheetsRepository::new()?,
            SmsNotificationInteractor::new()?,
            WeatherApi::new()?,
            ZmanimApi::new()?,
            Settings::parse()?.delivery,
        ))
    }

    pub fn with_dependencies(
        repository: SheetsRepository,
        sms: SmsNotificationInteractor,
        weather: WeatherApi,
        zmanim: ZmanimApi,
        options: DeliverySettings,
    ) -> Self {
        Self {
            repository,
            sms,
            weather,
            zmanim,
            options,
        }
    }

    #[tracing::instrument(err, skip(self))]
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let status_rows = self.repository.status_rows().await?;
        let subscribers = self.repository.subscribers().await?;
        let zip_codes = self.repository.zip_codes().await?;

        let changes = detect_status_changes(status_rows, &zip_codes, &subscribers);
        if changes.is_empty() {
            tracing::info!("No status changes detected");
        }

        let mut summary = RunSummary::default();
        for change in &changes {
            let sent = self.notify_city(change).await?;
            if self.options.dry_run {
                tracing::info!(
                    "{sent} subscribers would have been notified in {}",
                    change.row.city
                );
            } else {
                self.repository.record_notified_status(&change.row).await?;
                tracing::info!("{sent} subscribers notified in {}", change.row.city);
            }
            summary.cities_notified += 1;
            summary.messages_sent += sent;
        }
        Ok(summary)
    }

    async fn notify_city(&self, change: &StatusChange) -> anyhow::Result<usize> {
        let (weather, shabbat) = match &change.zip_code {
            Some(zip_code) => (
                self.fetch_weather(zip_code, &change.row.city).await,
                self.fetch_shabbat_times(zip_code, &change.row.city).await,
            ),
            None => (None, None),
        };

        let options = self.message_options(&change.row.city);
        let mut sent = 0;
        for subscriber in &change.subscribers {
            let notification = StatusNotification {
                to: subscriber.clone(),
                city: change.row.city.clone(),
                status: change.row.current_status.clone(),
                weather,
                shabbat: shabbat.clone(),
            };
            let body = message::compose(&notification, &options)?;

            if self.options.dry_run {
                tracing::info!("{subscriber} > {body}");
            } else {
                self.sms.deliver(subscriber, &body).await?;
            }
            sent += 1;

            if self.options.delayed_send {
                let pause = rand::thread_rng().gen_range(0..=2);
                tokio::time::sleep(Duration::from_secs(pause)).await;
            }
        }
        Ok(sent)
    }

    // Enrichment is best effort. A city with a broken weather or zmanim
    // lookup still gets its status notification.
    async fn fetch_weather(&self, zip_code: &ZipCode, city: &CityName) -> Option<WeatherReport> {
        match self.weather.current_by_zip_code(zip_code).await {
            Ok(weather) => {
                tracing::debug!(
                    "{city}: {}F and {}% humidity",
                    weather.temperature_f,
                    weather.humidity_pct
                );
                Some(to_weather_report(&weather))
            }
            Err(error) => {
                tracing::warn!("Could not fetch weather for {city}: {error:#}");
                None
            }
        }
    }

    async fn fetch_shabbat_times(
        &self,
        zip_code: &ZipCode,
        city: &CityName,
    ) -> Option<ShabbatSchedule> {
        match self.zmanim.upcoming_shabbat(zip_code).await {
            Ok(times) => Some(to_shabbat_schedule(times)),
            Err(error) => {
                tracing::warn!("Could not fetch shabbat times for {city}: {error:#}");
                None
            }
        }
    }

    fn message_options(&self, city: &CityName) -> MessageOptions {
        let donation_note = self.options.donation_note.as_ref().and_then(|donation| {
            donation
                .cities
                .iter()
                .any(|configured| city.as_ref() == configured.as_str())
                .then(|| donation.note.clone())
        });
        MessageOptions {
            include_candle_lighting: self.options.include_candle_lighting,
            include_havdalah: self.options.include_havdalah,
            donation_note,
        }
    }
}

fn to_weather_report(weather: &CurrentWeather) -> WeatherReport {
    WeatherReport {
        temperature_f: weather.temperature_f,
        humidity_pct: weather.humidity_pct,
        storm_warning: weather.storm_warning(),
    }
}

fn to_shabbat_schedule(times: ShabbatTimes) -> ShabbatSchedule {
    ShabbatSchedule {
        candle_lighting: times.candle_lighting,
        havdalah: times.havdalah,
        parsha: times.parsha,
    }
}
