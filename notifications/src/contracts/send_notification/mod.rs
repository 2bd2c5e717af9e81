pub mod sms;

use entities::cities::{CityName, EruvStatus};
use entities::subscribers::PhoneNumber;

/// Everything needed to tell one subscriber about one city's new status.
#[derive(Clone, Debug)]
pub struct StatusNotification {
    pub to: PhoneNumber,
    pub city: CityName,
    pub status: EruvStatus,
    pub weather: Option<WeatherReport>,
    pub shabbat: Option<ShabbatSchedule>,
}

#[derive(Clone, Copy, Debug)]
pub struct WeatherReport {
    pub temperature_f: i64,
    pub humidity_pct: u8,
    pub storm_warning: bool,
}

#[derive(Clone, Debug)]
pub struct ShabbatSchedule {
    pub candle_lighting: Option<String>,
    pub havdalah: Option<String>,
    pub parsha: Option<String>,
}

impl ShabbatSchedule {
    pub fn is_holiday(&self) -> bool {
        self.parsha.is_none()
    }
}
