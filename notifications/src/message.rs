use crate::contracts::send_notification::StatusNotification;
use rand::seq::SliceRandom;
use thiserror::Error;

/// A single SMS segment; carriers split anything longer.
pub const MAX_SMS_CHARACTERS: usize = 160;

// Rotating greetings keep the weekly messages from looking like spam to
// carrier filters.
const GREETINGS: [&str; 4] = ["a great", "a wonderful", "an amazing", "a good"];

const WIND_WARNING: &str = "If winds exceed 35 mph, consider the Eruv down. ";
const SHORTENABLE: &str = " (50 min)";

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message for {city} exceeds the 160 character limit: {message}")]
    TooLong { city: String, message: String },
}

#[derive(Clone, Debug)]
pub struct MessageOptions {
    pub include_candle_lighting: bool,
    pub include_havdalah: bool,
    pub donation_note: Option<String>,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            include_candle_lighting: true,
            include_havdalah: true,
            donation_note: None,
        }
    }
}

pub fn compose(
    notification: &StatusNotification,
    options: &MessageOptions,
) -> Result<String, MessageError> {
    let greeting = GREETINGS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GREETINGS[0]);
    compose_with_greeting(notification, options, greeting)
}

fn compose_with_greeting(
    notification: &StatusNotification,
    options: &MessageOptions,
    greeting: &str,
) -> Result<String, MessageError> {
    let storm = notification
        .weather
        .map(|weather| weather.storm_warning)
        .unwrap_or(false);

    let mut message = String::new();

    if let Some(shabbat) = &notification.shabbat {
        match &shabbat.parsha {
            Some(parsha) => {
                message.push_str(parsha);
                message.push_str(". ");
            }
            None => message.push_str("Chag Somayach! "),
        }
    }

    let prequel = if storm { "As of now, the" } else { "The" };
    message.push_str(&format!(
        "{prequel} {} Eruv is {}. ",
        notification.city, notification.status
    ));

    if storm {
        message.push_str(WIND_WARNING);
    }

    if let Some(shabbat) = &notification.shabbat {
        if options.include_candle_lighting {
            if let Some(candle_lighting) = &shabbat.candle_lighting {
                message.push_str(candle_lighting);
                message.push_str(". ");
            }
        }
        if options.include_havdalah {
            if let Some(havdalah) = &shabbat.havdalah {
                message.push_str(havdalah);
                message.push_str(". ");
            }
        }
    }

    if storm {
        // No pleasantries while the status may still change.
        while message.ends_with(' ') {
            message.pop();
        }
    } else {
        let holiday = notification
            .shabbat
            .as_ref()
            .map(|shabbat| shabbat.is_holiday())
            .unwrap_or(false);
        let suffix = if holiday { " and Yom Tov" } else { "" };
        message.push_str(&format!("Have {greeting} Shabbos{suffix}!"));
    }

    let mut message = shorten(message, notification)?;

    // Links can get a message flagged as spam, so the note is opt-in per city.
    if let Some(note) = &options.donation_note {
        message.push(' ');
        message.push_str(note);
    }

    Ok(message)
}

fn shorten(mut message: String, notification: &StatusNotification) -> Result<String, MessageError> {
    if message.chars().count() > MAX_SMS_CHARACTERS && message.contains(SHORTENABLE) {
        message = message.replace(SHORTENABLE, "");
    }
    if message.chars().count() > MAX_SMS_CHARACTERS {
        return Err(MessageError::TooLong {
            city: notification.city.inner(),
            message,
        });
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::send_notification::{ShabbatSchedule, WeatherReport};
    use entities::cities::{CityName, EruvStatus};
    use entities::subscribers::PhoneNumber;

    fn notification(city: &str, status: &str) -> StatusNotification {
        StatusNotification {
            to: PhoneNumber::try_from("3055550133".to_string()).unwrap(),
            city: CityName::try_from(city.to_string()).unwrap(),
            status: EruvStatus::try_from(status.to_string()).unwrap(),
            weather: None,
            shabbat: None,
        }
    }

    fn shabbat(parsha: Option<&str>) -> ShabbatSchedule {
        ShabbatSchedule {
            candle_lighting: Some("Candle lighting: 7:40pm".to_string()),
            havdalah: Some("Havdalah (50 min): 8:45pm".to_string()),
            parsha: parsha.map(|parsha| parsha.to_string()),
        }
    }

    fn weather(storm_warning: bool) -> WeatherReport {
        WeatherReport {
            temperature_f: 85,
            humidity_pct: 70,
            storm_warning,
        }
    }

    #[test]
    fn a_quiet_week_gets_the_full_message() {
        let mut notification = notification("North Miami Beach", "Up");
        notification.shabbat = Some(shabbat(Some("Parshas Eikev")));
        notification.weather = Some(weather(false));

        let message =
            compose_with_greeting(&notification, &MessageOptions::default(), "a great").unwrap();

        assert_eq!(
            message,
            "Parshas Eikev. The North Miami Beach Eruv is Up. \
             Candle lighting: 7:40pm. Havdalah (50 min): 8:45pm. Have a great Shabbos!"
        );
    }

    #[test]
    fn a_storm_turns_the_message_into_a_warning() {
        let mut notification = notification("Aventura", "Up");
        notification.shabbat = Some(shabbat(Some("Parshas Eikev")));
        notification.weather = Some(weather(true));

        let message =
            compose_with_greeting(&notification, &MessageOptions::default(), "a great").unwrap();

        assert_eq!(
            message,
            "Parshas Eikev. As of now, the Aventura Eruv is Up. \
             If winds exceed 35 mph, consider the Eruv down. \
             Candle lighting: 7:40pm. Havdalah (50 min): 8:45pm."
        );
    }

    #[test]
    fn a_holiday_week_greets_for_yom_tov() {
        let mut notification = notification("Aventura", "Down");
        notification.shabbat = Some(shabbat(None));

        let message =
            compose_with_greeting(&notification, &MessageOptions::default(), "a good").unwrap();

        assert_eq!(
            message,
            "Chag Somayach! The Aventura Eruv is Down. \
             Candle lighting: 7:40pm. Havdalah (50 min): 8:45pm. Have a good Shabbos and Yom Tov!"
        );
    }

    #[test]
    fn missing_enrichment_still_produces_a_message() {
        let notification = notification("Aventura", "Down");

        let message =
            compose_with_greeting(&notification, &MessageOptions::default(), "a great").unwrap();

        assert_eq!(message, "The Aventura Eruv is Down. Have a great Shabbos!");
    }

    #[test]
    fn candle_lighting_and_havdalah_can_be_suppressed() {
        let mut notification = notification("Aventura", "Up");
        notification.shabbat = Some(shabbat(Some("Parshas Eikev")));
        let options = MessageOptions {
            include_candle_lighting: false,
            include_havdalah: false,
            donation_note: None,
        };

        let message = compose_with_greeting(&notification, &options, "a great").unwrap();

        assert_eq!(
            message,
            "Parshas Eikev. The Aventura Eruv is Up. Have a great Shabbos!"
        );
    }

    #[test]
    fn the_donation_note_is_appended_for_configured_cities() {
        let notification = notification("North Miami Beach", "Up");
        let options = MessageOptions {
            donation_note: Some("Please visit bit.ly/nmberuv to cover the costs.".to_string()),
            ..MessageOptions::default()
        };

        let message = compose_with_greeting(&notification, &options, "a great").unwrap();

        assert_eq!(
            message,
            "The North Miami Beach Eruv is Up. Have a great Shabbos! \
             Please visit bit.ly/nmberuv to cover the costs."
        );
    }

    #[test]
    fn long_messages_drop_the_havdalah_offset() {
        let mut notification = notification("Bal Harbour Surfside Bay Harbor Islands", "Up");
        notification.shabbat = Some(shabbat(Some("Parshas Nitzavim-Vayeilech")));

        let message =
            compose_with_greeting(&notification, &MessageOptions::default(), "a wonderful")
                .unwrap();

        assert!(!message.contains("(50 min)"));
        assert!(message.contains("Havdalah: 8:45pm"));
        assert!(message.chars().count() <= MAX_SMS_CHARACTERS);
    }

    #[test]
    fn messages_that_cannot_be_shortened_are_an_error() {
        let mut notification = notification(
            "A City With An Unreasonably Long Ceremonial Name That Never Ends",
            "Up",
        );
        let mut shabbat = shabbat(Some(
            "Parshas Nitzavim-Vayeilech (a reading with a very long transliterated name)",
        ));
        shabbat.havdalah = Some("Havdalah: 8:45pm".to_string());
        notification.shabbat = Some(shabbat);

        let result =
            compose_with_greeting(&notification, &MessageOptions::default(), "a wonderful");

        assert!(matches!(result, Err(MessageError::TooLong { .. })));
    }

    #[test]
    fn the_random_greeting_comes_from_the_rotation() {
        let notification = notification("Aventura", "Up");

        let message = compose(&notification, &MessageOptions::default()).unwrap();

        assert!(GREETINGS
            .iter()
            .any(|greeting| message.ends_with(&format!("Have {greeting} Shabbos!"))));
    }
}
