use shared_kernel::non_empty_string;

non_empty_string!(CityName);

/// The status cell of a city's row, as maintained by the eruv checkers.
///
/// The value is free text ("Up", "Down", ...). `Pending` is a sentinel
/// meaning the weekly check has not happened yet.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EruvStatus(String);

impl EruvStatus {
    pub fn inner(&self) -> String {
        self.0.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.0.eq_ignore_ascii_case("pending")
    }
}

impl std::fmt::Display for EruvStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for EruvStatus {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl TryFrom<String> for EruvStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err("status cannot be empty".to_string());
        }
        Ok(EruvStatus(value.to_string()))
    }
}

/// A 5-digit US zip code, used to look up weather and Shabbat times.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl std::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.len() != 5 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(format!("{value} is not a valid 5-digit zip code"));
        }
        Ok(ZipCode(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_status_is_detected_case_insensitively() {
        let status = EruvStatus::try_from("PENDING".to_string()).unwrap();
        assert!(status.is_pending());

        let status = EruvStatus::try_from("Up".to_string()).unwrap();
        assert!(!status.is_pending());
    }

    #[test]
    fn statuses_compare_on_trimmed_text() {
        let current = EruvStatus::try_from(" Up ".to_string()).unwrap();
        let last_notified = EruvStatus::try_from("Up".to_string()).unwrap();
        assert_eq!(current, last_notified);
    }

    #[test]
    fn invalid_zip_codes_are_rejected() {
        assert!(ZipCode::try_from("3316".to_string()).is_err());
        assert!(ZipCode::try_from("3316a".to_string()).is_err());
        assert!(ZipCode::try_from("33162".to_string()).is_ok());
    }
}
