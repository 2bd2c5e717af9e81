use crate::cities::CityName;

/// An SMS-capable phone number in E.164 form.
///
/// Sign-up forms deliver numbers in every imaginable shape
/// ("(305) 555-0133", "305.555.0133", "305-555 0133"), so parsing
/// strips the decoration before normalizing.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PhoneNumber(String);

const STRIPPED_CHARACTERS: [char; 7] = ['-', ' ', '(', ')', '.', '_', '\u{a0}'];

impl PhoneNumber {
    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let stripped: String = value
            .chars()
            .filter(|character| !STRIPPED_CHARACTERS.contains(character))
            .collect();

        let digits = stripped.strip_prefix('+').unwrap_or(&stripped);

        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(format!("{value} is not a valid phone number"));
        }

        if stripped.starts_with('+') {
            return Ok(PhoneNumber(stripped));
        }

        if digits.len() == 11 && digits.starts_with('1') {
            return Ok(PhoneNumber(format!("+{digits}")));
        }

        Ok(PhoneNumber(format!("+1{digits}")))
    }
}

/// A phone number together with the cities it is subscribed to.
#[derive(Clone, Debug)]
pub struct Subscriber {
    pub phone_number: PhoneNumber,
    pub cities: Vec<CityName>,
}

impl Subscriber {
    pub fn subscribes_to(&self, city: &CityName) -> bool {
        self.cities.iter().any(|subscribed| subscribed == city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorated_numbers_are_sanitized() {
        let number = PhoneNumber::try_from("(305) 555-0133".to_string()).unwrap();
        assert_eq!(number.inner(), "+13055550133");

        let number = PhoneNumber::try_from("305.555_0133".to_string()).unwrap();
        assert_eq!(number.inner(), "+13055550133");
    }

    #[test]
    fn country_code_is_not_doubled() {
        let number = PhoneNumber::try_from("1-305-555-0133".to_string()).unwrap();
        assert_eq!(number.inner(), "+13055550133");

        let number = PhoneNumber::try_from("+1 305 555 0133".to_string()).unwrap();
        assert_eq!(number.inner(), "+13055550133");
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert!(PhoneNumber::try_from("call me".to_string()).is_err());
        assert!(PhoneNumber::try_from("".to_string()).is_err());
    }

    #[test]
    fn subscriber_matches_its_cities_exactly() {
        let subscriber = Subscriber {
            phone_number: PhoneNumber::try_from("3055550133".to_string()).unwrap(),
            cities: vec![
                CityName::try_from("North Miami Beach".to_string()).unwrap(),
                CityName::try_from("Aventura".to_string()).unwrap(),
            ],
        };

        let aventura = CityName::try_from("Aventura".to_string()).unwrap();
        let miami = CityName::try_from("Miami".to_string()).unwrap();
        assert!(subscriber.subscribes_to(&aventura));
        assert!(!subscriber.subscribes_to(&miami));
    }
}
