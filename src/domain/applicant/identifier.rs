//! Login identifiers: email addresses and phone numbers.
//!
//! Both normalize to a canonical form on construction so that storage
//! lookups, rate-limit keys and OTP hashes agree on a single spelling:
//!
//! - Email: trimmed and lowercased.
//! - Phone: international form `+<digits>`; separators are dropped and a
//!   leading `00` is read as `+`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MAX_EMAIL_LEN: usize = 254;
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if normalized.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::invalid_format("email", "address too long"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;

        if local.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format("email", "malformed local part"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ValidationError::invalid_format("email", "malformed domain"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phone number in canonical international form (`+<8-15 digits>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }

        let compact: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        let digits = if let Some(rest) = compact.strip_prefix('+') {
            rest
        } else if let Some(rest) = compact.strip_prefix("00") {
            rest
        } else {
            return Err(ValidationError::invalid_format(
                "phone",
                "must include the country code (+ or 00 prefix)",
            ));
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("phone", "contains non-digit characters"));
        }
        if digits.starts_with('0') {
            return Err(ValidationError::invalid_format("phone", "country code cannot start with 0"));
        }
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::out_of_range(
                "phone_digits",
                MIN_PHONE_DIGITS as i64,
                MAX_PHONE_DIGITS as i64,
                digits.len() as i64,
            ));
        }

        Ok(Self(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either identifier an applicant may log in with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LoginIdentifier {
    Email(EmailAddress),
    Phone(PhoneNumber),
}

impl LoginIdentifier {
    /// Parses free-form input: anything containing `@` is treated as an email.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::empty_field("identifier"));
        }
        if raw.contains('@') {
            EmailAddress::parse(raw).map(LoginIdentifier::Email)
        } else {
            PhoneNumber::parse(raw).map(LoginIdentifier::Phone)
        }
    }

    /// Stable storage key, distinct across the two kinds.
    pub fn storage_key(&self) -> String {
        match self {
            LoginIdentifier::Email(email) => format!("email:{}", email),
            LoginIdentifier::Phone(phone) => format!("phone:{}", phone),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoginIdentifier::Email(email) => email.as_str(),
            LoginIdentifier::Phone(phone) => phone.as_str(),
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EmailAddress> for LoginIdentifier {
    fn from(email: EmailAddress) -> Self {
        LoginIdentifier::Email(email)
    }
}

impl From<PhoneNumber> for LoginIdentifier {
    fn from(phone: PhoneNumber) -> Self {
        LoginIdentifier::Phone(phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn email_is_lowercased_and_trimmed() {
        let email = EmailAddress::parse("  Ada.Lovelace@Example.ORG ").unwrap();
        assert_eq!(email.as_str(), "ada.lovelace@example.org");
    }

    #[test]
    fn email_requires_at_and_dotted_domain() {
        assert!(EmailAddress::parse("no-at-sign.example.com").is_err());
        assert!(EmailAddress::parse("user@localhost").is_err());
        assert!(EmailAddress::parse("@example.com").is_err());
        assert!(EmailAddress::parse("a@b@example.com").is_err());
        assert!(EmailAddress::parse("user@example.").is_err());
    }

    #[test]
    fn phone_strips_separators() {
        let phone = PhoneNumber::parse("+91 (98765) 432-10").unwrap();
        assert_eq!(phone.as_str(), "+919876543210");
    }

    #[test]
    fn phone_reads_double_zero_as_plus() {
        let phone = PhoneNumber::parse("0044 20 7946 0958").unwrap();
        assert_eq!(phone.as_str(), "+442079460958");
    }

    #[test]
    fn phone_requires_country_code() {
        let err = PhoneNumber::parse("9876543210").unwrap_err();
        assert_eq!(err.field(), "phone");
    }

    #[test]
    fn phone_rejects_bad_lengths_and_letters() {
        assert!(PhoneNumber::parse("+1234").is_err());
        assert!(PhoneNumber::parse("+1234567890123456").is_err());
        assert!(PhoneNumber::parse("+91 98765 ABCDE").is_err());
    }

    #[test]
    fn login_identifier_dispatches_on_at_sign() {
        assert!(matches!(
            LoginIdentifier::parse("x@example.com").unwrap(),
            LoginIdentifier::Email(_)
        ));
        assert!(matches!(
            LoginIdentifier::parse("+14155550100").unwrap(),
            LoginIdentifier::Phone(_)
        ));
        assert!(LoginIdentifier::parse("   ").is_err());
    }

    #[test]
    fn storage_keys_do_not_collide_across_kinds() {
        let email = LoginIdentifier::parse("a@example.com").unwrap();
        let phone = LoginIdentifier::parse("+14155550100").unwrap();
        assert_ne!(email.storage_key(), phone.storage_key());
        assert_eq!(phone.storage_key(), "phone:+14155550100");
    }

    proptest! {
        #[test]
        fn email_normalization_is_idempotent(local in "[A-Za-z0-9._]{1,20}", domain in "[A-Za-z]{1,10}\\.[A-Za-z]{2,4}") {
            let raw = format!("{}@{}", local, domain);
            let once = EmailAddress::parse(&raw).unwrap();
            let twice = EmailAddress::parse(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn phone_normalization_ignores_spacing(digits in "[1-9][0-9]{7,14}") {
            let plain = PhoneNumber::parse(&format!("+{}", digits)).unwrap();
            let spaced: String = digits
                .chars()
                .enumerate()
                .flat_map(|(i, c)| if i % 3 == 2 { vec![c, ' '] } else { vec![c] })
                .collect();
            let formatted = PhoneNumber::parse(&format!("00{}", spaced)).unwrap();
            prop_assert_eq!(plain, formatted);
        }
    }
}
