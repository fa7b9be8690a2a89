//! Payment type labels and monetary amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MAX_PAYMENT_TYPE_LEN: usize = 40;

/// Label identifying what a payment is for (e.g. `final_round_fee`).
///
/// Lowercase ASCII letters, digits and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentType(String);

impl PaymentType {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = raw.as_ref().trim().to_lowercase();
        if value.is_empty() {
            return Err(ValidationError::empty_field("payment_type"));
        }
        if value.len() > MAX_PAYMENT_TYPE_LEN {
            return Err(ValidationError::invalid_format("payment_type", "label too long"));
        }
        if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(ValidationError::invalid_format(
                "payment_type",
                "only lowercase letters, digits and underscores are allowed",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PaymentType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PaymentType> for String {
    fn from(value: PaymentType) -> Self {
        value.0
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive amount in minor currency units (cents, paise).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount_minor: i64,
    pub currency: String,
}

impl Money {
    pub fn new(amount_minor: i64, currency: impl AsRef<str>) -> Result<Self, ValidationError> {
        if amount_minor <= 0 {
            return Err(ValidationError::out_of_range("amount_minor", 1, i64::MAX, amount_minor));
        }
        let currency = currency.as_ref().trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO 4217 code",
            ));
        }
        Ok(Self {
            amount_minor,
            currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.currency
        )
    }
}
