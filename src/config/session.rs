//! Session configuration (OTP issuance and session tokens)

use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::session::{MAX_OTP_LENGTH, MIN_OTP_LENGTH};

const MIN_SECRET_LEN: usize = 32;

/// OTP and token parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Digits per OTP code
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,

    /// Seconds an OTP stays valid
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_secs: u64,

    /// Wrong attempts allowed before the OTP is invalidated
    #[serde(default = "default_max_attempts")]
    pub otp_max_attempts: u32,

    /// OTP requests allowed per identifier per window
    #[serde(default = "default_requests_per_window")]
    pub otp_requests_per_window: u32,

    /// Rolling window for OTP requests, in seconds
    #[serde(default = "default_request_window")]
    pub otp_request_window_secs: u64,

    /// Absolute session token lifetime, in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// HMAC key for OTP hashes; required in production
    pub otp_secret: Option<SecretString>,

    /// Upper bound on a single notifier call, in seconds
    #[serde(default = "default_notifier_timeout")]
    pub notifier_timeout_secs: u64,
}

impl SessionConfig {
    /// The configured OTP key, or a random per-process key when unset.
    ///
    /// A random key means outstanding codes do not survive a restart.
    pub fn otp_key(&self) -> SecretString {
        match &self.otp_secret {
            Some(secret) => SecretString::new(secret.expose_secret().clone()),
            None => {
                let mut bytes = [0u8; 32];
                rand::rngs::OsRng.fill_bytes(&mut bytes);
                SecretString::new(hex::encode(bytes))
            }
        }
    }

    /// Validate session configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !(MIN_OTP_LENGTH..=MAX_OTP_LENGTH).contains(&self.otp_length) {
            return Err(ValidationError::InvalidOtpLength {
                min: MIN_OTP_LENGTH,
                max: MAX_OTP_LENGTH,
            });
        }
        if self.otp_ttl_secs == 0 {
            return Err(ValidationError::InvalidTtl("session.otp_ttl_secs"));
        }
        if self.token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTtl("session.token_ttl_secs"));
        }
        if self.otp_max_attempts == 0 || self.otp_max_attempts > 20 {
            return Err(ValidationError::InvalidAttempts);
        }
        if self.otp_requests_per_window == 0 || self.otp_request_window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        if self.notifier_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("session.notifier_timeout_secs"));
        }
        match &self.otp_secret {
            Some(secret) if secret.expose_secret().len() < MIN_SECRET_LEN => {
                Err(ValidationError::WeakOtpSecret)
            }
            None if production => Err(ValidationError::MissingRequired("SESSION__OTP_SECRET")),
            _ => Ok(()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            otp_length: default_otp_length(),
            otp_ttl_secs: default_otp_ttl(),
            otp_max_attempts: default_max_attempts(),
            otp_requests_per_window: default_requests_per_window(),
            otp_request_window_secs: default_request_window(),
            token_ttl_secs: default_token_ttl(),
            otp_secret: None,
            notifier_timeout_secs: default_notifier_timeout(),
        }
    }
}

fn default_otp_length() -> usize {
    6
}

fn default_otp_ttl() -> u64 {
    600
}

fn default_max_attempts() -> u32 {
    5
}

fn default_requests_per_window() -> u32 {
    5
}

fn default_request_window() -> u64 {
    900
}

fn default_token_ttl() -> u64 {
    12 * 60 * 60
}

fn default_notifier_timeout() -> u64 {
    5
}
