//! Session handlers.
//!
//! Passwordless login for applicants:
//!
//! ## Commands
//! - Requesting an OTP for an email or phone
//! - Verifying an OTP and minting a session token
//! - Revoking a session token (logout)
//! - Purging expired challenges and tokens
//!
//! ## Queries
//! - Authorizing a bearer token

mod authorize;
mod purge_expired;
mod request_otp;
mod revoke_token;
mod verify_otp;

use std::time::Duration;

use crate::config::SessionConfig;

pub use authorize::{AuthorizeHandler, AuthorizeQuery, AuthorizeResult};
pub use purge_expired::{PurgeExpiredHandler, PurgeExpiredResult};
pub use request_otp::{RequestOtpCommand, RequestOtpHandler, RequestOtpResult};
pub use revoke_token::{RevokeTokenCommand, RevokeTokenHandler, RevokeTokenResult};
pub use verify_otp::{VerifyOtpCommand, VerifyOtpHandler, VerifyOtpResult};

/// Parameters the session handlers run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    pub otp_length: usize,
    pub otp_ttl_secs: u64,
    pub otp_max_attempts: u32,
    pub token_ttl_secs: u64,
    pub notifier_timeout: Duration,
}

impl SessionPolicy {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            otp_length: config.otp_length,
            otp_ttl_secs: config.otp_ttl_secs,
            otp_max_attempts: config.otp_max_attempts,
            token_ttl_secs: config.token_ttl_secs,
            notifier_timeout: Duration::from_secs(config.notifier_timeout_secs),
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
