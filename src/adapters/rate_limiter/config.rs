//! Rate limit configuration types.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::ports::RateLimitScope;

/// Limits per scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// OTP requests per login identifier.
    pub otp_request: WindowLimit,
    /// Requests per client address.
    pub per_ip: WindowLimit,
}

/// At most `limit` requests in any `window_secs` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLimit {
    pub limit: u32,
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// OTP limits from the session section; per-IP limits stay at defaults.
    pub fn from_session(session: &SessionConfig) -> Self {
        Self {
            otp_request: WindowLimit {
                limit: session.otp_requests_per_window,
                window_secs: session.otp_request_window_secs,
            },
            ..Self::default()
        }
    }

    pub fn limit_for(&self, scope: RateLimitScope) -> WindowLimit {
        match scope {
            RateLimitScope::OtpRequest => self.otp_request,
            RateLimitScope::Ip => self.per_ip,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            otp_request: WindowLimit {
                limit: 5,
                window_secs: 900,
            },
            per_ip: WindowLimit {
                limit: 100,
                window_secs: 60,
            },
        }
    }
}
