//! Rate limiting port.
//!
//! Limits are rolling windows: a request is allowed when fewer than
//! `limit` requests with the same key were allowed in the last
//! `window_secs` seconds.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::applicant::LoginIdentifier;
use crate::domain::foundation::Timestamp;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Checks the key, counting the request if it is allowed.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Current quota without counting a request.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Forgets all requests counted for the key.
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;

    /// Drops keys with no request left inside their window. Returns how
    /// many keys went.
    async fn purge_idle(&self) -> Result<usize, RateLimitError>;
}

/// Key identifying what to rate limit.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// OTP requests for one login identifier.
    OtpRequest,
    /// Requests from one client address.
    Ip,
}

impl RateLimitKey {
    pub fn otp_request(identifier: &LoginIdentifier) -> Self {
        Self {
            scope: RateLimitScope::OtpRequest,
            identifier: identifier.storage_key(),
        }
    }

    pub fn ip(ip: &str) -> Self {
        Self {
            scope: RateLimitScope::Ip,
            identifier: ip.to_string(),
        }
    }
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::OtpRequest => "otp_request",
            RateLimitScope::Ip => "ip",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// When the oldest counted request leaves the window.
    pub reset_at: Timestamp,
    pub window_secs: u64,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    pub retry_after_secs: u64,
    pub scope: RateLimitScope,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),

    #[error("no limit configured for scope {0}")]
    UnknownScope(RateLimitScope),
}
