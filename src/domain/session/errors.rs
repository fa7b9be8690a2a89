//! Session error types.
//!
//! Errors never carry the login identifier, so responses cannot be used to
//! probe which identifiers are registered.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | NoActiveChallenge, Expired, Mismatch, InvalidOrExpiredToken | 401 |
//! | AttemptsExceeded, RateLimited | 429 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ErrorKind, ValidationError};

/// Errors raised by the session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Too many OTP requests for this identifier in the current window.
    RateLimited { retry_after_secs: u64 },

    /// Nothing to verify: never issued, already used or invalidated.
    NoActiveChallenge,

    /// The challenge passed its TTL.
    Expired,

    /// Wrong code; the challenge is still usable.
    Mismatch { remaining_attempts: u32 },

    /// Wrong code and the attempt budget is spent; the challenge is gone.
    AttemptsExceeded,

    /// Bearer token unknown, revoked or past its expiry.
    InvalidOrExpiredToken,

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        SessionError::RateLimited { retry_after_secs }
    }

    pub fn mismatch(remaining_attempts: u32) -> Self {
        SessionError::Mismatch { remaining_attempts }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::RateLimited { .. } => ErrorCode::RateLimited,
            SessionError::NoActiveChallenge => ErrorCode::NoActiveChallenge,
            SessionError::Expired => ErrorCode::ChallengeExpired,
            SessionError::Mismatch { .. } => ErrorCode::CodeMismatch,
            SessionError::AttemptsExceeded => ErrorCode::AttemptsExceeded,
            SessionError::InvalidOrExpiredToken => ErrorCode::InvalidToken,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SessionError::RateLimited { retry_after_secs } => format!(
                "Too many code requests. Try again in {} seconds",
                retry_after_secs
            ),
            SessionError::NoActiveChallenge => {
                "No active code. Request a new one".to_string()
            }
            SessionError::Expired => "The code has expired. Request a new one".to_string(),
            SessionError::Mismatch { remaining_attempts } => format!(
                "Incorrect code. {} attempt(s) remaining",
                remaining_attempts
            ),
            SessionError::AttemptsExceeded => {
                "Too many incorrect attempts. Request a new code".to_string()
            }
            SessionError::InvalidOrExpiredToken => "Invalid or expired session".to_string(),
            SessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Seconds the caller should wait before trying again, if known.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            SessionError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// Returns true if the same request may succeed when repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::RateLimited { .. } | SessionError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => SessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
