//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Broad error category, shared by every component error.
///
/// Transports map kinds to status codes; callers use them to decide
/// whether a retry can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, rejected before any state change.
    Input,
    /// Request conflicts with current state; nothing was applied.
    Conflict,
    /// Referenced entity does not exist.
    NotFound,
    /// Caller exceeded a request quota.
    RateLimited,
    /// Credential or challenge failure.
    Security,
    /// External collaborator failed or timed out; safe to retry.
    Upstream,
    /// Storage or other internal failure.
    Internal,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,
    InvalidNextStage,

    // Not found errors
    ApplicantNotFound,
    OrderNotFound,
    ConfirmationCodeNotFound,

    // Conflict errors
    AlreadyRegistered,
    StageMismatch,
    ApplicantTerminal,
    DuplicateActiveOrder,
    InvalidStateTransition,
    ApplicantNotEligible,
    PaymentOutstanding,

    // Session errors
    NoActiveChallenge,
    ChallengeExpired,
    CodeMismatch,
    AttemptsExceeded,
    InvalidToken,
    RateLimited,

    // Confirmation errors
    ConfirmationExpired,

    // Upstream errors
    GatewayUnavailable,
    NotifierUnavailable,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl ErrorCode {
    /// Returns the taxonomy bucket for this code.
    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;
        match self {
            ValidationFailed | EmptyField | OutOfRange | InvalidFormat | InvalidNextStage => {
                ErrorKind::Input
            }
            ApplicantNotFound | OrderNotFound | ConfirmationCodeNotFound => ErrorKind::NotFound,
            AlreadyRegistered
            | StageMismatch
            | ApplicantTerminal
            | DuplicateActiveOrder
            | InvalidStateTransition
            | ApplicantNotEligible
            | PaymentOutstanding
            | ConfirmationExpired => ErrorKind::Conflict,
            NoActiveChallenge | ChallengeExpired | CodeMismatch | AttemptsExceeded
            | InvalidToken => ErrorKind::Security,
            RateLimited => ErrorKind::RateLimited,
            GatewayUnavailable | NotifierUnavailable => ErrorKind::Upstream,
            StorageError | InternalError => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidNextStage => "INVALID_NEXT_STAGE",
            ErrorCode::ApplicantNotFound => "UNKNOWN_APPLICANT",
            ErrorCode::OrderNotFound => "UNKNOWN_ORDER",
            ErrorCode::ConfirmationCodeNotFound => "UNKNOWN_CODE",
            ErrorCode::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorCode::StageMismatch => "STAGE_MISMATCH",
            ErrorCode::ApplicantTerminal => "ALREADY_ELIMINATED",
            ErrorCode::DuplicateActiveOrder => "DUPLICATE_ACTIVE_ORDER",
            ErrorCode::InvalidStateTransition => "INVALID_TRANSITION",
            ErrorCode::ApplicantNotEligible => "APPLICANT_NOT_ELIGIBLE",
            ErrorCode::PaymentOutstanding => "PAYMENT_OUTSTANDING",
            ErrorCode::NoActiveChallenge => "NO_ACTIVE_CHALLENGE",
            ErrorCode::ChallengeExpired => "EXPIRED",
            ErrorCode::CodeMismatch => "MISMATCH",
            ErrorCode::AttemptsExceeded => "ATTEMPTS_EXCEEDED",
            ErrorCode::InvalidToken => "INVALID_OR_EXPIRED_TOKEN",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ConfirmationExpired => "CODE_EXPIRED",
            ErrorCode::GatewayUnavailable => "GATEWAY_UNAVAILABLE",
            ErrorCode::NotifierUnavailable => "NOTIFIER_UNAVAILABLE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports return this for infrastructure failures; component errors wrap it.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a storage failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        };
        let field = err.field().to_string();
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}
