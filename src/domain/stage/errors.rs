//! Stage engine error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UnknownApplicant | 404 |
//! | StageMismatch, AlreadyTerminal, PaymentOutstanding, AlreadyRegistered | 409 |
//! | InvalidNextStage, ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::applicant::ApplicantStatus;
use crate::domain::foundation::{ApplicantId, DomainError, ErrorCode, ErrorKind, ValidationError};

use super::StageIndex;

/// Errors raised by stage progression operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// No applicant matches the given id or registration reference.
    UnknownApplicant(String),

    /// Decision was made against a stage the applicant is no longer (or not yet) in.
    StageMismatch {
        applicant_id: ApplicantId,
        current: StageIndex,
        claimed: StageIndex,
    },

    /// Applicant is eliminated, withdrawn or confirmed.
    AlreadyTerminal {
        applicant_id: ApplicantId,
        status: ApplicantStatus,
    },

    /// The fee for the current stage has not been settled.
    PaymentOutstanding(ApplicantId),

    /// `selected` decision targets an unknown stage or does not move forward.
    InvalidNextStage { from: StageIndex, to: StageIndex },

    /// Email or phone already belongs to another applicant.
    AlreadyRegistered(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl StageError {
    pub fn unknown_applicant(reference: impl Into<String>) -> Self {
        StageError::UnknownApplicant(reference.into())
    }

    pub fn stage_mismatch(applicant_id: ApplicantId, current: StageIndex, claimed: StageIndex) -> Self {
        StageError::StageMismatch {
            applicant_id,
            current,
            claimed,
        }
    }

    pub fn already_terminal(applicant_id: ApplicantId, status: ApplicantStatus) -> Self {
        StageError::AlreadyTerminal {
            applicant_id,
            status,
        }
    }

    pub fn payment_outstanding(applicant_id: ApplicantId) -> Self {
        StageError::PaymentOutstanding(applicant_id)
    }

    pub fn invalid_next_stage(from: StageIndex, to: StageIndex) -> Self {
        StageError::InvalidNextStage { from, to }
    }

    pub fn already_registered(identifier: impl Into<String>) -> Self {
        StageError::AlreadyRegistered(identifier.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StageError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        StageError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            StageError::UnknownApplicant(_) => ErrorCode::ApplicantNotFound,
            StageError::StageMismatch { .. } => ErrorCode::StageMismatch,
            StageError::AlreadyTerminal { .. } => ErrorCode::ApplicantTerminal,
            StageError::PaymentOutstanding(_) => ErrorCode::PaymentOutstanding,
            StageError::InvalidNextStage { .. } => ErrorCode::InvalidNextStage,
            StageError::AlreadyRegistered(_) => ErrorCode::AlreadyRegistered,
            StageError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            StageError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            StageError::UnknownApplicant(reference) => {
                format!("Applicant not found: {}", reference)
            }
            StageError::StageMismatch {
                current, claimed, ..
            } => format!(
                "Decision is for stage {} but the applicant is at stage {}",
                claimed, current
            ),
            StageError::AlreadyTerminal { status, .. } => {
                format!("Applicant is already {}", status)
            }
            StageError::PaymentOutstanding(_) => {
                "The fee for the current stage has not been paid".to_string()
            }
            StageError::InvalidNextStage { from, to } => {
                format!("Cannot select from stage {} into stage {}", from, to)
            }
            StageError::AlreadyRegistered(identifier) => {
                format!("{} is already registered", identifier)
            }
            StageError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            StageError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the same request may succeed when repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StageError::Infrastructure(_))
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for StageError {}

impl From<DomainError> for StageError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => StageError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => StageError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for StageError {
    fn from(err: ValidationError) -> Self {
        StageError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<StageError> for DomainError {
    fn from(err: StageError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
