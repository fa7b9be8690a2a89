//! Confirmation error types.

use crate::domain::applicant::ApplicantStatus;
use crate::domain::foundation::{DomainError, ErrorCode, ErrorKind, RegistrationId, ValidationError};

/// Errors raised by the confirmation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// No code with this value was ever issued.
    UnknownCode,

    /// No applicant has this registration id.
    UnknownRegistration(RegistrationId),

    /// The code passed its TTL before being used.
    Expired,

    /// Applicant is not (or no longer) waiting to confirm.
    ApplicantNotEligible {
        registration_id: RegistrationId,
        status: ApplicantStatus,
    },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ConfirmationError {
    pub fn unknown_registration(id: RegistrationId) -> Self {
        ConfirmationError::UnknownRegistration(id)
    }

    pub fn not_eligible(registration_id: RegistrationId, status: ApplicantStatus) -> Self {
        ConfirmationError::ApplicantNotEligible {
            registration_id,
            status,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ConfirmationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfirmationError::UnknownCode => ErrorCode::ConfirmationCodeNotFound,
            ConfirmationError::UnknownRegistration(_) => ErrorCode::ApplicantNotFound,
            ConfirmationError::Expired => ErrorCode::ConfirmationExpired,
            ConfirmationError::ApplicantNotEligible { .. } => ErrorCode::ApplicantNotEligible,
            ConfirmationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ConfirmationError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ConfirmationError::UnknownCode => "Confirmation code not recognised".to_string(),
            ConfirmationError::UnknownRegistration(id) => {
                format!("No applicant with registration id {}", id)
            }
            ConfirmationError::Expired => "Confirmation code has expired".to_string(),
            ConfirmationError::ApplicantNotEligible {
                registration_id,
                status,
            } => format!(
                "Applicant {} cannot confirm while {}",
                registration_id, status
            ),
            ConfirmationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ConfirmationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the same request may succeed when repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConfirmationError::Infrastructure(_))
    }
}

impl std::fmt::Display for ConfirmationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ConfirmationError {}

impl From<DomainError> for ConfirmationError {
    fn from(err: DomainError) -> Self {
        ConfirmationError::Infrastructure(err.to_string())
    }
}

impl From<ValidationError> for ConfirmationError {
    fn from(err: ValidationError) -> Self {
        ConfirmationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ConfirmationError> for DomainError {
    fn from(err: ConfirmationError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_kinds() {
        assert_eq!(ConfirmationError::UnknownCode.kind(), ErrorKind::NotFound);
        assert_eq!(ConfirmationError::Expired.kind(), ErrorKind::Conflict);
        assert_eq!(ConfirmationError::UnknownCode.code().to_string(), "UNKNOWN_CODE");
    }

    #[test]
    fn not_eligible_names_status() {
        let err = ConfirmationError::not_eligible(
            RegistrationId::parse("REG-7KQ2MX9P").unwrap(),
            ApplicantStatus::Withdrawn,
        );
        assert_eq!(err.message(), "Applicant REG-7KQ2MX9P cannot confirm while withdrawn");
    }
}
