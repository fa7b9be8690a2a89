//! Payment ledger error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UnknownOrder, UnknownApplicant | 404 |
//! | DuplicateActiveOrder, InvalidTransition, NotEligible | 409 |
//! | GatewayUnavailable | 503 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    ApplicantId, DomainError, ErrorCode, ErrorKind, OrderId, ValidationError,
};

use super::{PaymentStatus, PaymentType};

/// Errors raised by payment ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Order was not found.
    UnknownOrder(OrderId),

    /// Applicant referenced by the order request does not exist.
    UnknownApplicant(ApplicantId),

    /// A created or pending order already exists for this applicant and payment type.
    DuplicateActiveOrder {
        applicant_id: ApplicantId,
        payment_type: PaymentType,
        existing: OrderId,
    },

    /// Reported or requested status change is not a forward move.
    InvalidTransition {
        order_id: OrderId,
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// Applicant has no outstanding fee of this type.
    NotEligible {
        applicant_id: ApplicantId,
        reason: String,
    },

    /// Gateway call failed or timed out. Nothing was stored.
    GatewayUnavailable(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl LedgerError {
    pub fn unknown_order(id: OrderId) -> Self {
        LedgerError::UnknownOrder(id)
    }

    pub fn unknown_applicant(id: ApplicantId) -> Self {
        LedgerError::UnknownApplicant(id)
    }

    pub fn duplicate_active_order(
        applicant_id: ApplicantId,
        payment_type: PaymentType,
        existing: OrderId,
    ) -> Self {
        LedgerError::DuplicateActiveOrder {
            applicant_id,
            payment_type,
            existing,
        }
    }

    pub fn invalid_transition(order_id: OrderId, from: PaymentStatus, to: PaymentStatus) -> Self {
        LedgerError::InvalidTransition { order_id, from, to }
    }

    pub fn not_eligible(applicant_id: ApplicantId, reason: impl Into<String>) -> Self {
        LedgerError::NotEligible {
            applicant_id,
            reason: reason.into(),
        }
    }

    pub fn gateway_unavailable(reason: impl Into<String>) -> Self {
        LedgerError::GatewayUnavailable(reason.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        LedgerError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::UnknownOrder(_) => ErrorCode::OrderNotFound,
            LedgerError::UnknownApplicant(_) => ErrorCode::ApplicantNotFound,
            LedgerError::DuplicateActiveOrder { .. } => ErrorCode::DuplicateActiveOrder,
            LedgerError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            LedgerError::NotEligible { .. } => ErrorCode::ApplicantNotEligible,
            LedgerError::GatewayUnavailable(_) => ErrorCode::GatewayUnavailable,
            LedgerError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            LedgerError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            LedgerError::UnknownOrder(id) => format!("Payment order not found: {}", id),
            LedgerError::UnknownApplicant(id) => format!("Applicant not found: {}", id),
            LedgerError::DuplicateActiveOrder {
                payment_type,
                existing,
                ..
            } => format!(
                "An active {} order already exists: {}",
                payment_type, existing
            ),
            LedgerError::InvalidTransition { order_id, from, to } => format!(
                "Order {} cannot move from {} to {}",
                order_id, from, to
            ),
            LedgerError::NotEligible { reason, .. } => {
                format!("Applicant is not eligible for this payment: {}", reason)
            }
            LedgerError::GatewayUnavailable(reason) => {
                format!("Payment gateway unavailable: {}", reason)
            }
            LedgerError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            LedgerError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the same request may succeed when repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::GatewayUnavailable(_) | LedgerError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LedgerError {}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => LedgerError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => LedgerError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for DomainError {
    fn from(err: LedgerError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_active_order_is_a_conflict() {
        let err = LedgerError::duplicate_active_order(
            ApplicantId::new(),
            PaymentType::new("final_round_fee").unwrap(),
            OrderId::new(),
        );
        assert_eq!(err.code(), ErrorCode::DuplicateActiveOrder);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(!err.is_retryable());
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = LedgerError::invalid_transition(
            OrderId::new(),
            PaymentStatus::Success,
            PaymentStatus::Failed,
        );
        assert!(err.message().contains("success"));
        assert!(err.message().contains("failed"));
        assert_eq!(err.code().to_string(), "INVALID_TRANSITION");
    }

    #[test]
    fn gateway_unavailable_is_retryable_upstream() {
        let err = LedgerError::gateway_unavailable("timed out after 10s");
        assert!(err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn storage_domain_error_becomes_infrastructure() {
        let err: LedgerError = DomainError::storage("lock poisoned").into();
        assert!(matches!(err, LedgerError::Infrastructure(_)));
    }
}
