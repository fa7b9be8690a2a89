//! Confirmation code repository port.
//!
//! One code per registration; codes are unique across registrations.

use async_trait::async_trait;

use crate::domain::confirmation::{ConfirmationCode, ConfirmationStatus};
use crate::domain::foundation::{DomainError, RegistrationId};

/// Result of storing a freshly issued code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    Stored,
    /// The registration already has a live code; carries it.
    ExistingLive(ConfirmationCode),
    /// The random code collides with another registration's; draw again.
    CodeCollision,
}

#[async_trait]
pub trait ConfirmationRepository: Send + Sync {
    /// Stores `code` unless the registration still has a code that is live
    /// as of `code.issued_at`. A lapsed or expired code is replaced, and
    /// the replaced code stays findable by `find_by_code` as expired. A
    /// code is never handed out twice.
    async fn store_issued(&self, code: &ConfirmationCode) -> Result<IssueOutcome, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ConfirmationCode>, DomainError>;

    async fn find_by_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<ConfirmationCode>, DomainError>;

    /// Stores `updated` if the stored status is still `expected`.
    /// Returns false when another caller moved it first.
    async fn compare_and_set(
        &self,
        expected: ConfirmationStatus,
        updated: &ConfirmationCode,
    ) -> Result<bool, DomainError>;
}
