//! Applicant repository port.
//!
//! Persists applicants and their append-only selection history.
//!
//! # Design
//!
//! - **Unique identifiers**: an email or phone belongs to at most one applicant
//! - **Optimistic locking**: every write names the version it was based on
//! - **Atomic selection commit**: record append and applicant update succeed
//!   or fail together

use async_trait::async_trait;

use crate::domain::applicant::{Applicant, LoginIdentifier};
use crate::domain::foundation::{ApplicantId, DomainError, RegistrationId};
use crate::domain::stage::SelectionRecord;

/// Result of inserting a new applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another applicant already uses this identifier.
    IdentifierTaken(LoginIdentifier),
}

/// Result of a versioned write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Stored; carries the applicant with its new version.
    Committed(Applicant),
    /// Someone else wrote first; nothing was stored.
    VersionConflict { current_version: u64 },
}

#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    /// Inserts a new applicant at version 0.
    async fn insert(&self, applicant: &Applicant) -> Result<InsertOutcome, DomainError>;

    async fn find_by_id(&self, id: &ApplicantId) -> Result<Option<Applicant>, DomainError>;

    async fn find_by_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<Applicant>, DomainError>;

    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Applicant>, DomainError>;

    /// Stores `applicant` if the stored version still equals `expected_version`.
    ///
    /// # Errors
    ///
    /// `ApplicantNotFound` if the applicant does not exist.
    async fn update(
        &self,
        applicant: &Applicant,
        expected_version: u64,
    ) -> Result<CommitOutcome, DomainError>;

    /// Appends `record` and stores `applicant` in one step, guarded by
    /// `expected_version` like [`update`](Self::update).
    async fn commit_selection(
        &self,
        record: &SelectionRecord,
        applicant: &Applicant,
        expected_version: u64,
    ) -> Result<CommitOutcome, DomainError>;

    /// Selection records for one applicant, oldest first.
    async fn selection_history(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<SelectionRecord>, DomainError>;
}
