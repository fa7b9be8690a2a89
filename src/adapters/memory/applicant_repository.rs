//! In-memory applicant repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::applicant::{Applicant, LoginIdentifier};
use crate::domain::foundation::{ApplicantId, DomainError, ErrorCode, RegistrationId};
use crate::domain::stage::SelectionRecord;
use crate::ports::{ApplicantRepository, CommitOutcome, InsertOutcome};

#[derive(Debug, Default)]
struct Tables {
    applicants: HashMap<ApplicantId, Applicant>,
    by_identifier: HashMap<String, ApplicantId>,
    by_registration: HashMap<RegistrationId, ApplicantId>,
    selections: HashMap<ApplicantId, Vec<SelectionRecord>>,
}

impl Tables {
    fn versioned_write(
        &mut self,
        applicant: &Applicant,
        expected_version: u64,
    ) -> Result<Result<Applicant, u64>, DomainError> {
        let stored = self.applicants.get_mut(&applicant.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ApplicantNotFound,
                format!("Applicant {} not found", applicant.id),
            )
        })?;

        if stored.version != expected_version {
            return Ok(Err(stored.version));
        }

        let mut next = applicant.clone();
        next.version = expected_version + 1;
        *stored = next.clone();
        Ok(Ok(next))
    }
}

/// Applicants and their selection history, guarded by one lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicantRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryApplicantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored applicants (useful for tests)
    pub async fn count(&self) -> usize {
        self.tables.read().await.applicants.len()
    }
}

#[async_trait]
impl ApplicantRepository for InMemoryApplicantRepository {
    async fn insert(&self, applicant: &Applicant) -> Result<InsertOutcome, DomainError> {
        let mut tables = self.tables.write().await;

        let identifiers = applicant.identifiers();
        if let Some(taken) = identifiers
            .iter()
            .find(|id| tables.by_identifier.contains_key(&id.storage_key()))
        {
            return Ok(InsertOutcome::IdentifierTaken(taken.clone()));
        }
        if tables.applicants.contains_key(&applicant.id)
            || tables.by_registration.contains_key(&applicant.registration_id)
        {
            return Err(DomainError::storage(format!(
                "Applicant {} already stored",
                applicant.id
            )));
        }

        for identifier in &identifiers {
            tables
                .by_identifier
                .insert(identifier.storage_key(), applicant.id);
        }
        tables
            .by_registration
            .insert(applicant.registration_id.clone(), applicant.id);

        let mut stored = applicant.clone();
        stored.version = 0;
        tables.applicants.insert(applicant.id, stored);
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_id(&self, id: &ApplicantId) -> Result<Option<Applicant>, DomainError> {
        Ok(self.tables.read().await.applicants.get(id).cloned())
    }

    async fn find_by_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<Applicant>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_registration
            .get(registration_id)
            .and_then(|id| tables.applicants.get(id))
            .cloned())
    }

    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Applicant>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_identifier
            .get(&identifier.storage_key())
            .and_then(|id| tables.applicants.get(id))
            .cloned())
    }

    async fn update(
        &self,
        applicant: &Applicant,
        expected_version: u64,
    ) -> Result<CommitOutcome, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(match tables.versioned_write(applicant, expected_version)? {
            Ok(stored) => CommitOutcome::Committed(stored),
            Err(current_version) => CommitOutcome::VersionConflict { current_version },
        })
    }

    async fn commit_selection(
        &self,
        record: &SelectionRecord,
        applicant: &Applicant,
        expected_version: u64,
    ) -> Result<CommitOutcome, DomainError> {
        if record.applicant_id != applicant.id {
            return Err(DomainError::storage(
                "Selection record belongs to a different applicant",
            ));
        }

        let mut tables = self.tables.write().await;
        match tables.versioned_write(applicant, expected_version)? {
            Ok(stored) => {
                tables
                    .selections
                    .entry(applicant.id)
                    .or_default()
                    .push(record.clone());
                Ok(CommitOutcome::Committed(stored))
            }
            Err(current_version) => Ok(CommitOutcome::VersionConflict { current_version }),
        }
    }

    async fn selection_history(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<SelectionRecord>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .selections
            .get(applicant_id)
            .cloned()
            .unwrap_or_default())
    }
}
