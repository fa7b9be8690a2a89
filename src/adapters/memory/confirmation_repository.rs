//! In-memory confirmation code repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::confirmation::{ConfirmationCode, ConfirmationStatus};
use crate::domain::foundation::{DomainError, ErrorCode, RegistrationId};
use crate::ports::{ConfirmationRepository, IssueOutcome};

#[derive(Debug, Default)]
struct Tables {
    by_registration: HashMap<RegistrationId, ConfirmationCode>,
    /// code -> registration
    codes: HashMap<String, RegistrationId>,
    /// Codes replaced by a newer one, kept as expired.
    retired: HashMap<String, ConfirmationCode>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryConfirmationRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryConfirmationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfirmationRepository for InMemoryConfirmationRepository {
    async fn store_issued(&self, code: &ConfirmationCode) -> Result<IssueOutcome, DomainError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.by_registration.get(&code.registration_id) {
            if existing.is_live(&code.issued_at) || existing.status == ConfirmationStatus::Confirmed {
                return Ok(IssueOutcome::ExistingLive(existing.clone()));
            }
        }
        if tables.retired.contains_key(&code.code)
            || tables
                .codes
                .get(&code.code)
                .is_some_and(|owner| *owner != code.registration_id)
        {
            return Ok(IssueOutcome::CodeCollision);
        }

        if let Some(mut replaced) = tables
            .by_registration
            .insert(code.registration_id.clone(), code.clone())
        {
            tables.codes.remove(&replaced.code);
            replaced.status = ConfirmationStatus::Expired;
            tables.retired.insert(replaced.code.clone(), replaced);
        }
        tables
            .codes
            .insert(code.code.clone(), code.registration_id.clone());
        Ok(IssueOutcome::Stored)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ConfirmationCode>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .codes
            .get(code)
            .and_then(|reg| tables.by_registration.get(reg))
            .or_else(|| tables.retired.get(code))
            .cloned())
    }

    async fn find_by_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<ConfirmationCode>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .by_registration
            .get(registration_id)
            .cloned())
    }

    async fn compare_and_set(
        &self,
        expected: ConfirmationStatus,
        updated: &ConfirmationCode,
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .by_registration
            .get_mut(&updated.registration_id)
            .filter(|c| c.code == updated.code)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ConfirmationCodeNotFound,
                    "Confirmation code not found",
                )
            })?;

        if stored.status != expected {
            return Ok(false);
        }
        *stored = updated.clone();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ApplicantId, Timestamp};

    fn issue(reg: &RegistrationId, now: Timestamp) -> ConfirmationCode {
        ConfirmationCode::issue(reg.clone(), ApplicantId::new(), 3600, now)
    }

    #[tokio::test]
    async fn live_code_is_kept() {
        let repo = InMemoryConfirmationRepository::new();
        let reg = RegistrationId::generate();
        let now = Timestamp::now();
        let first = issue(&reg, now);
        assert_eq!(repo.store_issued(&first).await.unwrap(), IssueOutcome::Stored);

        match repo.store_issued(&issue(&reg, now)).await.unwrap() {
            IssueOutcome::ExistingLive(existing) => assert_eq!(existing.code, first.code),
            other => panic!("expected ExistingLive, got {:?}", other),
        }
        assert!(repo.find_by_code(&first.code).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lapsed_code_is_replaced() {
        let repo = InMemoryConfirmationRepository::new();
        let reg = RegistrationId::generate();
        let issued = Timestamp::now().minus_secs(7200);
        let old = issue(&reg, issued);
        repo.store_issued(&old).await.unwrap();

        let fresh = issue(&reg, Timestamp::now());
        assert_eq!(repo.store_issued(&fresh).await.unwrap(), IssueOutcome::Stored);

        // The replaced code is still known, as expired
        let retired = repo.find_by_code(&old.code).await.unwrap().unwrap();
        assert_eq!(retired.status, ConfirmationStatus::Expired);
        assert_eq!(
            repo.find_by_registration(&reg).await.unwrap().unwrap().code,
            fresh.code
        );
    }

    #[tokio::test]
    async fn compare_and_set_rejects_stale_status() {
        let repo = InMemoryConfirmationRepository::new();
        let reg = RegistrationId::generate();
        let code = issue(&reg, Timestamp::now());
        repo.store_issued(&code).await.unwrap();

        let mut confirmed = code.clone();
        confirmed.status = ConfirmationStatus::Confirmed;
        assert!(repo.compare_and_set(ConfirmationStatus::Pending, &confirmed).await.unwrap());
        assert!(!repo.compare_and_set(ConfirmationStatus::Pending, &confirmed).await.unwrap());
    }

    #[tokio::test]
    async fn retired_code_is_never_reissued() {
        let repo = InMemoryConfirmationRepository::new();
        let reg = RegistrationId::generate();
        let old = issue(&reg, Timestamp::now().minus_secs(7200));
        repo.store_issued(&old).await.unwrap();
        repo.store_issued(&issue(&reg, Timestamp::now())).await.unwrap();

        let mut reused = issue(&RegistrationId::generate(), Timestamp::now());
        reused.code = old.code.clone();
        assert_eq!(repo.store_issued(&reused).await.unwrap(), IssueOutcome::CodeCollision);
    }
}
