//! ConfirmHandler - Command handler for confirming participation.
//!
//! The code is confirmed first, through a compare-and-set on its status,
//! and the applicant second. Once the code is confirmed, every
//! presentation reports success: an applicant still awaiting confirmation
//! is moved to confirmed, and any other applicant is left as it is.

use std::sync::Arc;

use crate::domain::applicant::{Applicant, ApplicantProfile, ApplicantStatus};
use crate::domain::confirmation::{ConfirmOutcome, ConfirmationCode, ConfirmationError, ConfirmationStatus};
use crate::domain::foundation::Timestamp;
use crate::ports::{ApplicantRepository, CommitOutcome, ConfirmationRepository};

const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct ConfirmCommand {
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmResult {
    pub code: ConfirmationCode,
    pub applicant: ApplicantProfile,
    /// True when the code had been used before.
    pub already_confirmed: bool,
}

pub struct ConfirmHandler {
    codes: Arc<dyn ConfirmationRepository>,
    applicants: Arc<dyn ApplicantRepository>,
}

impl ConfirmHandler {
    pub fn new(codes: Arc<dyn ConfirmationRepository>, applicants: Arc<dyn ApplicantRepository>) -> Self {
        Self { codes, applicants }
    }

    pub async fn handle(&self, cmd: ConfirmCommand) -> Result<ConfirmResult, ConfirmationError> {
        let raw = ConfirmationCode::normalize(&cmd.code);
        if raw.is_empty() {
            return Err(ConfirmationError::ValidationFailed {
                field: "code".to_string(),
                message: "Field 'code' cannot be empty".to_string(),
            });
        }

        for _ in 0..MAX_ATTEMPTS {
            let stored = self
                .codes
                .find_by_code(&raw)
                .await?
                .ok_or(ConfirmationError::UnknownCode)?;
            let applicant = self
                .applicants
                .find_by_id(&stored.applicant_id)
                .await?
                .ok_or_else(|| ConfirmationError::unknown_registration(stored.registration_id.clone()))?;

            match stored.present(Timestamp::now())? {
                ConfirmOutcome::AlreadyConfirmed => {
                    let applicant = self.confirm_applicant(applicant, &stored).await?;
                    return Ok(ConfirmResult {
                        code: stored,
                        applicant: applicant.profile(),
                        already_confirmed: true,
                    });
                }
                ConfirmOutcome::Lapsed(expired) => {
                    self.codes
                        .compare_and_set(ConfirmationStatus::Pending, &expired)
                        .await?;
                    return Err(ConfirmationError::Expired);
                }
                ConfirmOutcome::Confirmed(confirmed) => {
                    if applicant.status != ApplicantStatus::AwaitingConfirmation {
                        return Err(ConfirmationError::not_eligible(
                            applicant.registration_id,
                            applicant.status,
                        ));
                    }
                    if !self
                        .codes
                        .compare_and_set(ConfirmationStatus::Pending, &confirmed)
                        .await?
                    {
                        // Someone else moved the code; look again
                        continue;
                    }

                    let applicant = self.confirm_applicant(applicant, &confirmed).await?;
                    tracing::info!(
                        applicant_id = %applicant.id,
                        registration_id = %applicant.registration_id,
                        "Participation confirmed"
                    );
                    return Ok(ConfirmResult {
                        code: confirmed,
                        applicant: applicant.profile(),
                        already_confirmed: false,
                    });
                }
            }
        }

        Err(ConfirmationError::infrastructure(
            "confirmation code is being updated concurrently, try again",
        ))
    }

    /// Moves an applicant awaiting confirmation to confirmed. The code is
    /// already confirmed, so any other status is returned unchanged.
    async fn confirm_applicant(
        &self,
        mut applicant: Applicant,
        code: &ConfirmationCode,
    ) -> Result<Applicant, ConfirmationError> {
        for _ in 0..MAX_ATTEMPTS {
            if applicant.status != ApplicantStatus::AwaitingConfirmation {
                if applicant.status != ApplicantStatus::Confirmed {
                    tracing::warn!(
                        applicant_id = %applicant.id,
                        status = %applicant.status,
                        "Confirmed code belongs to an applicant no longer awaiting confirmation"
                    );
                }
                return Ok(applicant);
            }

            let expected = applicant.version;
            let mut updated = applicant.clone();
            updated.confirm(Timestamp::now())?;
            match self.applicants.update(&updated, expected).await? {
                CommitOutcome::Committed(stored) => return Ok(stored),
                CommitOutcome::VersionConflict { .. } => {
                    applicant = self
                        .applicants
                        .find_by_id(&code.applicant_id)
                        .await?
                        .ok_or_else(|| {
                            ConfirmationError::unknown_registration(code.registration_id.clone())
                        })?;
                }
            }
        }

        Err(ConfirmationError::infrastructure(
            "applicant is being updated concurrently, try again",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryApplicantRepository, InMemoryConfirmationRepository};
    use crate::domain::applicant::EmailAddress;
    use crate::domain::foundation::{DomainError, RegistrationId};
    use crate::domain::stage::StageIndex;
    use crate::ports::IssueOutcome;
    use async_trait::async_trait;

    /// Withdraws the applicant right after a code is confirmed, before the
    /// handler gets to update them.
    struct WithdrawOnConfirm {
        inner: Arc<InMemoryConfirmationRepository>,
        applicants: Arc<InMemoryApplicantRepository>,
    }

    #[async_trait]
    impl ConfirmationRepository for WithdrawOnConfirm {
        async fn store_issued(&self, code: &ConfirmationCode) -> Result<IssueOutcome, DomainError> {
            self.inner.store_issued(code).await
        }

        async fn find_by_code(&self, code: &str) -> Result<Option<ConfirmationCode>, DomainError> {
            self.inner.find_by_code(code).await
        }

        async fn find_by_registration(
            &self,
            registration_id: &RegistrationId,
        ) -> Result<Option<ConfirmationCode>, DomainError> {
            self.inner.find_by_registration(registration_id).await
        }

        async fn compare_and_set(
            &self,
            expected: ConfirmationStatus,
            updated: &ConfirmationCode,
        ) -> Result<bool, DomainError> {
            let swapped = self.inner.compare_and_set(expected, updated).await?;
            if swapped && updated.status == ConfirmationStatus::Confirmed {
                let mut applicant = self
                    .applicants
                    .find_by_id(&updated.applicant_id)
                    .await?
                    .expect("applicant exists");
                let version = applicant.version;
                applicant.withdraw(Timestamp::now()).expect("withdrawable");
                self.applicants.update(&applicant, version).await?;
            }
            Ok(swapped)
        }
    }

    struct Fixture {
        handler: ConfirmHandler,
        codes: Arc<InMemoryConfirmationRepository>,
        applicants: Arc<InMemoryApplicantRepository>,
        applicant: Applicant,
    }

    async fn fixture() -> Fixture {
        let applicants = Arc::new(InMemoryApplicantRepository::new());
        let mut applicant = Applicant::register(
            Some(EmailAddress::parse("ada@example.com").unwrap()),
            None,
            None,
            Timestamp::now(),
        )
        .unwrap();
        applicant.current_stage = StageIndex::new(3);
        applicant.status = ApplicantStatus::AwaitingConfirmation;
        applicants.insert(&applicant).await.unwrap();

        let codes = Arc::new(InMemoryConfirmationRepository::new());
        Fixture {
            handler: ConfirmHandler::new(codes.clone(), applicants.clone()),
            codes,
            applicants,
            applicant,
        }
    }

    async fn issue(f: &Fixture, ttl_secs: u64, issued_at: Timestamp) -> ConfirmationCode {
        let code = ConfirmationCode::issue(
            f.applicant.registration_id.clone(),
            f.applicant.id,
            ttl_secs,
            issued_at,
        );
        f.codes.store_issued(&code).await.unwrap();
        code
    }

    fn cmd(code: &str) -> ConfirmCommand {
        ConfirmCommand {
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn confirm_is_idempotent() {
        let f = fixture().await;
        let code = issue(&f, 3600, Timestamp::now()).await;

        let first = f.handler.handle(cmd(&code.code.to_lowercase())).await.unwrap();
        assert!(!first.already_confirmed);
        assert_eq!(first.applicant.status, ApplicantStatus::Confirmed);
        assert_eq!(first.code.status, ConfirmationStatus::Confirmed);

        let stored_after_first = f.applicants.find_by_id(&f.applicant.id).await.unwrap().unwrap();

        let second = f.handler.handle(cmd(&code.code)).await.unwrap();
        assert!(second.already_confirmed);
        assert_eq!(second.code, first.code);

        let stored = f.applicants.find_by_id(&f.applicant.id).await.unwrap().unwrap();
        assert_eq!(stored, stored_after_first);
    }

    #[tokio::test]
    async fn unknown_code_is_reported() {
        let f = fixture().await;
        assert_eq!(
            f.handler.handle(cmd("ZZZZZZZZ")).await.unwrap_err(),
            ConfirmationError::UnknownCode
        );
    }

    #[tokio::test]
    async fn expired_code_stays_expired() {
        let f = fixture().await;
        let code = issue(&f, 60, Timestamp::now().minus_secs(120)).await;

        assert_eq!(
            f.handler.handle(cmd(&code.code)).await.unwrap_err(),
            ConfirmationError::Expired
        );
        assert_eq!(
            f.handler.handle(cmd(&code.code)).await.unwrap_err(),
            ConfirmationError::Expired
        );
        let stored = f.codes.find_by_code(&code.code).await.unwrap().unwrap();
        assert_eq!(stored.status, ConfirmationStatus::Expired);
    }

    #[tokio::test]
    async fn withdrawn_applicant_cannot_confirm() {
        let f = fixture().await;
        let code = issue(&f, 3600, Timestamp::now()).await;
        let mut withdrawn = f.applicant.clone();
        withdrawn.withdraw(Timestamp::now()).unwrap();
        f.applicants.update(&withdrawn, 0).await.unwrap();

        let err = f.handler.handle(cmd(&code.code)).await.unwrap_err();
        assert!(matches!(
            err,
            ConfirmationError::ApplicantNotEligible {
                status: ApplicantStatus::Withdrawn,
                ..
            }
        ));
        let stored = f.codes.find_by_code(&code.code).await.unwrap().unwrap();
        assert_eq!(stored.status, ConfirmationStatus::Pending);
    }

    #[tokio::test]
    async fn blank_code_is_invalid() {
        let f = fixture().await;
        assert!(matches!(
            f.handler.handle(cmd("   ")).await.unwrap_err(),
            ConfirmationError::ValidationFailed { .. }
        ));
    }

    #[tokio::test]
    async fn withdrawal_after_the_code_is_confirmed_keeps_confirm_idempotent() {
        let f = fixture().await;
        let code = issue(&f, 3600, Timestamp::now()).await;
        let handler = ConfirmHandler::new(
            Arc::new(WithdrawOnConfirm {
                inner: f.codes.clone(),
                applicants: f.applicants.clone(),
            }),
            f.applicants.clone(),
        );

        let first = handler.handle(cmd(&code.code)).await.unwrap();
        assert!(!first.already_confirmed);
        assert_eq!(first.code.status, ConfirmationStatus::Confirmed);
        assert_eq!(first.applicant.status, ApplicantStatus::Withdrawn);

        for _ in 0..2 {
            let again = f.handler.handle(cmd(&code.code)).await.unwrap();
            assert!(again.already_confirmed);
            assert_eq!(again.applicant.status, ApplicantStatus::Withdrawn);
        }
        let stored = f.applicants.find_by_id(&f.applicant.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicantStatus::Withdrawn);
    }

    #[tokio::test]
    async fn replaced_code_still_reports_expired() {
        let f = fixture().await;
        let old = issue(&f, 60, Timestamp::now().minus_secs(120)).await;
        let fresh = issue(&f, 3600, Timestamp::now()).await;
        assert_ne!(old.code, fresh.code);

        assert_eq!(
            f.handler.handle(cmd(&old.code)).await.unwrap_err(),
            ConfirmationError::Expired
        );
        assert!(f.handler.handle(cmd(&fresh.code)).await.is_ok());
    }
}
