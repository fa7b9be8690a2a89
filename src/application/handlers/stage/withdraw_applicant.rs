//! WithdrawApplicantHandler - Command handler for leaving the process.

use std::sync::Arc;

use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::{ApplicantId, Timestamp};
use crate::domain::stage::StageError;
use crate::ports::ApplicantRepository;

use super::commit::update_with;

#[derive(Debug, Clone)]
pub struct WithdrawApplicantCommand {
    pub applicant_id: ApplicantId,
}

pub struct WithdrawApplicantHandler {
    applicants: Arc<dyn ApplicantRepository>,
}

impl WithdrawApplicantHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>) -> Self {
        Self { applicants }
    }

    pub async fn handle(&self, cmd: WithdrawApplicantCommand) -> Result<ApplicantProfile, StageError> {
        let (applicant, _) = update_with(self.applicants.as_ref(), &cmd.applicant_id, |current| {
            if current.is_terminal() {
                return Err(StageError::already_terminal(current.id, current.status));
            }
            let mut updated = current.clone();
            updated.withdraw(Timestamp::now())?;
            Ok(Some(updated))
        })
        .await?;

        tracing::info!(applicant_id = %applicant.id, stage = %applicant.current_stage, "Applicant withdrew");
        Ok(applicant.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryApplicantRepository;
    use crate::domain::applicant::{Applicant, ApplicantStatus, EmailAddress};

    #[tokio::test]
    async fn withdraw_is_terminal() {
        let repo = Arc::new(InMemoryApplicantRepository::new());
        let applicant = Applicant::register(
            Some(EmailAddress::parse("ada@example.com").unwrap()),
            None,
            None,
            Timestamp::now(),
        )
        .unwrap();
        repo.insert(&applicant).await.unwrap();
        let handler = WithdrawApplicantHandler::new(repo);
        let cmd = WithdrawApplicantCommand {
            applicant_id: applicant.id,
        };

        let profile = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(profile.status, ApplicantStatus::Withdrawn);

        let err = handler.handle(cmd).await.unwrap_err();
        assert!(matches!(
            err,
            StageError::AlreadyTerminal {
                status: ApplicantStatus::Withdrawn,
                ..
            }
        ));
    }
}
