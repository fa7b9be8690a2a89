//! RegisterApplicantHandler - Command handler for creating applicants.

use std::sync::Arc;

use crate::domain::applicant::{Applicant, ApplicantProfile, EmailAddress, PhoneNumber};
use crate::domain::foundation::Timestamp;
use crate::domain::stage::StageError;
use crate::ports::{ApplicantRepository, InsertOutcome};

/// Command to register an applicant. At least one identifier is required;
/// blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct RegisterApplicantCommand {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterApplicantResult {
    pub applicant: ApplicantProfile,
}

pub struct RegisterApplicantHandler {
    applicants: Arc<dyn ApplicantRepository>,
}

impl RegisterApplicantHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>) -> Self {
        Self { applicants }
    }

    pub async fn handle(
        &self,
        cmd: RegisterApplicantCommand,
    ) -> Result<RegisterApplicantResult, StageError> {
        let email = present(cmd.email).map(|e| EmailAddress::parse(&e)).transpose()?;
        let phone = present(cmd.phone).map(|p| PhoneNumber::parse(&p)).transpose()?;

        let applicant = Applicant::register(email, phone, cmd.display_name, Timestamp::now())?;

        match self.applicants.insert(&applicant).await? {
            InsertOutcome::Inserted => {}
            InsertOutcome::IdentifierTaken(identifier) => {
                return Err(StageError::already_registered(identifier.to_string()));
            }
        }

        tracing::info!(
            applicant_id = %applicant.id,
            registration_id = %applicant.registration_id,
            "Applicant registered"
        );

        Ok(RegisterApplicantResult {
            applicant: applicant.profile(),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryApplicantRepository;
    use crate::domain::applicant::ApplicantStatus;
    use crate::domain::stage::StageIndex;

    fn handler() -> RegisterApplicantHandler {
        RegisterApplicantHandler::new(Arc::new(InMemoryApplicantRepository::new()))
    }

    #[tokio::test]
    async fn registers_at_stage_zero() {
        let result = handler()
            .handle(RegisterApplicantCommand {
                email: Some("Ada@Example.com".into()),
                phone: Some("".into()),
                display_name: Some("Ada".into()),
            })
            .await
            .unwrap();

        assert_eq!(result.applicant.current_stage, StageIndex::REGISTRATION);
        assert_eq!(result.applicant.status, ApplicantStatus::Active);
        assert_eq!(result.applicant.email.unwrap().as_str(), "ada@example.com");
        assert!(result.applicant.phone.is_none());
    }

    #[tokio::test]
    async fn requires_an_identifier() {
        let err = handler()
            .handle(RegisterApplicantCommand {
                email: Some("  ".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn rejects_malformed_identifiers() {
        let err = handler()
            .handle(RegisterApplicantCommand {
                phone: Some("12345".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn rejects_taken_identifier() {
        let handler = handler();
        let cmd = RegisterApplicantCommand {
            email: Some("ada@example.com".into()),
            phone: Some("+14155550100".into()),
            display_name: None,
        };
        handler.handle(cmd).await.unwrap();

        let err = handler
            .handle(RegisterApplicantCommand {
                phone: Some("+1 415 555 0100".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::AlreadyRegistered(_)));
    }
}
