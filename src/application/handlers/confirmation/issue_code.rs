//! IssueCodeHandler - Command handler for confirmation codes.

use std::sync::Arc;

use crate::domain::applicant::{Applicant, ApplicantStatus};
use crate::domain::confirmation::{ConfirmationCode, ConfirmationError};
use crate::domain::foundation::{RegistrationId, Timestamp};
use crate::ports::{ApplicantRepository, ConfirmationRepository, IssueOutcome, Notification, Notifier};

use super::ConfirmationPolicy;

const MAX_DRAWS: usize = 5;

#[derive(Debug, Clone)]
pub struct IssueCodeCommand {
    pub registration_id: RegistrationId,
}

#[derive(Debug, Clone)]
pub struct IssueCodeResult {
    pub code: ConfirmationCode,
    /// False when an existing live code was re-sent.
    pub newly_issued: bool,
}

/// Handler for issuing confirmation codes.
///
/// A registration has at most one live code. Asking again re-sends it.
pub struct IssueCodeHandler {
    codes: Arc<dyn ConfirmationRepository>,
    applicants: Arc<dyn ApplicantRepository>,
    notifier: Arc<dyn Notifier>,
    policy: ConfirmationPolicy,
}

impl IssueCodeHandler {
    pub fn new(
        codes: Arc<dyn ConfirmationRepository>,
        applicants: Arc<dyn ApplicantRepository>,
        notifier: Arc<dyn Notifier>,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            codes,
            applicants,
            notifier,
            policy,
        }
    }

    pub async fn handle(&self, cmd: IssueCodeCommand) -> Result<IssueCodeResult, ConfirmationError> {
        let applicant = self
            .applicants
            .find_by_registration(&cmd.registration_id)
            .await?
            .ok_or_else(|| ConfirmationError::unknown_registration(cmd.registration_id.clone()))?;

        if applicant.status != ApplicantStatus::AwaitingConfirmation {
            return Err(ConfirmationError::not_eligible(
                applicant.registration_id,
                applicant.status,
            ));
        }

        for _ in 0..MAX_DRAWS {
            let code = ConfirmationCode::issue(
                applicant.registration_id.clone(),
                applicant.id,
                self.policy.code_ttl_secs,
                Timestamp::now(),
            );

            let result = match self.codes.store_issued(&code).await? {
                IssueOutcome::Stored => IssueCodeResult {
                    code,
                    newly_issued: true,
                },
                IssueOutcome::ExistingLive(existing) => IssueCodeResult {
                    code: existing,
                    newly_issued: false,
                },
                IssueOutcome::CodeCollision => continue,
            };

            tracing::info!(
                registration_id = %applicant.registration_id,
                newly_issued = result.newly_issued,
                expires_at = ?result.code.expires_at,
                "Confirmation code issued"
            );
            self.deliver(&applicant, &result.code).await;
            return Ok(result);
        }

        Err(ConfirmationError::infrastructure(
            "could not draw an unused confirmation code",
        ))
    }

    async fn deliver(&self, applicant: &Applicant, code: &ConfirmationCode) {
        let Some(recipient) = applicant.identifiers().into_iter().next() else {
            return;
        };
        let notification =
            Notification::confirmation_code(&code.code, applicant.registration_id.as_str());

        match tokio::time::timeout(
            self.policy.notifier_timeout,
            self.notifier.send(&recipient, &notification),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(
                registration_id = %applicant.registration_id,
                error = %e,
                "Confirmation code delivery failed"
            ),
            Err(_) => tracing::warn!(
                registration_id = %applicant.registration_id,
                "Confirmation code delivery timed out"
            ),
        }
    }
}
