//! Optimistic-concurrency helpers shared by the stage handlers.
//!
//! Every write re-reads the applicant, re-plans against what it read and
//! commits against that version. On a version conflict the loop runs
//! again, so a decision that lost a race is re-checked against the
//! winner's state and fails the ordinary way (usually `StageMismatch`).

use crate::domain::applicant::Applicant;
use crate::domain::foundation::{ActorId, ApplicantId, Timestamp};
use crate::domain::stage::{
    plan_decision, DecisionRequest, DecisionSource, SelectionRecord, StageError, StagePipeline,
};
use crate::ports::{ApplicantRepository, CommitOutcome};

pub(super) const MAX_COMMIT_ATTEMPTS: usize = 3;

pub(super) async fn load(
    applicants: &dyn ApplicantRepository,
    applicant_id: &ApplicantId,
) -> Result<Applicant, StageError> {
    applicants
        .find_by_id(applicant_id)
        .await?
        .ok_or_else(|| StageError::unknown_applicant(applicant_id.to_string()))
}

/// Checks and commits one decision. Returns the appended record and the
/// stored applicant.
pub(super) async fn commit_decision(
    applicants: &dyn ApplicantRepository,
    pipeline: &StagePipeline,
    applicant_id: &ApplicantId,
    request: &DecisionRequest,
    source: DecisionSource,
    actor: &ActorId,
) -> Result<(SelectionRecord, Applicant), StageError> {
    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let applicant = load(applicants, applicant_id).await?;
        let plan = plan_decision(&applicant, pipeline, request, source, actor, Timestamp::now())?;

        match applicants
            .commit_selection(&plan.record, &plan.applicant, applicant.version)
            .await?
        {
            CommitOutcome::Committed(stored) => return Ok((plan.record, stored)),
            CommitOutcome::VersionConflict { current_version } => {
                tracing::debug!(
                    applicant_id = %applicant_id,
                    attempt,
                    current_version,
                    "Decision lost a version race, re-checking"
                );
            }
        }
    }

    Err(StageError::infrastructure(
        "applicant is being updated concurrently, try again",
    ))
}

/// Applies `change` to a fresh copy of the applicant and stores it.
///
/// `change` returns `Ok(None)` when there is nothing to write; the
/// applicant as read is returned unchanged in that case.
pub(super) async fn update_with<F>(
    applicants: &dyn ApplicantRepository,
    applicant_id: &ApplicantId,
    mut change: F,
) -> Result<(Applicant, bool), StageError>
where
    F: FnMut(&Applicant) -> Result<Option<Applicant>, StageError>,
{
    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let applicant = load(applicants, applicant_id).await?;
        let Some(updated) = change(&applicant)? else {
            return Ok((applicant, false));
        };

        match applicants.update(&updated, applicant.version).await? {
            CommitOutcome::Committed(stored) => return Ok((stored, true)),
            CommitOutcome::VersionConflict { current_version } => {
                tracing::debug!(
                    applicant_id = %applicant_id,
                    attempt,
                    current_version,
                    "Applicant update lost a version race, retrying"
                );
            }
        }
    }

    Err(StageError::infrastructure(
        "applicant is being updated concurrently, try again",
    ))
}
