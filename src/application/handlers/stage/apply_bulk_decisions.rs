//! ApplyBulkDecisionsHandler - Command handler for spreadsheet imports.
//!
//! Rows go through three phases:
//!
//! 1. Parse and resolve each row to an applicant. Failures are final.
//! 2. Mark earlier rows for an applicant as superseded by the last one.
//! 3. Commit the surviving rows concurrently. Survivors name distinct
//!    applicants, and each commit goes through the same version guard as
//!    a single decision.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::foundation::{ActorId, ApplicantId};
use crate::domain::stage::{
    supersession, ApplicantRef, BulkRow, BulkSummary, DecisionRequest, DecisionSource,
    RowOutcome, StageError, StagePipeline,
};
use crate::ports::ApplicantRepository;

use super::commit::commit_decision;

#[derive(Debug, Clone)]
pub struct ApplyBulkDecisionsCommand {
    pub rows: Vec<BulkRow>,
    pub actor: ActorId,
}

/// Handler for bulk decision imports.
///
/// Never fails as a whole; every problem is reported against its row.
pub struct ApplyBulkDecisionsHandler {
    applicants: Arc<dyn ApplicantRepository>,
    pipeline: Arc<StagePipeline>,
}

impl ApplyBulkDecisionsHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>, pipeline: Arc<StagePipeline>) -> Self {
        Self {
            applicants,
            pipeline,
        }
    }

    pub async fn handle(&self, cmd: ApplyBulkDecisionsCommand) -> BulkSummary {
        let resolved: Vec<Result<(ApplicantId, DecisionRequest), StageError>> =
            join_all(cmd.rows.iter().map(|row| self.resolve(row))).await;

        let targets: Vec<Option<ApplicantId>> = resolved
            .iter()
            .map(|r| r.as_ref().ok().map(|(id, _)| *id))
            .collect();
        let superseded = supersession(&targets);

        let outcomes: Vec<RowOutcome> = join_all(resolved.into_iter().zip(superseded).map(
            |(resolution, superseded_by)| {
                let actor = &cmd.actor;
                async move {
                    match (resolution, superseded_by) {
                        (Err(err), _) => RowOutcome::Failed(err),
                        (Ok(_), Some(later)) => RowOutcome::Skipped {
                            superseded_by: later,
                        },
                        (Ok((applicant_id, request)), None) => {
                            self.apply(&applicant_id, &request, actor).await
                        }
                    }
                }
            },
        ))
        .await;

        let summary = BulkSummary::from_outcomes(
            outcomes
                .iter()
                .enumerate()
                .map(|(i, outcome)| (i + 1, cmd.rows[i].applicant_ref.as_str(), outcome)),
        );

        tracing::info!(
            actor = %cmd.actor,
            rows = summary.total(),
            applied = summary.applied,
            skipped = summary.skipped,
            failed = summary.failed,
            "Bulk decisions applied"
        );

        summary
    }

    async fn resolve(&self, row: &BulkRow) -> Result<(ApplicantId, DecisionRequest), StageError> {
        let (applicant_ref, request) = row.parse()?;
        let found = match &applicant_ref {
            ApplicantRef::Id(id) => self.applicants.find_by_id(id).await?,
            ApplicantRef::Registration(reg) => self.applicants.find_by_registration(reg).await?,
        };
        let applicant =
            found.ok_or_else(|| StageError::unknown_applicant(applicant_ref.to_string()))?;
        Ok((applicant.id, request))
    }

    async fn apply(
        &self,
        applicant_id: &ApplicantId,
        request: &DecisionRequest,
        actor: &ActorId,
    ) -> RowOutcome {
        match commit_decision(
            self.applicants.as_ref(),
            &self.pipeline,
            applicant_id,
            request,
            DecisionSource::BulkImport,
            actor,
        )
        .await
        {
            Ok((record, _)) => RowOutcome::Applied {
                applicant_id: *applicant_id,
                record_id: record.id,
            },
            Err(err) => RowOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryApplicantRepository;
    use crate::domain::applicant::{Applicant, ApplicantStatus, EmailAddress};
    use crate::domain::foundation::Timestamp;
    use crate::domain::stage::{DecisionSource, StageIndex};

    async fn seed(repo: &InMemoryApplicantRepository, email: &str) -> Applicant {
        let applicant = Applicant::register(
            Some(EmailAddress::parse(email).unwrap()),
            None,
            None,
            Timestamp::now(),
        )
        .unwrap();
        repo.insert(&applicant).await.unwrap();
        applicant
    }

    fn row(reference: &str, from: u32, decision: &str) -> BulkRow {
        BulkRow {
            applicant_ref: reference.to_string(),
            from_stage: from,
            decision: decision.to_string(),
            next_stage: None,
        }
    }

    fn handler(repo: Arc<InMemoryApplicantRepository>) -> ApplyBulkDecisionsHandler {
        ApplyBulkDecisionsHandler::new(repo, Arc::new(StagePipeline::standard()))
    }

    fn actor() -> ActorId {
        ActorId::new("committee").unwrap()
    }

    #[tokio::test]
    async fn mixed_batch_reports_each_row() {
        let repo = Arc::new(InMemoryApplicantRepository::new());
        let a = seed(&repo, "a@example.com").await;
        let b = seed(&repo, "b@example.com").await;
        let c = seed(&repo, "c@example.com").await;

        let summary = handler(repo.clone())
            .handle(ApplyBulkDecisionsCommand {
                rows: vec![
                    row(a.registration_id.as_str(), 0, "selected"),
                    row(&b.id.to_string(), 0, "not selected"),
                    row(c.registration_id.as_str(), 2, "selected"),
                    row("REG-ZZZZZZZZ", 0, "selected"),
                    row(a.registration_id.as_str(), 0, "maybe"),
                ],
                actor: actor(),
            })
            .await;

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 3);
        let failed_rows: Vec<usize> = summary.failures.iter().map(|f| f.row).collect();
        assert_eq!(failed_rows, vec![3, 4, 5]);
        assert_eq!(summary.failures[0].code, "STAGE_MISMATCH");
        assert_eq!(summary.failures[1].code, "UNKNOWN_APPLICANT");

        // Failed rows leave their applicant untouched
        let c_after = repo.find_by_id(&c.id).await.unwrap().unwrap();
        assert_eq!(c_after, c);
        assert!(repo.selection_history(&c.id).await.unwrap().is_empty());

        let a_after = repo.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(a_after.current_stage, StageIndex::new(1));
        let b_after = repo.find_by_id(&b.id).await.unwrap().unwrap();
        assert_eq!(b_after.status, ApplicantStatus::Eliminated);
    }

    #[tokio::test]
    async fn later_row_supersedes_earlier_one() {
        let repo = Arc::new(InMemoryApplicantRepository::new());
        let a = seed(&repo, "a@example.com").await;

        let summary = handler(repo.clone())
            .handle(ApplyBulkDecisionsCommand {
                rows: vec![
                    row(a.registration_id.as_str(), 0, "selected"),
                    row(&a.id.to_string(), 0, "not_selected"),
                ],
                actor: actor(),
            })
            .await;

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skipped_rows[0].row, 1);
        assert_eq!(summary.skipped_rows[0].superseded_by, 2);

        let history = repo.selection_history(&a.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source, DecisionSource::BulkImport);
        assert_eq!(history[0].actor, actor());
    }

    #[tokio::test]
    async fn empty_batch_is_an_empty_summary() {
        let repo = Arc::new(InMemoryApplicantRepository::new());
        let summary = handler(repo)
            .handle(ApplyBulkDecisionsCommand {
                rows: vec![],
                actor: actor(),
            })
            .await;
        assert_eq!(summary, BulkSummary::default());
    }
}
