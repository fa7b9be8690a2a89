//! RecordDecisionHandler - Command handler for a single reviewer decision.

use std::sync::Arc;

use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::{ActorId, ApplicantId};
use crate::domain::stage::{DecisionRequest, DecisionSource, SelectionRecord, StageError, StagePipeline};
use crate::ports::ApplicantRepository;

use super::commit::commit_decision;

/// Command to record one decision.
#[derive(Debug, Clone)]
pub struct RecordDecisionCommand {
    pub applicant_id: ApplicantId,
    pub request: DecisionRequest,
    pub actor: ActorId,
}

#[derive(Debug, Clone)]
pub struct RecordDecisionResult {
    pub record: SelectionRecord,
    pub applicant: ApplicantProfile,
}

/// Handler for single decisions.
///
/// The record append and the applicant update commit together against the
/// applicant version that was read.
pub struct RecordDecisionHandler {
    applicants: Arc<dyn ApplicantRepository>,
    pipeline: Arc<StagePipeline>,
}

impl RecordDecisionHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>, pipeline: Arc<StagePipeline>) -> Self {
        Self {
            applicants,
            pipeline,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordDecisionCommand,
    ) -> Result<RecordDecisionResult, StageError> {
        let (record, applicant) = commit_decision(
            self.applicants.as_ref(),
            &self.pipeline,
            &cmd.applicant_id,
            &cmd.request,
            DecisionSource::Single,
            &cmd.actor,
        )
        .await?;

        tracing::info!(
            applicant_id = %applicant.id,
            from_stage = %record.from_stage,
            next_stage = %record.next_stage,
            decision = %record.decision,
            actor = %record.actor,
            status = %applicant.status,
            "Selection decision recorded"
        );

        Ok(RecordDecisionResult {
            record,
            applicant: applicant.profile(),
        })
    }
}
