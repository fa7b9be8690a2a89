//! CurrentStageHandler - Query handler for an applicant's position.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::applicant::ApplicantStatus;
use crate::domain::foundation::ApplicantId;
use crate::domain::stage::{StageError, StageIndex, StagePipeline};
use crate::ports::ApplicantRepository;

use super::commit::load;

#[derive(Debug, Clone)]
pub struct CurrentStageQuery {
    pub applicant_id: ApplicantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentStageResult {
    pub applicant_id: ApplicantId,
    pub stage: StageIndex,
    pub stage_name: String,
    pub status: ApplicantStatus,
    /// True while a fee for the current stage is unpaid.
    pub payment_due: bool,
}

pub struct CurrentStageHandler {
    applicants: Arc<dyn ApplicantRepository>,
    pipeline: Arc<StagePipeline>,
}

impl CurrentStageHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>, pipeline: Arc<StagePipeline>) -> Self {
        Self {
            applicants,
            pipeline,
        }
    }

    pub async fn handle(&self, query: CurrentStageQuery) -> Result<CurrentStageResult, StageError> {
        let applicant = load(self.applicants.as_ref(), &query.applicant_id).await?;
        let stage_name = self
            .pipeline
            .stage(applicant.current_stage)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        Ok(CurrentStageResult {
            applicant_id: applicant.id,
            stage: applicant.current_stage,
            stage_name,
            status: applicant.status,
            payment_due: applicant.status == ApplicantStatus::AwaitingPayment,
        })
    }
}
