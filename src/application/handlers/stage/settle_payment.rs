//! SettlePaymentHandler - clears an outstanding stage fee.
//!
//! Called by the payment ledger when an order succeeds. Settling is
//! idempotent: an applicant who is not waiting on that fee is left alone.

use std::sync::Arc;

use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::{ApplicantId, Timestamp};
use crate::domain::payment::PaymentType;
use crate::domain::stage::{plan_settlement, StageError, StagePipeline};
use crate::ports::ApplicantRepository;

use super::commit::update_with;

#[derive(Debug, Clone)]
pub struct SettlePaymentCommand {
    pub applicant_id: ApplicantId,
    pub payment_type: PaymentType,
}

#[derive(Debug, Clone)]
pub struct SettlePaymentResult {
    /// False when nothing was owed for this payment type.
    pub settled: bool,
    pub applicant: ApplicantProfile,
}

pub struct SettlePaymentHandler {
    applicants: Arc<dyn ApplicantRepository>,
    pipeline: Arc<StagePipeline>,
}

impl SettlePaymentHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>, pipeline: Arc<StagePipeline>) -> Self {
        Self {
            applicants,
            pipeline,
        }
    }

    pub async fn handle(&self, cmd: SettlePaymentCommand) -> Result<SettlePaymentResult, StageError> {
        let (applicant, settled) = update_with(self.applicants.as_ref(), &cmd.applicant_id, |current| {
            Ok(plan_settlement(current, &self.pipeline, &cmd.payment_type, Timestamp::now()))
        })
        .await?;

        if settled {
            tracing::info!(
                applicant_id = %applicant.id,
                payment_type = %cmd.payment_type.as_str(),
                status = %applicant.status,
                "Stage fee settled"
            );
        } else {
            tracing::debug!(
                applicant_id = %applicant.id,
                payment_type = %cmd.payment_type.as_str(),
                "Nothing to settle"
            );
        }

        Ok(SettlePaymentResult {
            settled,
            applicant: applicant.profile(),
        })
    }
}
