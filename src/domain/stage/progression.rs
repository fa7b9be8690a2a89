//! Pure progression rules: what a decision or a settled fee does to an
//! applicant. Storage and concurrency live in the application handlers.

use crate::domain::applicant::{Applicant, ApplicantStatus};
use crate::domain::foundation::{ActorId, DomainError, ErrorCode, SelectionRecordId, Timestamp};
use crate::domain::payment::PaymentType;

use super::{Decision, DecisionRequest, DecisionSource, SelectionRecord, StageError, StageIndex, StagePipeline};

/// The record to append and the applicant state to store with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub record: SelectionRecord,
    pub applicant: Applicant,
}

/// Status an applicant gets on being selected into `stage`.
pub fn entry_status(pipeline: &StagePipeline, stage: StageIndex) -> ApplicantStatus {
    if pipeline.fee_for(stage).is_some() {
        ApplicantStatus::AwaitingPayment
    } else {
        status_after_settlement(pipeline, stage)
    }
}

/// Status an applicant gets once nothing is owed for `stage`.
pub fn status_after_settlement(pipeline: &StagePipeline, stage: StageIndex) -> ApplicantStatus {
    if pipeline.is_final(stage) {
        ApplicantStatus::AwaitingConfirmation
    } else {
        ApplicantStatus::Active
    }
}

/// Checks a decision against the applicant and builds the resulting state.
///
/// # Errors
///
/// - `AlreadyTerminal` if the applicant is eliminated, withdrawn or confirmed
/// - `StageMismatch` if `from_stage` is not the applicant's current stage
/// - `InvalidNextStage` if a selection does not land on a later known stage
/// - `PaymentOutstanding` if a selection arrives before the stage fee is paid
pub fn plan_decision(
    applicant: &Applicant,
    pipeline: &StagePipeline,
    request: &DecisionRequest,
    source: DecisionSource,
    actor: &ActorId,
    now: Timestamp,
) -> Result<Progression, StageError> {
    if applicant.is_terminal() {
        return Err(StageError::already_terminal(applicant.id, applicant.status));
    }
    if request.from_stage != applicant.current_stage {
        return Err(StageError::stage_mismatch(
            applicant.id,
            applicant.current_stage,
            request.from_stage,
        ));
    }

    let mut updated = applicant.clone();
    let next_stage = request.target_stage();

    match request.decision {
        Decision::Selected => {
            if next_stage <= request.from_stage || !pipeline.contains(next_stage) {
                return Err(StageError::invalid_next_stage(request.from_stage, next_stage));
            }
            if applicant.status == ApplicantStatus::AwaitingPayment {
                return Err(StageError::payment_outstanding(applicant.id));
            }
            updated
                .enter_stage(next_stage, entry_status(pipeline, next_stage), now)
                .map_err(|e| rule_violation(e, request.from_stage, next_stage))?;
        }
        Decision::NotSelected => {
            updated
                .eliminate(now)
                .map_err(|e| rule_violation(e, request.from_stage, next_stage))?;
        }
    }

    let record = SelectionRecord {
        id: SelectionRecordId::new(),
        applicant_id: applicant.id,
        from_stage: request.from_stage,
        decision: request.decision,
        next_stage,
        source,
        actor: actor.clone(),
        applied_at: now,
    };

    Ok(Progression {
        record,
        applicant: updated,
    })
}

/// Applicant state after paying `payment_type`, or `None` when the
/// applicant is not waiting on that fee.
pub fn plan_settlement(
    applicant: &Applicant,
    pipeline: &StagePipeline,
    payment_type: &PaymentType,
    now: Timestamp,
) -> Option<Applicant> {
    if applicant.status != ApplicantStatus::AwaitingPayment {
        return None;
    }
    let fee = pipeline.fee_for(applicant.current_stage)?;
    if &fee.payment_type != payment_type {
        return None;
    }

    let mut updated = applicant.clone();
    updated
        .settle_payment(status_after_settlement(pipeline, applicant.current_stage), now)
        .ok()?;
    Some(updated)
}

fn rule_violation(err: DomainError, from: StageIndex, to: StageIndex) -> StageError {
    match err.code {
        ErrorCode::InvalidNextStage => StageError::invalid_next_stage(from, to),
        _ => StageError::validation("status", err.message),
    }
}
