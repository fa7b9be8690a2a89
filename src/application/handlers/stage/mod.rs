//! Stage handlers.
//!
//! Applicant progression through the stage pipeline:
//!
//! ## Commands
//! - Registering an applicant
//! - Recording a single selection decision
//! - Applying a bulk decision import
//! - Withdrawing an applicant
//! - Settling a stage fee (called by the payment ledger)
//!
//! ## Queries
//! - Current stage of an applicant
//! - Selection history of an applicant
//! - Bulk import template

mod apply_bulk_decisions;
mod bulk_template;
mod commit;
mod current_stage;
mod record_decision;
mod register_applicant;
mod selection_history;
mod settle_payment;
mod withdraw_applicant;

pub use apply_bulk_decisions::{ApplyBulkDecisionsCommand, ApplyBulkDecisionsHandler};
pub use bulk_template::BulkTemplateHandler;
pub use current_stage::{CurrentStageHandler, CurrentStageQuery, CurrentStageResult};
pub use record_decision::{RecordDecisionCommand, RecordDecisionHandler, RecordDecisionResult};
pub use register_applicant::{
    RegisterApplicantCommand, RegisterApplicantHandler, RegisterApplicantResult,
};
pub use selection_history::{SelectionHistoryHandler, SelectionHistoryQuery};
pub use settle_payment::{SettlePaymentCommand, SettlePaymentHandler, SettlePaymentResult};
pub use withdraw_applicant::{WithdrawApplicantCommand, WithdrawApplicantHandler};
