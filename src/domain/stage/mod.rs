//! Stage domain module.
//!
//! Linear pipeline topology, selection decisions, progression rules and
//! bulk import planning.
//!
//! # Module Structure
//!
//! - `pipeline` - StageIndex, Stage, StageFee and StagePipeline
//! - `decision` - Decision, DecisionRequest and the append-only SelectionRecord
//! - `progression` - Pure rules for applying decisions and settled fees
//! - `bulk` - Bulk rows, duplicate resolution and the accumulated summary
//! - `template` - Bulk import column description
//! - `errors` - StageError

mod bulk;
mod decision;
mod errors;
mod pipeline;
mod progression;
mod template;

pub use bulk::{supersession, ApplicantRef, BulkRow, BulkSummary, RowFailure, RowOutcome, SkippedRow};
pub use decision::{project_current_stage, Decision, DecisionRequest, DecisionSource, SelectionRecord};
pub use errors::StageError;
pub use pipeline::{Stage, StageFee, StageIndex, StagePipeline};
pub use progression::{entry_status, plan_decision, plan_settlement, status_after_settlement, Progression};
pub use template::{BulkTemplate, TemplateColumn};
