//! Selection decisions and the append-only selection record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ActorId, ApplicantId, SelectionRecordId, Timestamp, ValidationError};

use super::StageIndex;

/// Outcome of a review at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Selected,
    NotSelected,
}

impl FromStr for Decision {
    type Err = ValidationError;

    /// Lenient parsing for spreadsheet cells.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "selected" | "yes" | "y" => Ok(Decision::Selected),
            "not_selected" | "rejected" | "no" | "n" => Ok(Decision::NotSelected),
            "" => Err(ValidationError::empty_field("decision")),
            _ => Err(ValidationError::invalid_format(
                "decision",
                format!("'{}' is not 'selected' or 'not selected'", s.trim()),
            )),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Selected => write!(f, "selected"),
            Decision::NotSelected => write!(f, "not_selected"),
        }
    }
}

/// Where a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Single,
    BulkImport,
}

/// A decision as submitted, before it is checked against the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Stage the reviewer believes the applicant is in.
    pub from_stage: StageIndex,
    pub decision: Decision,
    /// Target stage for `selected`; defaults to the following stage.
    /// Ignored for `not_selected`.
    pub next_stage: Option<StageIndex>,
}

impl DecisionRequest {
    pub fn selected(from_stage: StageIndex, next_stage: StageIndex) -> Self {
        Self {
            from_stage,
            decision: Decision::Selected,
            next_stage: Some(next_stage),
        }
    }

    pub fn not_selected(from_stage: StageIndex) -> Self {
        Self {
            from_stage,
            decision: Decision::NotSelected,
            next_stage: None,
        }
    }

    /// Stage the applicant lands in if the decision is applied.
    pub fn target_stage(&self) -> StageIndex {
        match self.decision {
            Decision::Selected => self.next_stage.unwrap_or_else(|| self.from_stage.next()),
            Decision::NotSelected => self.from_stage,
        }
    }
}

/// Append-only audit entry for one applied decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub id: SelectionRecordId,
    pub applicant_id: ApplicantId,
    pub from_stage: StageIndex,
    pub decision: Decision,
    pub next_stage: StageIndex,
    pub source: DecisionSource,
    pub actor: ActorId,
    pub applied_at: Timestamp,
}

/// Current stage as implied by the record history: the latest record's
/// `next_stage`, or registration when there is none.
pub fn project_current_stage(records: &[SelectionRecord]) -> StageIndex {
    records
        .last()
        .map(|r| r.next_stage)
        .unwrap_or(StageIndex::REGISTRATION)
}
