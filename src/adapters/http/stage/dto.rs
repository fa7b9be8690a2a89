//! Data Transfer Objects for applicant and selection endpoints.

use serde::{Deserialize, Serialize};

use crate::application::RecordDecisionResult;
use crate::domain::applicant::ApplicantProfile;
use crate::domain::stage::{BulkRow, DecisionRequest, SelectionRecord, StageError, StageIndex};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterApplicantRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A single reviewer decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionBody {
    pub from_stage: u32,
    /// `selected` or `not_selected`; spreadsheet spellings are accepted too.
    pub decision: String,
    #[serde(default)]
    pub next_stage: Option<u32>,
}

impl DecisionBody {
    pub fn into_request(self) -> Result<DecisionRequest, StageError> {
        Ok(DecisionRequest {
            from_stage: StageIndex::new(self.from_stage),
            decision: self.decision.parse()?,
            next_stage: self.next_stage.map(StageIndex::new),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDecisionsRequest {
    pub rows: Vec<BulkRow>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub record: SelectionRecord,
    pub applicant: ApplicantProfile,
}

impl From<RecordDecisionResult> for DecisionResponse {
    fn from(result: RecordDecisionResult) -> Self {
        Self {
            record: result.record,
            applicant: result.applicant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionHistoryResponse {
    pub records: Vec<SelectionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::Decision;

    #[test]
    fn decision_body_accepts_loose_spelling() {
        let body = DecisionBody {
            from_stage: 1,
            decision: "Not Selected".to_string(),
            next_stage: None,
        };
        let request = body.into_request().unwrap();
        assert_eq!(request.decision, Decision::NotSelected);
        assert_eq!(request.from_stage, StageIndex::new(1));
    }

    #[test]
    fn decision_body_rejects_unknown_decision() {
        let body = DecisionBody {
            from_stage: 1,
            decision: "maybe".to_string(),
            next_stage: None,
        };
        assert!(matches!(
            body.into_request(),
            Err(StageError::ValidationFailed { .. })
        ));
    }
}
