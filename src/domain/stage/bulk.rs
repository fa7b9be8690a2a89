//! Bulk decision import: row parsing, duplicate resolution and the
//! accumulated summary.
//!
//! A batch never aborts on a bad row. Each row ends in exactly one
//! [`RowOutcome`], and the summary is a left fold over those outcomes in
//! row order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{ApplicantId, RegistrationId, SelectionRecordId, ValidationError};

use super::{DecisionRequest, StageError, StageIndex};

/// How a spreadsheet row names an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApplicantRef {
    Id(ApplicantId),
    Registration(RegistrationId),
}

impl ApplicantRef {
    /// A UUID is read as an applicant id, anything else as a registration id.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("applicant_ref"));
        }
        match Uuid::parse_str(trimmed) {
            Ok(uuid) => Ok(ApplicantRef::Id(ApplicantId::from_uuid(uuid))),
            Err(_) => RegistrationId::parse(trimmed).map(ApplicantRef::Registration),
        }
    }
}

impl fmt::Display for ApplicantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicantRef::Id(id) => write!(f, "{}", id),
            ApplicantRef::Registration(reg) => write!(f, "{}", reg),
        }
    }
}

/// One imported row, as read from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRow {
    pub applicant_ref: String,
    pub from_stage: u32,
    pub decision: String,
    #[serde(default)]
    pub next_stage: Option<u32>,
}

impl BulkRow {
    /// Parses the row into a reference and a decision request.
    pub fn parse(&self) -> Result<(ApplicantRef, DecisionRequest), StageError> {
        let applicant_ref = ApplicantRef::parse(&self.applicant_ref)?;
        let decision = self.decision.parse()?;
        Ok((
            applicant_ref,
            DecisionRequest {
                from_stage: StageIndex::new(self.from_stage),
                decision,
                next_stage: self.next_stage.map(StageIndex::new),
            },
        ))
    }
}

/// Final disposition of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Applied {
        applicant_id: ApplicantId,
        record_id: SelectionRecordId,
    },
    /// A later row for the same applicant replaced this one.
    Skipped { superseded_by: usize },
    Failed(StageError),
}

/// Row that was rejected, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: usize,
    pub applicant_ref: String,
    pub code: String,
    pub reason: String,
}

/// Row that was not applied because a later row replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub applicant_ref: String,
    pub superseded_by: usize,
}

/// Result of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummary {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<RowFailure>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl BulkSummary {
    /// Adds one row's outcome. Rows are numbered from 1.
    pub fn record(mut self, row: usize, applicant_ref: &str, outcome: &RowOutcome) -> Self {
        match outcome {
            RowOutcome::Applied { .. } => self.applied += 1,
            RowOutcome::Skipped { superseded_by } => {
                self.skipped += 1;
                self.skipped_rows.push(SkippedRow {
                    row,
                    applicant_ref: applicant_ref.to_string(),
                    superseded_by: *superseded_by,
                });
            }
            RowOutcome::Failed(err) => {
                self.failed += 1;
                self.failures.push(RowFailure {
                    row,
                    applicant_ref: applicant_ref.to_string(),
                    code: err.code().to_string(),
                    reason: err.message(),
                });
            }
        }
        self
    }

    /// Folds `(row, applicant_ref, outcome)` triples into a summary.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str, &'a RowOutcome)>,
    {
        outcomes
            .into_iter()
            .fold(Self::default(), |summary, (row, applicant_ref, outcome)| {
                summary.record(row, applicant_ref, outcome)
            })
    }

    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failed
    }
}

/// For each row, the 1-based number of the later row that supersedes it.
///
/// `resolved[i]` is the applicant row `i` names, or `None` if the row
/// already failed. Failed rows neither supersede nor get superseded.
pub fn supersession(resolved: &[Option<ApplicantId>]) -> Vec<Option<usize>> {
    let mut last_row: HashMap<ApplicantId, usize> = HashMap::new();
    for (i, applicant) in resolved.iter().enumerate() {
        if let Some(id) = applicant {
            last_row.insert(*id, i);
        }
    }

    resolved
        .iter()
        .enumerate()
        .map(|(i, applicant)| {
            applicant
                .and_then(|id| last_row.get(&id).copied())
                .filter(|&winner| winner != i)
                .map(|winner| winner + 1)
        })
        .collect()
}
