//! SelectionHistoryHandler - Query handler for the decision audit trail.

use std::sync::Arc;

use crate::domain::foundation::ApplicantId;
use crate::domain::stage::{SelectionRecord, StageError};
use crate::ports::ApplicantRepository;

use super::commit::load;

#[derive(Debug, Clone)]
pub struct SelectionHistoryQuery {
    pub applicant_id: ApplicantId,
}

pub struct SelectionHistoryHandler {
    applicants: Arc<dyn ApplicantRepository>,
}

impl SelectionHistoryHandler {
    pub fn new(applicants: Arc<dyn ApplicantRepository>) -> Self {
        Self { applicants }
    }

    /// Records oldest first.
    pub async fn handle(
        &self,
        query: SelectionHistoryQuery,
    ) -> Result<Vec<SelectionRecord>, StageError> {
        load(self.applicants.as_ref(), &query.applicant_id).await?;
        Ok(self.applicants.selection_history(&query.applicant_id).await?)
    }
}
