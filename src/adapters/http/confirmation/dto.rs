//! Data Transfer Objects for participation confirmation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{ConfirmResult, IssueCodeResult};
use crate::domain::applicant::ApplicantProfile;
use crate::domain::confirmation::ConfirmationStatus;
use crate::domain::foundation::{RegistrationId, Timestamp};

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCodeRequest {
    pub registration_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRequest {
    pub code: String,
}

/// The code itself is only ever delivered to the applicant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCodeResponse {
    pub registration_id: RegistrationId,
    pub status: ConfirmationStatus,
    pub expires_at: Timestamp,
    pub newly_issued: bool,
}

impl From<IssueCodeResult> for IssueCodeResponse {
    fn from(result: IssueCodeResult) -> Self {
        Self {
            registration_id: result.code.registration_id,
            status: result.code.status,
            expires_at: result.code.expires_at,
            newly_issued: result.newly_issued,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub registration_id: RegistrationId,
    pub applicant: ApplicantProfile,
    pub already_confirmed: bool,
}

impl From<ConfirmResult> for ConfirmResponse {
    fn from(result: ConfirmResult) -> Self {
        Self {
            registration_id: result.code.registration_id,
            applicant: result.applicant,
            already_confirmed: result.already_confirmed,
        }
    }
}
