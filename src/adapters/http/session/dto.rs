//! Data Transfer Objects for login and session endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{CurrentStageResult, RequestOtpResult, VerifyOtpResult};
use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request a login code for an email or phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestOtpRequest {
    pub identifier: String,
}

/// Exchange a login code for a session token.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub identifier: String,
    pub code: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Same body whether or not the identifier is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequestedResponse {
    pub message: String,
    pub expires_in_secs: u64,
}

impl From<RequestOtpResult> for OtpRequestedResponse {
    fn from(result: RequestOtpResult) -> Self {
        Self {
            message: "If the identifier is registered, a code has been sent".to_string(),
            expires_in_secs: result.expires_in_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: Timestamp,
    pub applicant: ApplicantProfile,
}

impl From<VerifyOtpResult> for TokenResponse {
    fn from(result: VerifyOtpResult) -> Self {
        Self {
            token: result.token.expose().to_string(),
            token_type: "Bearer".to_string(),
            expires_at: result.expires_at,
            applicant: result.applicant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

/// The logged-in applicant and where they stand.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub applicant: ApplicantProfile,
    pub stage: CurrentStageResult,
    pub session_expires_at: Timestamp,
}
