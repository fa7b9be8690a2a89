//! AuthorizeHandler - Query handler resolving a bearer token to an applicant.

use std::sync::Arc;

use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::{SessionTokenId, Timestamp};
use crate::domain::session::{BearerToken, SessionError};
use crate::ports::{ApplicantRepository, SessionTokenStore};

#[derive(Debug, Clone)]
pub struct AuthorizeQuery {
    /// Raw bearer token from the request.
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct AuthorizeResult {
    pub token_id: SessionTokenId,
    pub expires_at: Timestamp,
    pub applicant: ApplicantProfile,
}

/// Every failure is reported as `InvalidOrExpiredToken`, whatever the cause.
pub struct AuthorizeHandler {
    tokens: Arc<dyn SessionTokenStore>,
    applicants: Arc<dyn ApplicantRepository>,
}

impl AuthorizeHandler {
    pub fn new(tokens: Arc<dyn SessionTokenStore>, applicants: Arc<dyn ApplicantRepository>) -> Self {
        Self { tokens, applicants }
    }

    pub async fn handle(&self, query: AuthorizeQuery) -> Result<AuthorizeResult, SessionError> {
        let bearer = BearerToken::parse(&query.token).ok_or(SessionError::InvalidOrExpiredToken)?;

        let record = self
            .tokens
            .find_by_digest(&bearer.digest())
            .await?
            .filter(|t| t.is_usable(&Timestamp::now()))
            .ok_or(SessionError::InvalidOrExpiredToken)?;

        let applicant = self
            .applicants
            .find_by_id(&record.applicant_id)
            .await?
            .ok_or(SessionError::InvalidOrExpiredToken)?;

        Ok(AuthorizeResult {
            token_id: record.id,
            expires_at: record.expires_at,
            applicant: applicant.profile(),
        })
    }
}
