//! VerifyOtpHandler - Command handler for exchanging a login code for a
//! session token.

use std::sync::Arc;

use crate::domain::applicant::{ApplicantProfile, LoginIdentifier};
use crate::domain::foundation::Timestamp;
use crate::domain::foundation::ChallengeId;
use crate::domain::session::{
    AttemptRefusal, BearerToken, OtpChallenge, OtpCode, OtpHasher, SessionError, SessionToken,
};
use crate::ports::{ApplicantRepository, AttemptGrant, OtpStore, SessionTokenStore};

use super::SessionPolicy;

/// Command to verify a login code.
#[derive(Debug, Clone)]
pub struct VerifyOtpCommand {
    pub identifier: String,
    pub code: String,
}

/// A fresh session.
#[derive(Debug, Clone)]
pub struct VerifyOtpResult {
    pub token: BearerToken,
    pub expires_at: Timestamp,
    pub applicant: ApplicantProfile,
}

/// Handler for OTP verification.
///
/// Each presented code first reserves an attempt in the store, so
/// concurrent guesses cannot compare more codes than the challenge allows.
/// A code is good for exactly one session: the challenge is consumed
/// through a conditional store update, and only the caller that performed
/// it mints a token.
pub struct VerifyOtpHandler {
    otp_store: Arc<dyn OtpStore>,
    applicants: Arc<dyn ApplicantRepository>,
    tokens: Arc<dyn SessionTokenStore>,
    hasher: OtpHasher,
    policy: SessionPolicy,
}

impl VerifyOtpHandler {
    pub fn new(
        otp_store: Arc<dyn OtpStore>,
        applicants: Arc<dyn ApplicantRepository>,
        tokens: Arc<dyn SessionTokenStore>,
        hasher: OtpHasher,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            otp_store,
            applicants,
            tokens,
            hasher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: VerifyOtpCommand) -> Result<VerifyOtpResult, SessionError> {
        let identifier = LoginIdentifier::parse(&cmd.identifier)?;
        let code = OtpCode::parse(&cmd.code, self.policy.otp_length)?;

        let now = Timestamp::now();
        let challenge = match self
            .otp_store
            .begin_attempt(&identifier, now)
            .await?
            .ok_or(SessionError::NoActiveChallenge)?
        {
            AttemptGrant::Granted(challenge) => challenge,
            AttemptGrant::Refused {
                challenge_id,
                reason,
            } => return Err(self.refuse(&identifier, &challenge_id, reason).await?),
        };

        if self.hasher.verify(&identifier, &code, &challenge.code_hash) {
            self.open_session(&identifier, &challenge, now).await
        } else {
            Err(self.record_mismatch(&identifier, &challenge).await?)
        }
    }

    async fn refuse(
        &self,
        identifier: &LoginIdentifier,
        challenge_id: &ChallengeId,
        reason: AttemptRefusal,
    ) -> Result<SessionError, SessionError> {
        let failure = match reason {
            AttemptRefusal::Consumed => return Ok(SessionError::NoActiveChallenge),
            AttemptRefusal::Expired => SessionError::Expired,
            AttemptRefusal::Exhausted => SessionError::AttemptsExceeded,
        };
        self.otp_store.invalidate(identifier, challenge_id).await?;
        Ok(failure)
    }

    /// `challenge.attempts` already counts this attempt.
    async fn record_mismatch(
        &self,
        identifier: &LoginIdentifier,
        challenge: &OtpChallenge,
    ) -> Result<SessionError, SessionError> {
        let failure = challenge.failure_after(challenge.attempts);
        if failure == SessionError::AttemptsExceeded {
            self.otp_store.invalidate(identifier, &challenge.id).await?;
            tracing::info!(challenge_id = %challenge.id, "OTP challenge exhausted");
        } else {
            tracing::debug!(
                challenge_id = %challenge.id,
                attempts = challenge.attempts,
                "OTP mismatch"
            );
        }
        Ok(failure)
    }

    async fn open_session(
        &self,
        identifier: &LoginIdentifier,
        challenge: &OtpChallenge,
        now: Timestamp,
    ) -> Result<VerifyOtpResult, SessionError> {
        if !self.otp_store.consume(identifier, &challenge.id).await? {
            return Err(SessionError::NoActiveChallenge);
        }

        let applicant = self
            .applicants
            .find_by_identifier(identifier)
            .await?
            .ok_or(SessionError::NoActiveChallenge)?;

        let (token, record) = SessionToken::mint(applicant.id, self.policy.token_ttl_secs, now);
        self.tokens.insert(&record).await?;

        tracing::info!(
            applicant_id = %applicant.id,
            token_id = %record.id,
            "Session opened"
        );

        Ok(VerifyOtpResult {
            token,
            expires_at: record.expires_at,
            applicant: applicant.profile(),
        })
    }
}
