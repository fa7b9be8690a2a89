//! OTP challenge store port.
//!
//! Holds at most one challenge per identifier. Every mutation other than
//! `upsert` names the challenge it expects, so an operation racing with a
//! re-issue never touches the newer challenge.

use async_trait::async_trait;

use crate::domain::applicant::LoginIdentifier;
use crate::domain::foundation::{ChallengeId, DomainError, Timestamp};
use crate::domain::session::{AttemptRefusal, OtpChallenge};

/// Outcome of asking to present a code to the identifier's challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptGrant {
    /// The attempt is already counted; the challenge reflects it.
    Granted(OtpChallenge),
    /// No attempt was counted.
    Refused {
        challenge_id: ChallengeId,
        reason: AttemptRefusal,
    },
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Atomically replaces whatever challenge the identifier had.
    async fn upsert(&self, challenge: OtpChallenge) -> Result<(), DomainError>;

    /// The identifier's unconsumed challenge, expired or not.
    async fn find_active(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<OtpChallenge>, DomainError>;

    /// Atomically spends one attempt on the identifier's unconsumed
    /// challenge, before any code comparison. Concurrent callers each get a
    /// distinct count, and no more than `max_attempts` are ever granted.
    ///
    /// Returns `None` if the identifier has no unconsumed challenge.
    async fn begin_attempt(
        &self,
        identifier: &LoginIdentifier,
        now: Timestamp,
    ) -> Result<Option<AttemptGrant>, DomainError>;

    /// Marks the challenge consumed. Returns true only for the caller that
    /// performed the transition.
    async fn consume(
        &self,
        identifier: &LoginIdentifier,
        challenge_id: &ChallengeId,
    ) -> Result<bool, DomainError>;

    /// Removes the challenge if it is still the active one.
    async fn invalidate(
        &self,
        identifier: &LoginIdentifier,
        challenge_id: &ChallengeId,
    ) -> Result<(), DomainError>;

    /// Deletes expired and consumed challenges. Returns how many went.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError>;
}
