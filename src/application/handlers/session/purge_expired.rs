//! PurgeExpiredHandler - storage hygiene for challenges, tokens and
//! rate limit logs.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::session::SessionError;
use crate::ports::{OtpStore, RateLimiter, SessionTokenStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeExpiredResult {
    pub challenges: usize,
    pub tokens: usize,
    pub rate_limit_keys: usize,
}

pub struct PurgeExpiredHandler {
    otp_store: Arc<dyn OtpStore>,
    tokens: Arc<dyn SessionTokenStore>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl PurgeExpiredHandler {
    pub fn new(
        otp_store: Arc<dyn OtpStore>,
        tokens: Arc<dyn SessionTokenStore>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            otp_store,
            tokens,
            rate_limiter,
        }
    }

    /// A limiter failure is logged and does not fail the purge.
    pub async fn handle(&self) -> Result<PurgeExpiredResult, SessionError> {
        let now = Timestamp::now();
        let rate_limit_keys = self.rate_limiter.purge_idle().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "rate limiter purge failed");
            0
        });
        let result = PurgeExpiredResult {
            challenges: self.otp_store.purge_expired(now).await?,
            tokens: self.tokens.purge_expired(now).await?,
            rate_limit_keys,
        };
        tracing::debug!(
            challenges = result.challenges,
            tokens = result.tokens,
            rate_limit_keys = result.rate_limit_keys,
            "Purged expired session state"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryOtpStore, InMemorySessionTokenStore};
    use crate::adapters::rate_limiter::InMemoryRateLimiter;
    use crate::ports::RateLimitKey;
    use crate::domain::applicant::LoginIdentifier;
    use crate::domain::foundation::ApplicantId;
    use crate::domain::session::{OtpChallenge, SessionToken};

    #[tokio::test]
    async fn purges_only_dead_entries() {
        let otp_store = Arc::new(InMemoryOtpStore::new());
        let tokens = Arc::new(InMemorySessionTokenStore::new());
        let past = Timestamp::now().minus_secs(7200);

        otp_store
            .upsert(OtpChallenge::issue(
                LoginIdentifier::parse("ada@example.com").unwrap(),
                "00".into(),
                600,
                5,
                past,
            ))
            .await
            .unwrap();
        let (_, old) = SessionToken::mint(ApplicantId::new(), 600, past);
        let (_, live) = SessionToken::mint(ApplicantId::new(), 3600, Timestamp::now());
        tokens.insert(&old).await.unwrap();
        tokens.insert(&live).await.unwrap();

        let limiter = Arc::new(InMemoryRateLimiter::with_defaults());
        limiter.check_at(&RateLimitKey::ip("10.0.0.1"), past).await;
        limiter.check(RateLimitKey::ip("10.0.0.2")).await.unwrap();

        let handler = PurgeExpiredHandler::new(otp_store, tokens, limiter.clone());
        assert_eq!(
            handler.handle().await.unwrap(),
            PurgeExpiredResult {
                challenges: 1,
                tokens: 1,
                rate_limit_keys: 1,
            }
        );
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
