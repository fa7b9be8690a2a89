//! RequestOtpHandler - Command handler for issuing a login code.

use std::sync::Arc;

use crate::domain::applicant::LoginIdentifier;
use crate::domain::foundation::Timestamp;
use crate::domain::session::{OtpChallenge, OtpCode, OtpHasher, SessionError};
use crate::ports::{
    ApplicantRepository, Notification, Notifier, OtpStore, RateLimitKey, RateLimitResult,
    RateLimiter,
};

use super::SessionPolicy;

/// Command to send a login code.
#[derive(Debug, Clone)]
pub struct RequestOtpCommand {
    /// Email or phone, as typed.
    pub identifier: String,
}

/// Generic acknowledgement; identical whether or not the identifier is
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOtpResult {
    pub expires_in_secs: u64,
}

/// Handler for OTP requests.
///
/// Codes are only stored and sent for registered identifiers; the caller
/// cannot tell the difference. The rate limit applies either way.
pub struct RequestOtpHandler {
    otp_store: Arc<dyn OtpStore>,
    applicants: Arc<dyn ApplicantRepository>,
    rate_limiter: Arc<dyn RateLimiter>,
    notifier: Arc<dyn Notifier>,
    hasher: OtpHasher,
    policy: SessionPolicy,
}

impl RequestOtpHandler {
    pub fn new(
        otp_store: Arc<dyn OtpStore>,
        applicants: Arc<dyn ApplicantRepository>,
        rate_limiter: Arc<dyn RateLimiter>,
        notifier: Arc<dyn Notifier>,
        hasher: OtpHasher,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            otp_store,
            applicants,
            rate_limiter,
            notifier,
            hasher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: RequestOtpCommand) -> Result<RequestOtpResult, SessionError> {
        let identifier = LoginIdentifier::parse(&cmd.identifier)?;

        // 1. Rate limit per normalized identifier
        match self
            .rate_limiter
            .check(RateLimitKey::otp_request(&identifier))
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))?
        {
            RateLimitResult::Allowed(_) => {}
            RateLimitResult::Denied(denied) => {
                tracing::info!(
                    retry_after_secs = denied.retry_after_secs,
                    "OTP request rate limited"
                );
                return Err(SessionError::rate_limited(denied.retry_after_secs));
            }
        }

        let ack = RequestOtpResult {
            expires_in_secs: self.policy.otp_ttl_secs,
        };

        // 2. Unknown identifiers get the same answer and no code
        if self.applicants.find_by_identifier(&identifier).await?.is_none() {
            tracing::debug!("OTP requested for unregistered identifier");
            return Ok(ack);
        }

        // 3. Replace any outstanding challenge
        let code = OtpCode::generate(self.policy.otp_length);
        let challenge = OtpChallenge::issue(
            identifier.clone(),
            self.hasher.hash(&identifier, &code),
            self.policy.otp_ttl_secs,
            self.policy.otp_max_attempts,
            Timestamp::now(),
        );
        let challenge_id = challenge.id;
        self.otp_store.upsert(challenge).await?;

        // 4. Best-effort delivery
        let notification = Notification::login_code(code.expose(), self.policy.otp_ttl_secs);
        match tokio::time::timeout(
            self.policy.notifier_timeout,
            self.notifier.send(&identifier, &notification),
        )
        .await
        {
            Ok(Ok(())) => tracing::info!(challenge_id = %challenge_id, "OTP issued"),
            Ok(Err(e)) => {
                tracing::warn!(challenge_id = %challenge_id, error = %e, "OTP delivery failed")
            }
            Err(_) => tracing::warn!(
                challenge_id = %challenge_id,
                timeout_secs = self.policy.notifier_timeout.as_secs(),
                "OTP delivery timed out"
            ),
        }

        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryApplicantRepository, InMemoryOtpStore};
    use crate::adapters::notifier::InMemoryNotifier;
    use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, WindowLimit};
    use crate::domain::applicant::{Applicant, EmailAddress};
    use crate::ports::NotificationKind;
    use secrecy::SecretString;

    struct Fixture {
        handler: RequestOtpHandler,
        store: Arc<InMemoryOtpStore>,
        notifier: Arc<InMemoryNotifier>,
    }

    async fn fixture(limit: u32) -> Fixture {
        let store = Arc::new(InMemoryOtpStore::new());
        let applicants = Arc::new(InMemoryApplicantRepository::new());
        let applicant = Applicant::register(
            Some(EmailAddress::parse("ada@example.com").unwrap()),
            None,
            None,
            Timestamp::now(),
        )
        .unwrap();
        applicants.insert(&applicant).await.unwrap();

        let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            otp_request: WindowLimit {
                limit,
                window_secs: 900,
            },
            ..RateLimitConfig::default()
        }));
        let notifier = Arc::new(InMemoryNotifier::new());
        let handler = RequestOtpHandler::new(
            store.clone(),
            applicants,
            limiter,
            notifier.clone(),
            OtpHasher::new(SecretString::new("k".repeat(32))),
            SessionPolicy::default(),
        );
        Fixture {
            handler,
            store,
            notifier,
        }
    }

    fn cmd(identifier: &str) -> RequestOtpCommand {
        RequestOtpCommand {
            identifier: identifier.to_string(),
        }
    }

    #[tokio::test]
    async fn issues_and_sends_a_code() {
        let f = fixture(5).await;
        let result = f.handler.handle(cmd(" ADA@example.com ")).await.unwrap();
        assert_eq!(result.expires_in_secs, 600);

        let identifier = LoginIdentifier::parse("ada@example.com").unwrap();
        let challenge = f.store.find_active(&identifier).await.unwrap().unwrap();
        let code = f
            .notifier
            .last_code_for(&identifier, NotificationKind::LoginCode)
            .await
            .unwrap();
        assert_eq!(code.len(), 6);
        assert_ne!(challenge.code_hash, code);
    }

    #[tokio::test]
    async fn unregistered_identifier_gets_same_ack_and_no_code() {
        let f = fixture(5).await;
        let result = f.handler.handle(cmd("nobody@example.com")).await.unwrap();
        assert_eq!(result.expires_in_secs, 600);
        assert!(f.store.is_empty().await);
        assert!(f.notifier.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn new_request_replaces_previous_challenge() {
        let f = fixture(5).await;
        let identifier = LoginIdentifier::parse("ada@example.com").unwrap();

        f.handler.handle(cmd("ada@example.com")).await.unwrap();
        let first = f.store.find_active(&identifier).await.unwrap().unwrap();
        f.handler.handle(cmd("ada@example.com")).await.unwrap();
        let second = f.store.find_active(&identifier).await.unwrap().unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn excess_requests_are_rate_limited() {
        let f = fixture(2).await;
        f.handler.handle(cmd("ada@example.com")).await.unwrap();
        f.handler.handle(cmd("ada@example.com")).await.unwrap();

        let err = f.handler.handle(cmd("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, SessionError::RateLimited { retry_after_secs } if retry_after_secs > 0));
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_issuance() {
        let f = fixture(5).await;
        f.notifier.set_failing(true).await;

        assert!(f.handler.handle(cmd("ada@example.com")).await.is_ok());
        let identifier = LoginIdentifier::parse("ada@example.com").unwrap();
        assert!(f.store.find_active(&identifier).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn malformed_identifier_is_rejected() {
        let f = fixture(5).await;
        let err = f.handler.handle(cmd("not-a-phone")).await.unwrap_err();
        assert!(matches!(err, SessionError::ValidationFailed { .. }));
    }
}
