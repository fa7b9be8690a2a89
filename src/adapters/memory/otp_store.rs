//! In-memory OTP challenge store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::applicant::LoginIdentifier;
use crate::domain::foundation::{ChallengeId, DomainError, Timestamp};
use crate::domain::session::OtpChallenge;
use crate::ports::{AttemptGrant, OtpStore};

/// One slot per identifier storage key; `upsert` overwrites the slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOtpStore {
    challenges: Arc<RwLock<HashMap<String, OtpChallenge>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored challenges (useful for tests)
    pub async fn len(&self) -> usize {
        self.challenges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn upsert(&self, challenge: OtpChallenge) -> Result<(), DomainError> {
        let key = challenge.identifier.storage_key();
        self.challenges.write().await.insert(key, challenge);
        Ok(())
    }

    async fn find_active(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<OtpChallenge>, DomainError> {
        let challenges = self.challenges.read().await;
        Ok(challenges
            .get(&identifier.storage_key())
            .filter(|c| !c.consumed)
            .cloned())
    }

    async fn begin_attempt(
        &self,
        identifier: &LoginIdentifier,
        now: Timestamp,
    ) -> Result<Option<AttemptGrant>, DomainError> {
        let mut challenges = self.challenges.write().await;
        let Some(challenge) = challenges
            .get_mut(&identifier.storage_key())
            .filter(|c| !c.consumed)
        else {
            return Ok(None);
        };
        Ok(Some(match challenge.begin_attempt(&now) {
            Ok(_) => AttemptGrant::Granted(challenge.clone()),
            Err(reason) => AttemptGrant::Refused {
                challenge_id: challenge.id,
                reason,
            },
        }))
    }

    async fn consume(
        &self,
        identifier: &LoginIdentifier,
        challenge_id: &ChallengeId,
    ) -> Result<bool, DomainError> {
        let mut challenges = self.challenges.write().await;
        match challenges.get_mut(&identifier.storage_key()) {
            Some(c) if c.id == *challenge_id && !c.consumed => {
                c.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate(
        &self,
        identifier: &LoginIdentifier,
        challenge_id: &ChallengeId,
    ) -> Result<(), DomainError> {
        let key = identifier.storage_key();
        let mut challenges = self.challenges.write().await;
        if challenges.get(&key).is_some_and(|c| c.id == *challenge_id) {
            challenges.remove(&key);
        }
        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        challenges.retain(|_, c| !c.consumed && !c.is_expired(&now));
        Ok(before - challenges.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::AttemptRefusal;

    fn identifier() -> LoginIdentifier {
        LoginIdentifier::parse("ada@example.com").unwrap()
    }

    fn challenge(now: Timestamp) -> OtpChallenge {
        OtpChallenge::issue(identifier(), "ab".to_string(), 600, 5, now)
    }

    #[tokio::test]
    async fn upsert_replaces_previous_challenge() {
        let store = InMemoryOtpStore::new();
        let now = Timestamp::now();
        let first = challenge(now);
        let second = challenge(now);
        store.upsert(first.clone()).await.unwrap();
        store.upsert(second.clone()).await.unwrap();

        let active = store.find_active(&identifier()).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert_eq!(store.len().await, 1);

        // Operations naming the old challenge do nothing
        assert!(!store.consume(&identifier(), &first.id).await.unwrap());
        store.invalidate(&identifier(), &first.id).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn consume_succeeds_exactly_once() {
        let store = InMemoryOtpStore::new();
        let c = challenge(Timestamp::now());
        store.upsert(c.clone()).await.unwrap();

        assert!(store.consume(&identifier(), &c.id).await.unwrap());
        assert!(!store.consume(&identifier(), &c.id).await.unwrap());
        assert!(store.find_active(&identifier()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn attempts_are_granted_up_to_the_limit() {
        let store = InMemoryOtpStore::new();
        let now = Timestamp::now();
        let c = challenge(now);
        store.upsert(c.clone()).await.unwrap();

        for expected in 1..=5 {
            match store.begin_attempt(&identifier(), now).await.unwrap() {
                Some(AttemptGrant::Granted(granted)) => assert_eq!(granted.attempts, expected),
                other => panic!("expected grant {}, got {:?}", expected, other),
            }
        }
        assert_eq!(
            store.begin_attempt(&identifier(), now).await.unwrap(),
            Some(AttemptGrant::Refused {
                challenge_id: c.id,
                reason: AttemptRefusal::Exhausted,
            })
        );
    }

    #[tokio::test]
    async fn concurrent_attempts_never_exceed_the_limit() {
        let store = Arc::new(InMemoryOtpStore::new());
        let now = Timestamp::now();
        store.upsert(challenge(now)).await.unwrap();

        let tasks: Vec<_> = (0..40)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.begin_attempt(&identifier(), now).await.unwrap() })
            })
            .collect();

        let mut granted = Vec::new();
        for task in tasks {
            if let Some(AttemptGrant::Granted(c)) = task.await.unwrap() {
                granted.push(c.attempts);
            }
        }
        granted.sort_unstable();
        assert_eq!(granted, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn expired_challenge_refuses_attempts() {
        let store = InMemoryOtpStore::new();
        let now = Timestamp::now();
        store.upsert(challenge(now.minus_secs(3600))).await.unwrap();

        assert!(matches!(
            store.begin_attempt(&identifier(), now).await.unwrap(),
            Some(AttemptGrant::Refused {
                reason: AttemptRefusal::Expired,
                ..
            })
        ));
        let other = LoginIdentifier::parse("bob@example.com").unwrap();
        assert_eq!(store.begin_attempt(&other, now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn purge_drops_expired_and_consumed() {
        let store = InMemoryOtpStore::new();
        let now = Timestamp::now();
        store.upsert(challenge(now.minus_secs(3600))).await.unwrap();

        let other = LoginIdentifier::parse("+14155550100").unwrap();
        store
            .upsert(OtpChallenge::issue(other.clone(), "cd".into(), 600, 5, now))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert!(store.find_active(&other).await.unwrap().is_some());
    }
}
