//! In-memory session token store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::session::SessionToken;
use crate::ports::SessionTokenStore;

/// Tokens keyed by digest.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionTokenStore {
    tokens: Arc<RwLock<HashMap<String, SessionToken>>>,
}

impl InMemorySessionTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionTokenStore for InMemorySessionTokenStore {
    async fn insert(&self, token: &SessionToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_digest) {
            return Err(DomainError::storage("Session token digest collision"));
        }
        tokens.insert(token.token_digest.clone(), token.clone());
        Ok(())
    }

    async fn find_by_digest(&self, digest: &str) -> Result<Option<SessionToken>, DomainError> {
        Ok(self.tokens.read().await.get(digest).cloned())
    }

    async fn revoke(&self, digest: &str, at: Timestamp) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(digest) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.is_usable(&now));
        Ok(before - tokens.len())
    }
}
