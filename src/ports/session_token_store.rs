//! Session token store port.
//!
//! Tokens are looked up by the SHA-256 digest of the bearer secret.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::session::SessionToken;

#[async_trait]
pub trait SessionTokenStore: Send + Sync {
    async fn insert(&self, token: &SessionToken) -> Result<(), DomainError>;

    async fn find_by_digest(&self, digest: &str) -> Result<Option<SessionToken>, DomainError>;

    /// Marks the token revoked. Returns false if unknown or already revoked.
    async fn revoke(&self, digest: &str, at: Timestamp) -> Result<bool, DomainError>;

    /// Deletes expired and revoked tokens. Returns how many went.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError>;
}
