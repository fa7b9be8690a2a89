//! Session tokens.
//!
//! The applicant holds a random bearer secret; the store keeps only its
//! SHA-256 digest. Expiry is absolute and never extended on use.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::foundation::{ApplicantId, SessionTokenId, Timestamp};

const TOKEN_BYTES: usize = 32;

/// The bearer secret handed to the client. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// 32 random bytes from the OS CSPRNG, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accepts only well-formed tokens; anything else cannot be ours.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let well_formed = raw.len() == TOKEN_BYTES * 2 && raw.chars().all(|c| c.is_ascii_hexdigit());
        well_formed.then(|| Self(raw.to_ascii_lowercase()))
    }

    /// Hex SHA-256 of the secret; the only form that is stored.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(***)")
    }
}

/// Stored record of an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: SessionTokenId,
    pub applicant_id: ApplicantId,
    pub token_digest: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl SessionToken {
    /// Mints a new bearer secret and the record to store for it.
    pub fn mint(applicant_id: ApplicantId, ttl_secs: u64, now: Timestamp) -> (BearerToken, Self) {
        let bearer = BearerToken::generate();
        let record = Self {
            id: SessionTokenId::new(),
            applicant_id,
            token_digest: bearer.digest(),
            issued_at: now,
            expires_at: now.plus_secs(ttl_secs),
            revoked_at: None,
        };
        (bearer, record)
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    pub fn is_usable(&self, now: &Timestamp) -> bool {
        self.revoked_at.is_none() && !self.is_expired(now)
    }
}
