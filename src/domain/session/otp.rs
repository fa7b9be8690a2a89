//! One-time passcodes and their challenges.
//!
//! Only a keyed HMAC-SHA256 of `identifier:code` is ever stored, so a
//! leaked store does not reveal live codes.

use hmac::{Hmac, Mac};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::domain::applicant::LoginIdentifier;
use crate::domain::foundation::{ChallengeId, Timestamp, ValidationError};

use super::SessionError;

pub const MIN_OTP_LENGTH: usize = 4;
pub const MAX_OTP_LENGTH: usize = 10;

/// A plaintext one-time code. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generates a numeric code of `length` digits with the OS CSPRNG.
    pub fn generate(length: usize) -> Self {
        let mut rng = rand::rngs::OsRng;
        let code = (0..length.clamp(MIN_OTP_LENGTH, MAX_OTP_LENGTH))
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// Parses user input, ignoring surrounding whitespace.
    pub fn parse(raw: &str, length: usize) -> Result<Self, ValidationError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        if code.len() != length || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "code",
                format!("expected {} digits", length),
            ));
        }
        Ok(Self(code.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OtpCode(***)")
    }
}

/// Keyed hashing of OTP codes.
#[derive(Clone)]
pub struct OtpHasher {
    key: Arc<SecretString>,
}

impl OtpHasher {
    pub fn new(key: SecretString) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Hex HMAC-SHA256 of `identifier:code`.
    pub fn hash(&self, identifier: &LoginIdentifier, code: &OtpCode) -> String {
        hex::encode(self.mac(identifier, code))
    }

    /// Constant-time check of `code` against a stored hash.
    pub fn verify(&self, identifier: &LoginIdentifier, code: &OtpCode, stored_hash: &str) -> bool {
        let Ok(stored) = hex::decode(stored_hash) else {
            return false;
        };
        let computed = self.mac(identifier, code);
        computed.len() == stored.len() && bool::from(computed.ct_eq(&stored))
    }

    fn mac(&self, identifier: &LoginIdentifier, code: &OtpCode) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.key.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(identifier.storage_key().as_bytes());
        mac.update(b":");
        mac.update(code.expose().as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for OtpHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpHasher").finish_non_exhaustive()
    }
}

/// The single outstanding OTP for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub id: ChallengeId,
    pub identifier: LoginIdentifier,
    pub code_hash: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub attempts: u32,
    pub max_attempts: u32,
    pub consumed: bool,
}

/// Why a challenge refused another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptRefusal {
    Consumed,
    Expired,
    Exhausted,
}

impl OtpChallenge {
    pub fn issue(
        identifier: LoginIdentifier,
        code_hash: String,
        ttl_secs: u64,
        max_attempts: u32,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ChallengeId::new(),
            identifier,
            code_hash,
            issued_at: now,
            expires_at: now.plus_secs(ttl_secs),
            attempts: 0,
            max_attempts,
            consumed: false,
        }
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Spends one attempt and returns the new count. Attempts are counted
    /// before the code is compared, so the count bounds the number of
    /// comparisons ever made against this challenge. Expiry wins over
    /// everything else.
    pub fn begin_attempt(&mut self, now: &Timestamp) -> Result<u32, AttemptRefusal> {
        if self.consumed {
            Err(AttemptRefusal::Consumed)
        } else if self.is_expired(now) {
            Err(AttemptRefusal::Expired)
        } else if self.attempts >= self.max_attempts {
            Err(AttemptRefusal::Exhausted)
        } else {
            self.attempts += 1;
            Ok(self.attempts)
        }
    }

    /// Error for a wrong code once the attempt count is `attempts_after`.
    pub fn failure_after(&self, attempts_after: u32) -> SessionError {
        if attempts_after >= self.max_attempts {
            SessionError::AttemptsExceeded
        } else {
            SessionError::mismatch(self.max_attempts - attempts_after)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> OtpHasher {
        OtpHasher::new(SecretString::new("test-otp-key".to_string()))
    }

    fn identifier() -> LoginIdentifier {
        LoginIdentifier::parse("ada@example.com").unwrap()
    }

    fn challenge(now: Timestamp) -> OtpChallenge {
        OtpChallenge::issue(identifier(), "00".to_string(), 600, 5, now)
    }

    #[test]
    fn generated_code_has_requested_digits() {
        let code = OtpCode::generate(6);
        assert_eq!(code.expose().len(), 6);
        assert!(code.expose().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn debug_does_not_reveal_code() {
        let code = OtpCode::parse("123456", 6).unwrap();
        assert_eq!(format!("{:?}", code), "OtpCode(***)");
    }

    #[test]
    fn parse_checks_length_and_digits() {
        assert!(OtpCode::parse(" 123456 ", 6).is_ok());
        assert!(OtpCode::parse("12345", 6).is_err());
        assert!(OtpCode::parse("12a456", 6).is_err());
        assert!(OtpCode::parse("", 6).is_err());
    }

    #[test]
    fn hash_verifies_only_same_identifier_and_code() {
        let h = hasher();
        let code = OtpCode::parse("482913", 6).unwrap();
        let stored = h.hash(&identifier(), &code);

        assert!(h.verify(&identifier(), &code, &stored));
        assert!(!h.verify(&identifier(), &OtpCode::parse("482914", 6).unwrap(), &stored));
        let other = LoginIdentifier::parse("bob@example.com").unwrap();
        assert!(!h.verify(&other, &code, &stored));
        assert!(!h.verify(&identifier(), &code, "not-hex"));
    }

    #[test]
    fn hash_depends_on_key() {
        let code = OtpCode::parse("482913", 6).unwrap();
        let other = OtpHasher::new(SecretString::new("another-key".to_string()));
        assert_ne!(hasher().hash(&identifier(), &code), other.hash(&identifier(), &code));
    }

    #[test]
    fn begin_attempt_counts_until_exhausted() {
        let now = Timestamp::now();
        let mut c = challenge(now);
        for expected in 1..=5 {
            assert_eq!(c.begin_attempt(&now), Ok(expected));
        }
        assert_eq!(c.begin_attempt(&now), Err(AttemptRefusal::Exhausted));
        assert_eq!(c.attempts, 5);
    }

    #[test]
    fn begin_attempt_prefers_expiry() {
        let now = Timestamp::now();
        let mut c = challenge(now);
        c.attempts = 5;
        assert_eq!(c.begin_attempt(&now.plus_secs(600)), Err(AttemptRefusal::Expired));
        c.consumed = true;
        assert_eq!(c.begin_attempt(&now), Err(AttemptRefusal::Consumed));
    }

    #[test]
    fn failure_after_counts_down_to_exceeded() {
        let c = challenge(Timestamp::now());
        assert_eq!(c.failure_after(1), SessionError::mismatch(4));
        assert_eq!(c.failure_after(4), SessionError::mismatch(1));
        assert_eq!(c.failure_after(5), SessionError::AttemptsExceeded);
    }
}
