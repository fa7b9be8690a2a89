//! Participation confirmation codes.
//!
//! One code per registration, 8 characters from the unambiguous code
//! alphabet. Expiry is evaluated lazily when the code is presented.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{random_code, ApplicantId, RegistrationId, StateMachine, Timestamp};

use super::{ConfirmationError, ConfirmationStatus};

pub const CONFIRMATION_CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationCode {
    pub registration_id: RegistrationId,
    pub applicant_id: ApplicantId,
    pub code: String,
    pub status: ConfirmationStatus,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
}

/// Effect of presenting a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// First successful use; store the carried record.
    Confirmed(ConfirmationCode),
    /// Already confirmed earlier; nothing to store.
    AlreadyConfirmed,
    /// Pending but past its TTL; store the carried record, then report expiry.
    Lapsed(ConfirmationCode),
}

impl ConfirmationCode {
    pub fn issue(
        registration_id: RegistrationId,
        applicant_id: ApplicantId,
        ttl_secs: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            registration_id,
            applicant_id,
            code: random_code(CONFIRMATION_CODE_LEN),
            status: ConfirmationStatus::Pending,
            issued_at: now,
            expires_at: now.plus_secs(ttl_secs),
            consumed_at: None,
        }
    }

    /// Canonical spelling of user input (trimmed, uppercase).
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_ascii_uppercase()
    }

    /// Pending and within its TTL.
    pub fn is_live(&self, now: &Timestamp) -> bool {
        self.status == ConfirmationStatus::Pending && now.is_before(&self.expires_at)
    }

    /// Works out what presenting this code at `now` does.
    ///
    /// # Errors
    ///
    /// `Expired` if the code was already marked expired.
    pub fn present(&self, now: Timestamp) -> Result<ConfirmOutcome, ConfirmationError> {
        match self.status {
            ConfirmationStatus::Confirmed => Ok(ConfirmOutcome::AlreadyConfirmed),
            ConfirmationStatus::Expired => Err(ConfirmationError::Expired),
            ConfirmationStatus::Pending => {
                let mut updated = self.clone();
                if self.is_live(&now) {
                    updated.status = self.status.transition_to(ConfirmationStatus::Confirmed)?;
                    updated.consumed_at = Some(now);
                    Ok(ConfirmOutcome::Confirmed(updated))
                } else {
                    updated.status = self.status.transition_to(ConfirmationStatus::Expired)?;
                    Ok(ConfirmOutcome::Lapsed(updated))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(now: Timestamp) -> ConfirmationCode {
        ConfirmationCode::issue(RegistrationId::generate(), ApplicantId::new(), 3600, now)
    }

    #[test]
    fn issued_code_is_pending_and_well_formed() {
        let c = code(Timestamp::now());
        assert_eq!(c.status, ConfirmationStatus::Pending);
        assert_eq!(c.code.len(), CONFIRMATION_CODE_LEN);
        assert_eq!(ConfirmationCode::normalize(&c.code.to_lowercase()), c.code);
    }

    #[test]
    fn present_confirms_live_code() {
        let now = Timestamp::now();
        match code(now).present(now).unwrap() {
            ConfirmOutcome::Confirmed(updated) => {
                assert_eq!(updated.status, ConfirmationStatus::Confirmed);
                assert_eq!(updated.consumed_at, Some(now));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn present_twice_is_already_confirmed() {
        let now = Timestamp::now();
        let confirmed = match code(now).present(now).unwrap() {
            ConfirmOutcome::Confirmed(c) => c,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(confirmed.present(now).unwrap(), ConfirmOutcome::AlreadyConfirmed);
    }

    #[test]
    fn present_after_ttl_lapses() {
        let now = Timestamp::now();
        let c = code(now);
        match c.present(now.plus_secs(3600)).unwrap() {
            ConfirmOutcome::Lapsed(updated) => {
                assert_eq!(updated.status, ConfirmationStatus::Expired);
                assert_eq!(updated.present(now).unwrap_err(), ConfirmationError::Expired);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
