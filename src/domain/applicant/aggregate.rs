//! Applicant aggregate.
//!
//! An applicant is created at registration in stage 0 and is never deleted.
//! Stage and status change only through the methods below; the repository
//! bumps `version` on every committed change.
//!
//! # Design Decisions
//!
//! - **Identity**: email and/or phone, at least one, both usable to log in
//! - **Cached stage**: `current_stage` mirrors the latest selection record
//! - **Optimistic concurrency**: writers present the `version` they read

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ApplicantId, DomainError, ErrorCode, RegistrationId, StateMachine, Timestamp, ValidationError,
};
use crate::domain::stage::StageIndex;

use super::{ApplicantStatus, EmailAddress, LoginIdentifier, PhoneNumber};

const MAX_DISPLAY_NAME_LEN: usize = 120;

/// Applicant aggregate.
///
/// # Invariants
///
/// - At least one of `email` and `phone` is present
/// - `current_stage` never decreases
/// - Terminal statuses are never left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub registration_id: RegistrationId,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub display_name: Option<String>,
    pub current_stage: StageIndex,
    pub status: ApplicantStatus,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What an applicant sees about themselves after logging in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub id: ApplicantId,
    pub registration_id: RegistrationId,
    pub display_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub current_stage: StageIndex,
    pub status: ApplicantStatus,
}

impl Applicant {
    /// Registers a new applicant at stage 0.
    ///
    /// # Errors
    ///
    /// Returns a validation error if neither identifier is given or the
    /// display name is too long.
    pub fn register(
        email: Option<EmailAddress>,
        phone: Option<PhoneNumber>,
        display_name: Option<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if email.is_none() && phone.is_none() {
            return Err(ValidationError::empty_field("email_or_phone"));
        }

        let display_name = display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(name) = &display_name {
            let len = name.chars().count();
            if len > MAX_DISPLAY_NAME_LEN {
                return Err(ValidationError::out_of_range(
                    "display_name",
                    1,
                    MAX_DISPLAY_NAME_LEN as i64,
                    len as i64,
                ));
            }
        }

        Ok(Self {
            id: ApplicantId::new(),
            registration_id: RegistrationId::generate(),
            email,
            phone,
            display_name,
            current_stage: StageIndex::REGISTRATION,
            status: ApplicantStatus::Active,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Every identifier this applicant can log in with.
    pub fn identifiers(&self) -> Vec<LoginIdentifier> {
        let mut ids = Vec::with_capacity(2);
        if let Some(email) = &self.email {
            ids.push(LoginIdentifier::Email(email.clone()));
        }
        if let Some(phone) = &self.phone {
            ids.push(LoginIdentifier::Phone(phone.clone()));
        }
        ids
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            id: self.id,
            registration_id: self.registration_id.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            current_stage: self.current_stage,
            status: self.status,
        }
    }

    /// Moves the applicant forward into `next` with the given status.
    ///
    /// # Errors
    ///
    /// Fails if `next` is not after the current stage or the status
    /// transition is not allowed.
    pub fn enter_stage(
        &mut self,
        next: StageIndex,
        status: ApplicantStatus,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if next <= self.current_stage {
            return Err(DomainError::new(
                ErrorCode::InvalidNextStage,
                format!(
                    "Stage can only move forward (current {}, requested {})",
                    self.current_stage, next
                ),
            ));
        }
        self.transition_to(status)?;
        self.current_stage = next;
        self.updated_at = now;
        Ok(())
    }

    /// Marks the applicant as not selected at the current stage.
    pub fn eliminate(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(ApplicantStatus::Eliminated)?;
        self.updated_at = now;
        Ok(())
    }

    /// Applicant leaves the process.
    pub fn withdraw(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(ApplicantStatus::Withdrawn)?;
        self.updated_at = now;
        Ok(())
    }

    /// Clears an outstanding fee; `status` is what the stage allows next.
    pub fn settle_payment(
        &mut self,
        status: ApplicantStatus,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if self.status != ApplicantStatus::AwaitingPayment {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Applicant is {} and owes no fee", self.status),
            ));
        }
        self.transition_to(status)?;
        self.updated_at = now;
        Ok(())
    }

    /// Locks in attendance after final selection.
    pub fn confirm(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(ApplicantStatus::Confirmed)?;
        self.updated_at = now;
        Ok(())
    }

    fn transition_to(&mut self, target: ApplicantStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition applicant from {} to {}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}
