//! Applicant status state machine.
//!
//! `Active` covers every "pending review" point of the pipeline. The two
//! awaiting states are entered when a selection lands on a stage that needs
//! a fee or on the final stage.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Overall status of an applicant in the admission pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    /// In the pipeline, waiting for a decision on the current stage.
    Active,

    /// Selected into a fee-bearing stage; the fee has not been settled yet.
    AwaitingPayment,

    /// Selected into the final stage; attendance not yet confirmed.
    AwaitingConfirmation,

    /// Attendance confirmed. Terminal.
    Confirmed,

    /// Rejected at some stage. Terminal.
    Eliminated,

    /// Left the process voluntarily. Terminal.
    Withdrawn,
}

impl ApplicantStatus {
    /// Returns true if a `selected` decision may be recorded in this status.
    pub fn accepts_selection(&self) -> bool {
        matches!(self, ApplicantStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Active => "active",
            ApplicantStatus::AwaitingPayment => "awaiting_payment",
            ApplicantStatus::AwaitingConfirmation => "awaiting_confirmation",
            ApplicantStatus::Confirmed => "confirmed",
            ApplicantStatus::Eliminated => "eliminated",
            ApplicantStatus::Withdrawn => "withdrawn",
        }
    }
}

impl std::fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for ApplicantStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ApplicantStatus::*;
        matches!(
            (self, target),
            // From ACTIVE
            (Active, Active) // Selected into a free intermediate stage
                | (Active, AwaitingPayment)
                | (Active, AwaitingConfirmation)
                | (Active, Eliminated)
                | (Active, Withdrawn)
            // From AWAITING_PAYMENT
                | (AwaitingPayment, Active)
                | (AwaitingPayment, AwaitingConfirmation)
                | (AwaitingPayment, Eliminated)
                | (AwaitingPayment, Withdrawn)
            // From AWAITING_CONFIRMATION
                | (AwaitingConfirmation, Confirmed)
                | (AwaitingConfirmation, Eliminated)
                | (AwaitingConfirmation, Withdrawn)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ApplicantStatus::*;
        match self {
            Active => vec![Active, AwaitingPayment, AwaitingConfirmation, Eliminated, Withdrawn],
            AwaitingPayment => vec![Active, AwaitingConfirmation, Eliminated, Withdrawn],
            AwaitingConfirmation => vec![Confirmed, Eliminated, Withdrawn],
            Confirmed | Eliminated | Withdrawn => vec![],
        }
    }
}
