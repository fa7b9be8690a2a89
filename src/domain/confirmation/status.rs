//! Confirmation code status.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Expired,
}

impl StateMachine for ConfirmationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConfirmationStatus::*;
        matches!((self, target), (Pending, Confirmed) | (Pending, Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConfirmationStatus::*;
        match self {
            Pending => vec![Confirmed, Expired],
            Confirmed | Expired => vec![],
        }
    }
}

impl std::fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Confirmed => "confirmed",
            ConfirmationStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}
