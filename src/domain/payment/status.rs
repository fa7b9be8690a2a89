//! Payment order status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of a payment order.
///
/// Status only moves forward. `Created` may jump straight to a terminal
/// state because the gateway's "pending" notification can be lost or
/// arrive after the final one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order exists locally, checkout not yet started.
    Created,

    /// Gateway reported the payment in progress.
    Pending,

    /// Paid. Terminal.
    Success,

    /// Gateway declined or errored. Terminal; retryable with a new order.
    Failed,

    /// Abandoned or cancelled at the gateway. Terminal; retryable.
    Cancelled,
}

impl PaymentStatus {
    /// Non-terminal orders block a new order for the same payment type.
    pub fn is_active(&self) -> bool {
        matches!(self, PaymentStatus::Created | PaymentStatus::Pending)
    }

    /// Returns true if `retry` may supersede an order in this status.
    pub fn allows_retry(&self) -> bool {
        matches!(self, PaymentStatus::Failed | PaymentStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    /// Accepts the gateway vocabulary as well as our own.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "initiated" => Ok(PaymentStatus::Created),
            "pending" | "processing" => Ok(PaymentStatus::Pending),
            "success" | "succeeded" | "paid" | "captured" => Ok(PaymentStatus::Success),
            "failed" | "failure" | "declined" => Ok(PaymentStatus::Failed),
            "cancelled" | "canceled" | "aborted" => Ok(PaymentStatus::Cancelled),
            other => Err(format!("unrecognized payment status '{}'", other)),
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Created, Pending)
                | (Created, Success)
                | (Created, Failed)
                | (Created, Cancelled)
                | (Pending, Success)
                | (Pending, Failed)
                | (Pending, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Created => vec![Pending, Success, Failed, Cancelled],
            Pending => vec![Success, Failed, Cancelled],
            Success | Failed | Cancelled => vec![],
        }
    }
}
