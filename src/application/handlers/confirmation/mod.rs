//! Confirmation handlers.
//!
//! Final-round participants confirm attendance with a one-time code.
//!
//! ## Commands
//! - Issuing (or re-sending) a registration's confirmation code
//! - Confirming participation with a code

mod confirm;
mod issue_code;

use std::time::Duration;

use crate::config::{ConfirmationConfig, SessionConfig};

pub use confirm::{ConfirmCommand, ConfirmHandler, ConfirmResult};
pub use issue_code::{IssueCodeCommand, IssueCodeHandler, IssueCodeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub code_ttl_secs: u64,
    pub notifier_timeout: Duration,
}

impl ConfirmationPolicy {
    /// Notifier timeout is shared with login code delivery.
    pub fn from_config(confirmation: &ConfirmationConfig, session: &SessionConfig) -> Self {
        Self {
            code_ttl_secs: confirmation.code_ttl_secs,
            notifier_timeout: Duration::from_secs(session.notifier_timeout_secs),
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from_config(&ConfirmationConfig::default(), &SessionConfig::default())
    }
}
