//! Notifier port for delivering codes to applicants.
//!
//! Delivery is best-effort. Callers bound each send with a timeout and
//! decide for themselves whether a failure matters.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::applicant::LoginIdentifier;

/// What a notification is about. Safe to log; the body is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LoginCode,
    ConfirmationCode,
}

/// A message ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn login_code(code: &str, expires_in_secs: u64) -> Self {
        Self {
            kind: NotificationKind::LoginCode,
            subject: "Your login code".to_string(),
            body: format!(
                "Your login code is {}. It expires in {} minutes.",
                code,
                expires_in_secs.div_ceil(60)
            ),
        }
    }

    pub fn confirmation_code(code: &str, registration_id: &str) -> Self {
        Self {
            kind: NotificationKind::ConfirmationCode,
            subject: "Confirm your participation".to_string(),
            body: format!(
                "Congratulations, registration {} reached the final round. \
                 Confirm your participation with code {}.",
                registration_id, code
            ),
        }
    }
}

impl std::fmt::Debug for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notification")
            .field("kind", &self.kind)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient: &LoginIdentifier,
        notification: &Notification,
    ) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notifier unavailable: {0}")]
    Unavailable(String),

    #[error("recipient rejected: {0}")]
    Rejected(String),
}
