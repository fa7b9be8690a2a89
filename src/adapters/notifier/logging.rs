//! Notifier that only writes a log line.
//!
//! Stands in for a real email/SMS transport. The message body holds the
//! code, so only its kind and the recipient's channel are logged.

use async_trait::async_trait;

use crate::domain::applicant::LoginIdentifier;
use crate::ports::{Notification, Notifier, NotifierError};

#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(
        &self,
        recipient: &LoginIdentifier,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        let channel = match recipient {
            LoginIdentifier::Email(_) => "email",
            LoginIdentifier::Phone(_) => "sms",
        };
        tracing::info!(
            kind = ?notification.kind,
            channel,
            subject = %notification.subject,
            "Notification dispatched"
        );
        Ok(())
    }
}
