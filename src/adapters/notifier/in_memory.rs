//! Notifier that keeps every message in memory.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::applicant::LoginIdentifier;
use crate::ports::{Notification, NotificationKind, Notifier, NotifierError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    pub recipient: LoginIdentifier,
    pub notification: Notification,
}

#[derive(Default)]
struct State {
    delivered: Vec<DeliveredMessage>,
    failing: bool,
}

/// # Example
///
/// ```ignore
/// let notifier = InMemoryNotifier::new();
/// // ... request an OTP ...
/// let code = notifier
///     .last_code_for(&identifier, NotificationKind::LoginCode)
///     .await
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    inner: Arc<Mutex<State>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `send` fail until switched back.
    pub async fn set_failing(&self, failing: bool) {
        self.inner.lock().await.failing = failing;
    }

    pub async fn delivered(&self) -> Vec<DeliveredMessage> {
        self.inner.lock().await.delivered.clone()
    }

    /// The latest message of `kind` sent to `recipient`.
    pub async fn last_for(
        &self,
        recipient: &LoginIdentifier,
        kind: NotificationKind,
    ) -> Option<Notification> {
        self.inner
            .lock()
            .await
            .delivered
            .iter()
            .rev()
            .find(|m| &m.recipient == recipient && m.notification.kind == kind)
            .map(|m| m.notification.clone())
    }

    /// The code carried by the latest message of `kind` to `recipient`.
    ///
    /// Codes are the only token in a message body made solely of ASCII
    /// digits and uppercase letters.
    pub async fn last_code_for(
        &self,
        recipient: &LoginIdentifier,
        kind: NotificationKind,
    ) -> Option<String> {
        let notification = self.last_for(recipient, kind).await?;
        notification
            .body
            .split(|c: char| c.is_whitespace() || c == '.' || c == ',')
            .find(|word| {
                word.len() >= 4
                    && word.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
            })
            .map(str::to_string)
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send(
        &self,
        recipient: &LoginIdentifier,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        let mut state = self.inner.lock().await;
        if state.failing {
            return Err(NotifierError::Unavailable("notifier switched off".to_string()));
        }
        state.delivered.push(DeliveredMessage {
            recipient: recipient.clone(),
            notification: notification.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extracts_login_code() {
        let notifier = InMemoryNotifier::new();
        let to = LoginIdentifier::parse("ada@example.com").unwrap();
        notifier
            .send(&to, &Notification::login_code("042137", 600))
            .await
            .unwrap();

        assert_eq!(
            notifier.last_code_for(&to, NotificationKind::LoginCode).await.as_deref(),
            Some("042137")
        );
    }

    #[tokio::test]
    async fn extracts_confirmation_code_not_registration_id() {
        let notifier = InMemoryNotifier::new();
        let to = LoginIdentifier::parse("ada@example.com").unwrap();
        notifier
            .send(&to, &Notification::confirmation_code("K7M2PQ9X", "REG-ABCD2345"))
            .await
            .unwrap();

        assert_eq!(
            notifier
                .last_code_for(&to, NotificationKind::ConfirmationCode)
                .await
                .as_deref(),
            Some("K7M2PQ9X")
        );
    }

    #[tokio::test]
    async fn failing_notifier_keeps_nothing() {
        let notifier = InMemoryNotifier::new();
        notifier.set_failing(true).await;
        let to = LoginIdentifier::parse("+14155550100").unwrap();
        assert!(notifier
            .send(&to, &Notification::login_code("123456", 600))
            .await
            .is_err());
        assert!(notifier.delivered().await.is_empty());
    }
}
