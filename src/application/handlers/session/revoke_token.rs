//! RevokeTokenHandler - Command handler for logging out one session.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::session::{BearerToken, SessionError};
use crate::ports::SessionTokenStore;

#[derive(Debug, Clone)]
pub struct RevokeTokenCommand {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeTokenResult {
    /// False when the token was unknown or already revoked.
    pub revoked: bool,
}

pub struct RevokeTokenHandler {
    tokens: Arc<dyn SessionTokenStore>,
}

impl RevokeTokenHandler {
    pub fn new(tokens: Arc<dyn SessionTokenStore>) -> Self {
        Self { tokens }
    }

    pub async fn handle(&self, cmd: RevokeTokenCommand) -> Result<RevokeTokenResult, SessionError> {
        let Some(bearer) = BearerToken::parse(&cmd.token) else {
            return Ok(RevokeTokenResult { revoked: false });
        };

        let revoked = self.tokens.revoke(&bearer.digest(), Timestamp::now()).await?;
        if revoked {
            tracing::info!("Session token revoked");
        }
        Ok(RevokeTokenResult { revoked })
    }
}
