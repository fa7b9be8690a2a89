//! Confirmation code configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationConfig {
    /// Seconds a confirmation code stays valid
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,
}

impl ConfirmationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code_ttl_secs == 0 {
            return Err(ValidationError::InvalidTtl("confirmation.code_ttl_secs"));
        }
        Ok(())
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl(),
        }
    }
}

fn default_code_ttl() -> u64 {
    7 * 24 * 60 * 60
}
