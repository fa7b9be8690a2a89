//! Payment gateway configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Which gateway adapter to wire in
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// In-process gateway that approves everything; development only
    #[default]
    Mock,
    /// REST gateway reached over HTTP
    Http,
}

/// Payment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub gateway: GatewayKind,

    /// Gateway API base URL (required for `http`)
    pub gateway_base_url: Option<String>,

    /// Gateway API key (required for `http`)
    pub gateway_api_key: Option<SecretString>,

    /// Upper bound on a single gateway call, in seconds
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,

    /// Where the gateway sends applicants after checkout
    pub return_url: Option<String>,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.gateway_timeout_secs == 0 || self.gateway_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("payment.gateway_timeout_secs"));
        }

        match self.gateway {
            GatewayKind::Mock if production => Err(ValidationError::MockGatewayInProduction),
            GatewayKind::Mock => Ok(()),
            GatewayKind::Http => {
                let url = self
                    .gateway_base_url
                    .as_deref()
                    .ok_or(ValidationError::MissingRequired("PAYMENT__GATEWAY_BASE_URL"))?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidGatewayUrl);
                }
                if production && !url.starts_with("https://") {
                    return Err(ValidationError::GatewayMustBeHttps);
                }
                if self.gateway_api_key.is_none() {
                    return Err(ValidationError::MissingRequired("PAYMENT__GATEWAY_API_KEY"));
                }
                Ok(())
            }
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayKind::Mock,
            gateway_base_url: None,
            gateway_api_key: None,
            gateway_timeout_secs: default_gateway_timeout(),
            return_url: None,
        }
    }
}

fn default_gateway_timeout() -> u64 {
    10
}
