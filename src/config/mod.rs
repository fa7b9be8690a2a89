//! Application configuration module
//!
//! Configuration is layered with the `config` and `dotenvy` crates:
//!
//! 1. Built-in defaults on every section
//! 2. An optional `admissions.toml` (or `.yaml`/`.json`) in the working directory
//! 3. Environment variables with the `ADMISSIONS` prefix, `__` separating
//!    nested values
//!
//! # Example
//!
//! ```no_run
//! use admissions_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod confirmation;
mod error;
mod payment;
mod pipeline;
mod server;
mod session;

pub use confirmation::ConfirmationConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::{GatewayKind, PaymentConfig};
pub use pipeline::{FeeConfig, PipelineConfig, StageConfig};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;
use std::path::Path;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Bind address, environment and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// OTP challenges, rate limits and session tokens
    #[serde(default)]
    pub session: SessionConfig,

    /// Ordered selection stages and their fees
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Payment gateway
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Confirmation codes
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

impl AppConfig {
    /// Load configuration from `admissions.*` and the environment
    ///
    /// # Environment Variable Format
    ///
    /// - `ADMISSIONS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ADMISSIONS__SESSION__OTP_SECRET=...` -> `session.otp_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        Self::build(config::File::with_name("admissions").required(false))
    }

    /// Load configuration from an explicit file, still honoring the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::default()
                    .prefix("ADMISSIONS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Production additionally requires a strong OTP secret and a real
    /// HTTPS payment gateway.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.session.validate(production)?;
        self.pipeline.validate()?;
        self.payment.validate(production)?;
        self.confirmation.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
