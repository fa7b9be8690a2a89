//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("OTP length must be between {min} and {max}")]
    InvalidOtpLength { min: usize, max: usize },

    #[error("OTP max attempts must be between 1 and 20")]
    InvalidAttempts,

    #[error("OTP request limit and window must both be positive")]
    InvalidRateLimit,

    #[error("Invalid TTL for {0}")]
    InvalidTtl(&'static str),

    #[error("OTP secret must be at least 32 characters")]
    WeakOtpSecret,

    #[error("Invalid stage pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Invalid payment gateway URL")]
    InvalidGatewayUrl,

    #[error("Payment gateway must use HTTPS in production")]
    GatewayMustBeHttps,

    #[error("The mock payment gateway cannot be used in production")]
    MockGatewayInProduction,
}
