//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `ApplicantRepository` - Applicants and selection history, versioned writes
//! - `OtpStore` - One outstanding OTP challenge per identifier
//! - `SessionTokenStore` - Issued session tokens by digest
//! - `PaymentOrderRepository` - Payment orders with status compare-and-set
//! - `ConfirmationRepository` - Confirmation codes, one per registration
//!
//! ## External Service Ports
//!
//! - `Notifier` - Best-effort delivery of codes to applicants
//! - `PaymentGateway` - Checkout creation and status polling
//! - `RateLimiter` - Rolling-window request quotas

mod applicant_repository;
mod confirmation_repository;
mod notifier;
mod otp_store;
mod payment_gateway;
mod payment_order_repository;
mod rate_limiter;
mod session_token_store;

pub use applicant_repository::{ApplicantRepository, CommitOutcome, InsertOutcome};
pub use confirmation_repository::{ConfirmationRepository, IssueOutcome};
pub use notifier::{Notification, NotificationKind, Notifier, NotifierError};
pub use otp_store::{AttemptGrant, OtpStore};
pub use payment_gateway::{Checkout, CheckoutRequest, GatewayError, PaymentGateway};
pub use payment_order_repository::{OrderInsert, PaymentOrderRepository, StatusCas};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use session_token_store::SessionTokenStore;
