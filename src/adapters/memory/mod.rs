//! In-memory storage adapters.
//!
//! Each store keeps its data behind a `tokio::sync::RwLock` and performs
//! every conditional write (unique insert, version check, status
//! compare-and-set) under a single write guard, so the atomicity the ports
//! promise holds within one process. Suitable for tests, development and
//! single-node deployments.

mod applicant_repository;
mod confirmation_repository;
mod otp_store;
mod payment_order_repository;
mod session_token_store;

pub use applicant_repository::InMemoryApplicantRepository;
pub use confirmation_repository::InMemoryConfirmationRepository;
pub use otp_store::InMemoryOtpStore;
pub use payment_order_repository::InMemoryPaymentOrderRepository;
pub use session_token_store::InMemorySessionTokenStore;
