//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamp, errors, state machine)
//! - `applicant` - Applicant aggregate, identity and status
//! - `session` - OTP challenges and session tokens
//! - `stage` - Stage pipeline, selection decisions and bulk import
//! - `payment` - Payment orders and their lifecycle
//! - `confirmation` - Participation confirmation codes

pub mod applicant;
pub mod confirmation;
pub mod foundation;
pub mod payment;
pub mod session;
pub mod stage;
