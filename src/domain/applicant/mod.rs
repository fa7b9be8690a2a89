//! Applicant domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Applicant aggregate and public profile
//! - `identifier` - Email, phone and login identifier normalization
//! - `status` - ApplicantStatus state machine

mod aggregate;
mod identifier;
mod status;

pub use aggregate::{Applicant, ApplicantProfile};
pub use identifier::{EmailAddress, LoginIdentifier, PhoneNumber};
pub use status::ApplicantStatus;
