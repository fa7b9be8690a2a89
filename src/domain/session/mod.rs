//! Session domain module.
//!
//! Passwordless login: OTP challenges and the bearer tokens minted after a
//! successful verification.
//!
//! # Module Structure
//!
//! - `otp` - OtpCode, OtpHasher and the OtpChallenge record
//! - `token` - BearerToken secret and the stored SessionToken
//! - `errors` - SessionError

mod errors;
mod otp;
mod token;

pub use errors::SessionError;
pub use otp::{AttemptRefusal, OtpChallenge, OtpCode, OtpHasher, MAX_OTP_LENGTH, MIN_OTP_LENGTH};
pub use token::{BearerToken, SessionToken};
