//! HTTP adapter for OTP login and session tokens.

mod dto;
mod handlers;
mod routes;

pub use dto::{LogoutResponse, MeResponse, OtpRequestedResponse, TokenResponse};
pub use routes::{auth_routes, me_routes};
