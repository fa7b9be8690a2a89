//! Axum router configuration for login and session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{logout, me, request_otp, verify_otp};

/// Public login routes, mounted at `/api/auth`.
///
/// # Routes
/// - `POST /otp` - Send a login code (202)
/// - `POST /otp/verify` - Exchange the code for a bearer token
/// - `POST /logout` - Revoke the bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/otp", post(request_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/logout", post(logout))
}

/// Routes that need a bearer token, mounted at `/api`.
///
/// # Routes
/// - `GET /me` - Current applicant and stage
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
