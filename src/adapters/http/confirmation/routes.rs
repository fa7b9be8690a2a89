//! Axum router configuration for confirmation endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{confirm, issue_code};

/// Confirmation routes, mounted at `/api/confirmations`.
///
/// # Routes
/// - `POST /` - Issue or re-send a code for a registration
/// - `POST /confirm` - Redeem a code
pub fn confirmation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(issue_code))
        .route("/confirm", post(confirm))
}
