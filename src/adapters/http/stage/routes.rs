//! Axum router configuration for applicant and selection endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    apply_bulk_decisions, bulk_template, current_stage, record_decision, register_applicant,
    selection_history, withdraw,
};

/// Applicant routes, mounted at `/api/applicants`.
///
/// # Routes
/// - `POST /` - Register an applicant
/// - `GET /:id/stage` - Current stage
/// - `GET /:id/selections` - Decision history
/// - `POST /:id/decisions` - Record a decision (`X-Actor-Id`)
/// - `POST /:id/withdraw` - Withdraw
pub fn applicant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_applicant))
        .route("/:id/stage", get(current_stage))
        .route("/:id/selections", get(selection_history))
        .route("/:id/decisions", post(record_decision))
        .route("/:id/withdraw", post(withdraw))
}

/// Bulk selection routes, mounted at `/api/selections`.
///
/// # Routes
/// - `POST /bulk` - Apply a batch of decisions (`X-Actor-Id`)
/// - `GET /bulk/template` - Expected columns
pub fn selection_routes() -> Router<AppState> {
    Router::new()
        .route("/bulk", post(apply_bulk_decisions))
        .route("/bulk/template", get(bulk_template))
}
