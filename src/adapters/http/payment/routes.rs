//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{create_order, get_order, payment_webhook, poll_order, retry_order};

/// Applicant order routes, mounted at `/api/payments`. Every route needs a
/// bearer token and sees only the caller's own orders.
///
/// # Routes
/// - `POST /orders` - Open an order for the caller's outstanding fee
/// - `GET /orders/:id` - Order status
/// - `POST /orders/:id/retry` - Replace a failed or cancelled order
/// - `POST /orders/:id/poll` - Reconcile against the gateway
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/retry", post(retry_order))
        .route("/orders/:id/poll", post(poll_order))
}

/// Gateway notifications, mounted at `/api/webhooks`.
///
/// # Routes
/// - `POST /payment` - Status callback
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payment", post(payment_webhook))
}
