//! HTTP adapters - REST API implementations.
//!
//! Each component has its own HTTP adapter; `app_router` mounts them all
//! under `/api` and wraps them in tracing and timeout layers.

pub mod confirmation;
pub mod error;
pub mod middleware;
pub mod payment;
pub mod session;
pub mod stage;
pub mod state;

use std::str::FromStr;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use middleware::{auth_middleware, ip_rate_limit};

/// Builds the complete application router.
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    let auth = session::auth_routes()
        .route_layer(from_fn_with_state(state.clone(), ip_rate_limit));

    let me = session::me_routes()
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let payments = payment::order_routes()
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/auth", auth)
        .merge(me)
        .nest("/applicants", stage::applicant_routes())
        .nest("/selections", stage::selection_routes())
        .nest("/payments", payments)
        .nest("/webhooks", payment::webhook_routes())
        .nest("/confirmations", confirmation::confirmation_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness probe
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Parses an id taken from a path or body field.
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation(field, format!("'{}' is not a valid id", raw)))
}
