//! HTTP handlers for payment endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::parse_id;
use crate::adapters::http::state::AppState;
use crate::application::{
    CreateOrderCommand, GetOrderQuery, PollOrderCommand, ReconcileCallbackCommand,
    RetryOrderCommand,
};
use crate::domain::payment::PaymentType;

use super::dto::{CreateOrderRequest, OrderResponse, PaymentWebhookRequest, ReconcileResponse};

/// POST /api/payments/orders - Open an order for the caller's outstanding fee
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateOrderCommand {
        applicant_id: auth.applicant.id,
        payment_type: PaymentType::new(&request.payment_type)?,
        amount: request.amount()?,
    };
    let order = state.create_order_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// GET /api/payments/orders/:id - Order as last recorded
///
/// Another applicant's order answers 404, the same as a missing one.
pub async fn get_order(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetOrderQuery {
        order_id: parse_id(&id, "order_id")?,
        applicant_id: auth.applicant.id,
    };
    let order = state.get_order_handler().handle(query).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// POST /api/payments/orders/:id/retry - Replace a failed or cancelled order
pub async fn retry_order(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RetryOrderCommand {
        order_id: parse_id(&id, "order_id")?,
        applicant_id: auth.applicant.id,
    };
    let order = state.retry_order_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// POST /api/payments/orders/:id/poll - Ask the gateway for the order's status
pub async fn poll_order(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = PollOrderCommand {
        order_id: parse_id(&id, "order_id")?,
        applicant_id: auth.applicant.id,
    };
    let result = state.poll_order_handler().handle(cmd).await?;
    Ok(Json(ReconcileResponse::from(result)))
}

/// POST /api/webhooks/payment - Gateway status notification
///
/// Re-delivered notifications are answered with 200 and `changed: false`.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(request): Json<PaymentWebhookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ReconcileCallbackCommand {
        order_id: parse_id(&request.order_id, "order_id")?,
        status: request.status()?,
        tracking_id: request.tracking_id,
        failure_message: request.failure_message,
    };
    let result = state.reconcile_handler().handle(cmd).await?;
    Ok(Json(ReconcileResponse::from(result)))
}
