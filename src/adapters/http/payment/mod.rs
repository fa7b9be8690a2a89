//! HTTP adapter for payment orders and gateway callbacks.

mod dto;
mod handlers;
mod routes;

pub use dto::{OrderResponse, ReconcileResponse};
pub use routes::{order_routes, webhook_routes};
