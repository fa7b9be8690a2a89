//! Mock payment gateway.
//!
//! Hands out deterministic checkout URLs and answers status queries from a
//! table the test (or a developer) fills in. Supports:
//! - Per-order status configuration
//! - Error injection
//! - Artificial latency, for exercising timeouts
//! - Call tracking

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::foundation::OrderId;
use crate::domain::payment::{GatewayReport, PaymentStatus};
use crate::ports::{Checkout, CheckoutRequest, GatewayError, PaymentGateway};

const MOCK_CHECKOUT_BASE: &str = "https://checkout.mock.local/pay";

/// Recorded gateway call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateCheckout(OrderId),
    QueryStatus(OrderId),
}

#[derive(Default)]
struct MockState {
    /// Orders the gateway has seen, with the status it will report.
    orders: HashMap<OrderId, GatewayReport>,
    /// Error returned by the next call, whichever it is.
    next_error: Option<GatewayError>,
    latency: Option<Duration>,
    calls: Vec<GatewayCall>,
}

/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.set_status(order_id, PaymentStatus::Success).await;
/// gateway.fail_next(GatewayError::Unavailable("down".into())).await;
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps this long before answering each call.
    pub async fn set_latency(&self, latency: Duration) {
        self.inner.lock().await.latency = Some(latency);
    }

    /// Status the gateway reports for `order_id` from now on.
    pub async fn set_status(&self, order_id: OrderId, status: PaymentStatus) {
        let mut state = self.inner.lock().await;
        let report = state.orders.entry(order_id).or_insert_with(|| GatewayReport {
            order_id,
            status,
            tracking_id: None,
            failure_message: None,
        });
        report.status = status;
        if status == PaymentStatus::Success && report.tracking_id.is_none() {
            report.tracking_id = Some(format!("mock_txn_{}", order_id));
        }
        if status == PaymentStatus::Failed {
            report.failure_message = Some("Card declined".to_string());
        }
    }

    /// Error returned by the next call.
    pub async fn fail_next(&self, error: GatewayError) {
        self.inner.lock().await.next_error = Some(error);
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.inner.lock().await.calls.clone()
    }

    async fn enter(&self, call: GatewayCall) -> Result<(), GatewayError> {
        let latency = {
            let mut state = self.inner.lock().await;
            state.calls.push(call);
            if let Some(error) = state.next_error.take() {
                return Err(error);
            }
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<Checkout, GatewayError> {
        self.enter(GatewayCall::CreateCheckout(request.order_id)).await?;

        let mut state = self.inner.lock().await;
        state.orders.entry(request.order_id).or_insert_with(|| GatewayReport {
            order_id: request.order_id,
            status: PaymentStatus::Created,
            tracking_id: None,
            failure_message: None,
        });

        Ok(Checkout {
            redirect_url: format!("{}/{}", MOCK_CHECKOUT_BASE, request.order_id),
            gateway_reference: Some(format!("mock_cs_{}", request.order_id)),
        })
    }

    async fn query_status(&self, order_id: &OrderId) -> Result<GatewayReport, GatewayError> {
        self.enter(GatewayCall::QueryStatus(*order_id)).await?;

        self.inner
            .lock()
            .await
            .orders
            .get(order_id)
            .cloned()
            .ok_or(GatewayError::UnknownOrder(*order_id))
    }
}
