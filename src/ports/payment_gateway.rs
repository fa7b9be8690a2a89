//! Payment gateway port.
//!
//! Outbound: open a checkout for an order and get a redirect target back.
//! Inbound status arrives either as a callback (handled by the ledger) or
//! through `query_status` polling.
//!
//! Signature checking of gateway callbacks happens before the ledger sees
//! them and is not part of this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ApplicantId, OrderId};
use crate::domain::payment::{GatewayReport, Money, PaymentType};

/// Request to open a checkout for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order_id: OrderId,
    pub applicant_id: ApplicantId,
    pub payment_type: PaymentType,
    pub amount: Money,
    /// Where the gateway sends the applicant afterwards.
    pub return_url: Option<String>,
}

/// Checkout opened at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub redirect_url: String,
    pub gateway_reference: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<Checkout, GatewayError>;

    async fn query_status(&self, order_id: &OrderId) -> Result<GatewayReport, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("gateway timed out after {0}s")]
    Timeout(u64),

    #[error("gateway rejected the request: {0}")]
    Rejected(String),

    #[error("gateway does not know order {0}")]
    UnknownOrder(OrderId),
}
