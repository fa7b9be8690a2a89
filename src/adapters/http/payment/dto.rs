//! Data Transfer Objects for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::ReconcileCallbackResult;
use crate::domain::foundation::{ApplicantId, OrderId, Timestamp};
use crate::domain::payment::{LedgerError, Money, PaymentOrder, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Amount the client expects to pay, checked against the fee catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountBody {
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub payment_type: String,
    #[serde(default)]
    pub amount: Option<AmountBody>,
}

impl CreateOrderRequest {
    pub fn amount(&self) -> Result<Option<Money>, LedgerError> {
        self.amount
            .as_ref()
            .map(|a| Money::new(a.amount_minor, &a.currency))
            .transpose()
            .map_err(LedgerError::from)
    }
}

/// Status notification posted by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWebhookRequest {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
}

impl PaymentWebhookRequest {
    pub fn status(&self) -> Result<PaymentStatus, LedgerError> {
        self.status
            .parse()
            .map_err(|reason: String| LedgerError::validation("status", reason))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub applicant_id: ApplicantId,
    pub payment_type: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_of: Option<OrderId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PaymentOrder> for OrderResponse {
    fn from(order: PaymentOrder) -> Self {
        Self {
            id: order.id,
            applicant_id: order.applicant_id,
            payment_type: order.payment_type.as_str().to_string(),
            amount_minor: order.amount.amount_minor,
            currency: order.amount.currency,
            status: order.status,
            checkout_url: order.checkout_url,
            tracking_id: order.gateway_tracking_id,
            failure_message: order.failure_message,
            retry_of: order.retry_of,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Outcome of a callback or poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub order: OrderResponse,
    pub changed: bool,
    pub settled: bool,
}

impl From<ReconcileCallbackResult> for ReconcileResponse {
    fn from(result: ReconcileCallbackResult) -> Self {
        Self {
            order: OrderResponse::from(result.order),
            changed: result.changed,
            settled: result.settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(status: &str) -> PaymentWebhookRequest {
        PaymentWebhookRequest {
            order_id: OrderId::new().to_string(),
            status: status.to_string(),
            tracking_id: None,
            failure_message: None,
        }
    }

    #[test]
    fn webhook_status_accepts_gateway_synonyms() {
        assert_eq!(webhook("captured").status().unwrap(), PaymentStatus::Success);
        assert_eq!(webhook("canceled").status().unwrap(), PaymentStatus::Cancelled);
    }

    #[test]
    fn webhook_status_rejects_unknown() {
        assert!(matches!(
            webhook("refunded").status(),
            Err(LedgerError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn create_order_amount_is_validated() {
        let request = CreateOrderRequest {
            payment_type: "final_round_fee".to_string(),
            amount: Some(AmountBody {
                amount_minor: 0,
                currency: "USD".to_string(),
            }),
        };
        assert!(request.amount().is_err());
    }
}
