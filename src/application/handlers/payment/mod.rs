//! Payment handlers.
//!
//! The payment ledger: orders for stage fees and their reconciliation with
//! the gateway.
//!
//! ## Commands
//! - Creating an order for the fee an applicant owes
//! - Reconciling a gateway callback
//! - Retrying a failed or cancelled order
//! - Polling the gateway for an order's status
//!
//! ## Queries
//! - Getting an order

mod create_order;
mod get_order;
mod poll_order;
mod reconcile_callback;
mod retry_order;

#[cfg(test)]
mod test_support;

use std::future::Future;
use std::time::Duration;

use crate::config::PaymentConfig;
use crate::domain::applicant::{Applicant, ApplicantStatus};
use crate::domain::foundation::{ApplicantId, OrderId};
use crate::domain::payment::{LedgerError, PaymentOrder, PaymentType};
use crate::domain::stage::{StageFee, StagePipeline};
use crate::ports::{GatewayError, PaymentOrderRepository};

pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use get_order::{GetOrderHandler, GetOrderQuery};
pub use poll_order::{PollOrderCommand, PollOrderHandler};
pub use reconcile_callback::{
    ReconcileCallbackCommand, ReconcileCallbackHandler, ReconcileCallbackResult,
};
pub use retry_order::{RetryOrderCommand, RetryOrderHandler};

/// Parameters the payment handlers run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPolicy {
    pub gateway_timeout: Duration,
    pub return_url: Option<String>,
}

impl PaymentPolicy {
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            gateway_timeout: Duration::from_secs(config.gateway_timeout_secs),
            return_url: config.return_url.clone(),
        }
    }
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self::from_config(&PaymentConfig::default())
    }
}

/// Fee the applicant currently owes for `payment_type`.
fn fee_owed<'a>(
    applicant: &Applicant,
    pipeline: &'a StagePipeline,
    payment_type: &PaymentType,
) -> Result<&'a StageFee, LedgerError> {
    if applicant.status != ApplicantStatus::AwaitingPayment {
        return Err(LedgerError::not_eligible(
            applicant.id,
            format!("applicant is {} and owes no fee", applicant.status),
        ));
    }
    match pipeline.fee_for(applicant.current_stage) {
        Some(fee) if &fee.payment_type == payment_type => Ok(fee),
        Some(fee) => Err(LedgerError::not_eligible(
            applicant.id,
            format!("the current stage charges {}, not {}", fee.payment_type, payment_type),
        )),
        None => Err(LedgerError::not_eligible(
            applicant.id,
            "the current stage has no fee",
        )),
    }
}

/// The order, if it belongs to `applicant_id`. Someone else's order is
/// reported exactly like a missing one.
async fn find_owned_order(
    orders: &dyn PaymentOrderRepository,
    order_id: OrderId,
    applicant_id: ApplicantId,
) -> Result<PaymentOrder, LedgerError> {
    orders
        .find_by_id(&order_id)
        .await?
        .filter(|order| order.applicant_id == applicant_id)
        .ok_or_else(|| LedgerError::unknown_order(order_id))
}

/// Runs a gateway call under the configured timeout.
async fn call_gateway<T, F>(timeout: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(timeout.as_secs())),
    }
}

fn unavailable(err: GatewayError) -> LedgerError {
    LedgerError::gateway_unavailable(err.to_string())
}
