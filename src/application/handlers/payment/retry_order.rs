//! RetryOrderHandler - Command handler for replacing a dead order.

use std::sync::Arc;

use crate::domain::foundation::{ApplicantId, OrderId, Timestamp};
use crate::domain::payment::{LedgerError, PaymentOrder};
use crate::domain::stage::StagePipeline;
use crate::ports::{
    ApplicantRepository, CheckoutRequest, OrderInsert, PaymentGateway, PaymentOrderRepository,
};

use super::{call_gateway, fee_owed, find_owned_order, unavailable, PaymentPolicy};

#[derive(Debug, Clone)]
pub struct RetryOrderCommand {
    pub order_id: OrderId,
    pub applicant_id: ApplicantId,
}

/// Creates a fresh order for a failed or cancelled one. The original order
/// is left as it is.
pub struct RetryOrderHandler {
    orders: Arc<dyn PaymentOrderRepository>,
    applicants: Arc<dyn ApplicantRepository>,
    gateway: Arc<dyn PaymentGateway>,
    pipeline: Arc<StagePipeline>,
    policy: PaymentPolicy,
}

impl RetryOrderHandler {
    pub fn new(
        orders: Arc<dyn PaymentOrderRepository>,
        applicants: Arc<dyn ApplicantRepository>,
        gateway: Arc<dyn PaymentGateway>,
        pipeline: Arc<StagePipeline>,
        policy: PaymentPolicy,
    ) -> Self {
        Self {
            orders,
            applicants,
            gateway,
            pipeline,
            policy,
        }
    }

    pub async fn handle(&self, cmd: RetryOrderCommand) -> Result<PaymentOrder, LedgerError> {
        let original =
            find_owned_order(self.orders.as_ref(), cmd.order_id, cmd.applicant_id).await?;

        let mut replacement = original.retry(OrderId::new(), None, Timestamp::now())?;

        let applicant = self
            .applicants
            .find_by_id(&original.applicant_id)
            .await?
            .ok_or_else(|| LedgerError::unknown_applicant(original.applicant_id))?;
        fee_owed(&applicant, &self.pipeline, &original.payment_type)?;

        let checkout = call_gateway(
            self.policy.gateway_timeout,
            self.gateway.create_checkout(CheckoutRequest {
                order_id: replacement.id,
                applicant_id: replacement.applicant_id,
                payment_type: replacement.payment_type.clone(),
                amount: replacement.amount.clone(),
                return_url: self.policy.return_url.clone(),
            }),
        )
        .await
        .map_err(unavailable)?;
        replacement.checkout_url = Some(checkout.redirect_url);

        match self.orders.insert_if_no_active(&replacement).await? {
            OrderInsert::Inserted => {}
            OrderInsert::ActiveExists(existing) => {
                return Err(LedgerError::duplicate_active_order(
                    replacement.applicant_id,
                    replacement.payment_type,
                    existing.id,
                ));
            }
        }

        tracing::info!(
            order_id = %replacement.id,
            retry_of = %original.id,
            "Payment order retried"
        );
        Ok(replacement)
    }
}
