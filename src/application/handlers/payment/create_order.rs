//! CreateOrderHandler - Command handler for opening a payment order.

use std::sync::Arc;

use crate::domain::foundation::{ApplicantId, OrderId, Timestamp};
use crate::domain::payment::{LedgerError, Money, PaymentOrder, PaymentType};
use crate::domain::stage::StagePipeline;
use crate::ports::{
    ApplicantRepository, CheckoutRequest, OrderInsert, PaymentGateway, PaymentOrderRepository,
};

use super::{call_gateway, fee_owed, unavailable, PaymentPolicy};

/// Command to create an order for the fee the applicant owes.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub applicant_id: ApplicantId,
    pub payment_type: PaymentType,
    /// Optional; when given it must equal the stage fee.
    pub amount: Option<Money>,
}

/// Handler for order creation.
///
/// The gateway is asked for a checkout before anything is stored, so a
/// gateway failure leaves no order behind.
pub struct CreateOrderHandler {
    orders: Arc<dyn PaymentOrderRepository>,
    applicants: Arc<dyn ApplicantRepository>,
    gateway: Arc<dyn PaymentGateway>,
    pipeline: Arc<StagePipeline>,
    policy: PaymentPolicy,
}

impl CreateOrderHandler {
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

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<PaymentOrder, LedgerError> {
        let applicant = self
            .applicants
            .find_by_id(&cmd.applicant_id)
            .await?
            .ok_or_else(|| LedgerError::unknown_applicant(cmd.applicant_id))?;

        let fee = fee_owed(&applicant, &self.pipeline, &cmd.payment_type)?;
        if let Some(amount) = &cmd.amount {
            if amount != &fee.amount {
                return Err(LedgerError::validation(
                    "amount",
                    format!("the {} fee is {}", fee.payment_type, fee.amount),
                ));
            }
        }

        if let Some(existing) = self
            .orders
            .find_active(&applicant.id, &cmd.payment_type)
            .await?
        {
            return Err(LedgerError::duplicate_active_order(
                applicant.id,
                cmd.payment_type,
                existing.id,
            ));
        }

        let order_id = OrderId::new();
        let checkout = call_gateway(
            self.policy.gateway_timeout,
            self.gateway.create_checkout(CheckoutRequest {
                order_id,
                applicant_id: applicant.id,
                payment_type: cmd.payment_type.clone(),
                amount: fee.amount.clone(),
                return_url: self.policy.return_url.clone(),
            }),
        )
        .await
        .map_err(|e| {
            tracing::warn!(order_id = %order_id, error = %e, "Checkout creation failed");
            unavailable(e)
        })?;

        let order = PaymentOrder::create(
            order_id,
            applicant.id,
            cmd.payment_type,
            fee.amount.clone(),
            Some(checkout.redirect_url),
            None,
            Timestamp::now(),
        );

        match self.orders.insert_if_no_active(&order).await? {
            OrderInsert::Inserted => {}
            OrderInsert::ActiveExists(existing) => {
                tracing::warn!(
                    order_id = %order.id,
                    existing = %existing.id,
                    "Concurrent order creation, discarding checkout"
                );
                return Err(LedgerError::duplicate_active_order(
                    order.applicant_id,
                    order.payment_type,
                    existing.id,
                ));
            }
        }

        tracing::info!(
            order_id = %order.id,
            applicant_id = %order.applicant_id,
            payment_type = %order.payment_type,
            amount = %order.amount,
            "Payment order created"
        );

        Ok(order)
    }
}
