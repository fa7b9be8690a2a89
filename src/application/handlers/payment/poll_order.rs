//! PollOrderHandler - asks the gateway for an order's status.
//!
//! For when a callback never arrived. The answer goes through the same
//! reconciliation as a callback would.

use std::sync::Arc;

use crate::domain::foundation::{ApplicantId, OrderId};
use crate::domain::payment::LedgerError;
use crate::ports::{GatewayError, PaymentGateway, PaymentOrderRepository};

use super::{
    call_gateway, find_owned_order, unavailable, PaymentPolicy, ReconcileCallbackHandler,
    ReconcileCallbackResult,
};

#[derive(Debug, Clone)]
pub struct PollOrderCommand {
    pub order_id: OrderId,
    pub applicant_id: ApplicantId,
}

pub struct PollOrderHandler {
    orders: Arc<dyn PaymentOrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    reconcile: Arc<ReconcileCallbackHandler>,
    policy: PaymentPolicy,
}

impl PollOrderHandler {
    pub fn new(
        orders: Arc<dyn PaymentOrderRepository>,
        gateway: Arc<dyn PaymentGateway>,
        reconcile: Arc<ReconcileCallbackHandler>,
        policy: PaymentPolicy,
    ) -> Self {
        Self {
            orders,
            gateway,
            reconcile,
            policy,
        }
    }

    pub async fn handle(&self, cmd: PollOrderCommand) -> Result<ReconcileCallbackResult, LedgerError> {
        let order =
            find_owned_order(self.orders.as_ref(), cmd.order_id, cmd.applicant_id).await?;

        let report = match call_gateway(
            self.policy.gateway_timeout,
            self.gateway.query_status(&order.id),
        )
        .await
        {
            Ok(report) => report,
            Err(GatewayError::UnknownOrder(_)) => {
                // Checkout never reached the gateway; nothing to learn
                return Ok(ReconcileCallbackResult {
                    order,
                    changed: false,
                    settled: false,
                });
            }
            Err(err) => {
                tracing::warn!(order_id = %order.id, error = %err, "Gateway status query failed");
                return Err(unavailable(err));
            }
        };

        self.reconcile.handle(report.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Ledger;
    use super::*;
    use crate::domain::applicant::ApplicantStatus;
    use crate::domain::payment::PaymentStatus;
    use crate::ports::ApplicantRepository;

    fn poll_handler(ledger: &Ledger) -> PollOrderHandler {
        PollOrderHandler::new(
            ledger.orders.clone(),
            Arc::new(ledger.gateway.clone()),
            Arc::new(ledger.reconcile_handler()),
            PaymentPolicy::default(),
        )
    }

    #[tokio::test]
    async fn poll_reconciles_gateway_status() {
        let ledger = Ledger::new();
        let applicant = ledger.applicant_owing_fee().await;
        let order = ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap();
        ledger.gateway.set_status(order.id, PaymentStatus::Success).await;

        let result = poll_handler(&ledger)
            .handle(PollOrderCommand {
                order_id: order.id,
                applicant_id: applicant.id,
            })
            .await
            .unwrap();

        assert_eq!(result.order.status, PaymentStatus::Success);
        assert!(result.settled);
        assert!(result.order.gateway_tracking_id.is_some());
        let stored = ledger.applicants.find_by_id(&applicant.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicantStatus::AwaitingConfirmation);
    }

    #[tokio::test]
    async fn poll_with_no_news_changes_nothing() {
        let ledger = Ledger::new();
        let applicant = ledger.applicant_owing_fee().await;
        let order = ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap();

        let result = poll_handler(&ledger)
            .handle(PollOrderCommand {
                order_id: order.id,
                applicant_id: applicant.id,
            })
            .await
            .unwrap();
        assert!(!result.changed);
        assert_eq!(result.order.status, PaymentStatus::Created);
    }

    #[tokio::test]
    async fn gateway_outage_is_reported() {
        let ledger = Ledger::new();
        let applicant = ledger.applicant_owing_fee().await;
        let order = ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap();
        ledger
            .gateway
            .fail_next(GatewayError::Unavailable("503".into()))
            .await;

        let err = poll_handler(&ledger)
            .handle(PollOrderCommand {
                order_id: order.id,
                applicant_id: applicant.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::GatewayUnavailable(_)));
    }

    #[tokio::test]
    async fn another_applicants_order_is_not_polled() {
        let ledger = Ledger::new();
        let applicant = ledger.applicant_owing_fee().await;
        let order = ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap();
        ledger.gateway.set_status(order.id, PaymentStatus::Success).await;

        let err = poll_handler(&ledger)
            .handle(PollOrderCommand {
                order_id: order.id,
                applicant_id: ApplicantId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::unknown_order(order.id));
        let stored = ledger.orders.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Created);
    }
}
