//! ReconcileCallbackHandler - Command handler for gateway status reports.
//!
//! Callbacks arrive at least once and in any order. Status only moves
//! forward, each move is a compare-and-set on the stored status, and a
//! report of the status the order already has is a successful no-op.
//!
//! A successful order settles the applicant's fee. Settlement is
//! idempotent, so it runs on every `success` report: a re-delivery
//! completes a settlement whose first attempt failed.

use std::sync::Arc;

use crate::application::handlers::stage::{SettlePaymentCommand, SettlePaymentHandler};
use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::payment::{GatewayReport, LedgerError, PaymentOrder, PaymentStatus, ReportOutcome};
use crate::ports::{PaymentOrderRepository, StatusCas};

const MAX_CAS_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct ReconcileCallbackCommand {
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub tracking_id: Option<String>,
    pub failure_message: Option<String>,
}

impl From<GatewayReport> for ReconcileCallbackCommand {
    fn from(report: GatewayReport) -> Self {
        Self {
            order_id: report.order_id,
            status: report.status,
            tracking_id: report.tracking_id,
            failure_message: report.failure_message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileCallbackResult {
    pub order: PaymentOrder,
    /// False when the report repeated the stored status.
    pub changed: bool,
    /// True when this report cleared the applicant's fee.
    pub settled: bool,
}

pub struct ReconcileCallbackHandler {
    orders: Arc<dyn PaymentOrderRepository>,
    settle: Arc<SettlePaymentHandler>,
}

impl ReconcileCallbackHandler {
    pub fn new(orders: Arc<dyn PaymentOrderRepository>, settle: Arc<SettlePaymentHandler>) -> Self {
        Self { orders, settle }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileCallbackCommand,
    ) -> Result<ReconcileCallbackResult, LedgerError> {
        let report = GatewayReport {
            order_id: cmd.order_id,
            status: cmd.status,
            tracking_id: cmd.tracking_id,
            failure_message: cmd.failure_message,
        };

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let order = self
                .orders
                .find_by_id(&report.order_id)
                .await?
                .ok_or_else(|| LedgerError::unknown_order(report.order_id))?;

            let (order, changed) = match order.apply_report(&report, Timestamp::now()) {
                Ok(ReportOutcome::Unchanged) => (order, false),
                Ok(ReportOutcome::Advanced(updated)) => {
                    match self.orders.compare_and_set(order.status, &updated).await? {
                        StatusCas::Applied => (updated, true),
                        StatusCas::Stale(current) => {
                            tracing::debug!(
                                order_id = %report.order_id,
                                attempt,
                                stored = %current.status,
                                "Order status moved underneath a callback, re-reading"
                            );
                            continue;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        order_id = %report.order_id,
                        from = %order.status,
                        to = %report.status,
                        "Discarding out-of-order payment report"
                    );
                    return Err(err);
                }
            };

            if changed {
                tracing::info!(
                    order_id = %order.id,
                    status = %order.status,
                    tracking_id = order.gateway_tracking_id.as_deref().unwrap_or(""),
                    "Payment order reconciled"
                );
            }

            let settled = if order.status == PaymentStatus::Success {
                self.settle(&order).await?
            } else {
                false
            };

            return Ok(ReconcileCallbackResult {
                order,
                changed,
                settled,
            });
        }

        Err(LedgerError::infrastructure(
            "order is being updated concurrently, try again",
        ))
    }

    async fn settle(&self, order: &PaymentOrder) -> Result<bool, LedgerError> {
        let result = self
            .settle
            .handle(SettlePaymentCommand {
                applicant_id: order.applicant_id,
                payment_type: order.payment_type.clone(),
            })
            .await
            .map_err(|e| {
                tracing::error!(order_id = %order.id, error = %e, "Fee settlement failed");
                LedgerError::infrastructure(format!("settlement failed: {}", e))
            })?;
        Ok(result.settled)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Ledger;
    use super::*;
    use crate::domain::applicant::ApplicantStatus;
    use crate::ports::ApplicantRepository;

    fn report(order_id: OrderId, status: PaymentStatus) -> ReconcileCallbackCommand {
        ReconcileCallbackCommand {
            order_id,
            status,
            tracking_id: Some("trk_42".to_string()),
            failure_message: None,
        }
    }

    async fn open_order(ledger: &Ledger) -> PaymentOrder {
        let applicant = ledger.applicant_owing_fee().await;
        ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn success_settles_the_fee_once() {
        let ledger = Ledger::new();
        let order = open_order(&ledger).await;
        let handler = ledger.reconcile_handler();

        let first = handler.handle(report(order.id, PaymentStatus::Success)).await.unwrap();
        assert!(first.changed);
        assert!(first.settled);
        assert_eq!(first.order.gateway_tracking_id.as_deref(), Some("trk_42"));

        let applicant = ledger.applicants.find_by_id(&order.applicant_id).await.unwrap().unwrap();
        assert_eq!(applicant.status, ApplicantStatus::AwaitingConfirmation);

        let second = handler.handle(report(order.id, PaymentStatus::Success)).await.unwrap();
        assert!(!second.changed);
        assert!(!second.settled);
        assert_eq!(second.order, first.order);
        let after = ledger.applicants.find_by_id(&order.applicant_id).await.unwrap().unwrap();
        assert_eq!(after, applicant);
    }

    #[tokio::test]
    async fn failed_after_success_is_rejected() {
        let ledger = Ledger::new();
        let order = open_order(&ledger).await;
        let handler = ledger.reconcile_handler();

        handler.handle(report(order.id, PaymentStatus::Success)).await.unwrap();
        let err = handler.handle(report(order.id, PaymentStatus::Failed)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));

        let stored = ledger.orders.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Success);
    }

    #[tokio::test]
    async fn pending_then_failed_keeps_applicant_owing() {
        let ledger = Ledger::new();
        let order = open_order(&ledger).await;
        let handler = ledger.reconcile_handler();

        handler.handle(report(order.id, PaymentStatus::Pending)).await.unwrap();
        let failed = handler
            .handle(ReconcileCallbackCommand {
                failure_message: Some("Insufficient funds".into()),
                ..report(order.id, PaymentStatus::Failed)
            })
            .await
            .unwrap();

        assert_eq!(failed.order.failure_message.as_deref(), Some("Insufficient funds"));
        assert!(!failed.settled);
        let applicant = ledger.applicants.find_by_id(&order.applicant_id).await.unwrap().unwrap();
        assert_eq!(applicant.status, ApplicantStatus::AwaitingPayment);
    }

    #[tokio::test]
    async fn unknown_order_is_reported() {
        let ledger = Ledger::new();
        let err = ledger
            .reconcile_handler()
            .handle(report(OrderId::new(), PaymentStatus::Success))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOrder(_)));
    }

    #[tokio::test]
    async fn concurrent_success_callbacks_settle_exactly_once() {
        let ledger = Ledger::new();
        let order = open_order(&ledger).await;
        let handler = Arc::new(ledger.reconcile_handler());

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(report(order.id, PaymentStatus::Success)).await })
            })
            .collect();

        let mut settled = 0;
        let mut changed = 0;
        for task in tasks {
            let result = task.await.unwrap().unwrap();
            settled += result.settled as usize;
            changed += result.changed as usize;
        }
        assert_eq!(changed, 1);
        assert_eq!(settled, 1);
    }
}
