//! GetOrderHandler - Query handler for a single order.

use std::sync::Arc;

use crate::domain::foundation::{ApplicantId, OrderId};
use crate::domain::payment::{LedgerError, PaymentOrder};
use crate::ports::PaymentOrderRepository;

use super::find_owned_order;

#[derive(Debug, Clone)]
pub struct GetOrderQuery {
    pub order_id: OrderId,
    /// The caller. Only their own orders are visible.
    pub applicant_id: ApplicantId,
}

pub struct GetOrderHandler {
    orders: Arc<dyn PaymentOrderRepository>,
}

impl GetOrderHandler {
    pub fn new(orders: Arc<dyn PaymentOrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, query: GetOrderQuery) -> Result<PaymentOrder, LedgerError> {
        find_owned_order(self.orders.as_ref(), query.order_id, query.applicant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Ledger;
    use super::*;

    #[tokio::test]
    async fn missing_order_is_unknown() {
        let ledger = Ledger::new();
        let handler = GetOrderHandler::new(ledger.orders.clone());
        let err = handler
            .handle(GetOrderQuery {
                order_id: OrderId::new(),
                applicant_id: ApplicantId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOrder(_)));
    }

    #[tokio::test]
    async fn order_is_visible_only_to_its_applicant() {
        let ledger = Ledger::new();
        let applicant = ledger.applicant_owing_fee().await;
        let order = ledger
            .create_handler()
            .handle(Ledger::create_cmd(&applicant))
            .await
            .unwrap();
        let handler = GetOrderHandler::new(ledger.orders.clone());

        let own = handler
            .handle(GetOrderQuery {
                order_id: order.id,
                applicant_id: applicant.id,
            })
            .await
            .unwrap();
        assert_eq!(own.id, order.id);

        let err = handler
            .handle(GetOrderQuery {
                order_id: order.id,
                applicant_id: ApplicantId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::unknown_order(order.id));
    }
}
