//! In-memory payment order repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ApplicantId, DomainError, ErrorCode, OrderId};
use crate::domain::payment::{PaymentOrder, PaymentStatus, PaymentType};
use crate::ports::{OrderInsert, PaymentOrderRepository, StatusCas};

#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<OrderId, PaymentOrder>,
    /// Insertion order, for stable listing.
    sequence: Vec<OrderId>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentOrderRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPaymentOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentOrderRepository for InMemoryPaymentOrderRepository {
    async fn insert_if_no_active(&self, order: &PaymentOrder) -> Result<OrderInsert, DomainError> {
        let mut tables = self.tables.write().await;

        if let Some(active) = tables.orders.values().find(|o| {
            o.applicant_id == order.applicant_id
                && o.payment_type == order.payment_type
                && o.is_active()
        }) {
            return Ok(OrderInsert::ActiveExists(active.clone()));
        }
        if tables.orders.contains_key(&order.id) {
            return Err(DomainError::storage(format!("Order {} already stored", order.id)));
        }

        tables.orders.insert(order.id, order.clone());
        tables.sequence.push(order.id);
        Ok(OrderInsert::Inserted)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<PaymentOrder>, DomainError> {
        Ok(self.tables.read().await.orders.get(id).cloned())
    }

    async fn find_active(
        &self,
        applicant_id: &ApplicantId,
        payment_type: &PaymentType,
    ) -> Result<Option<PaymentOrder>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .find(|o| o.applicant_id == *applicant_id && o.payment_type == *payment_type && o.is_active())
            .cloned())
    }

    async fn list_for_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<PaymentOrder>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sequence
            .iter()
            .filter_map(|id| tables.orders.get(id))
            .filter(|o| o.applicant_id == *applicant_id)
            .cloned()
            .collect())
    }

    async fn compare_and_set(
        &self,
        expected: PaymentStatus,
        updated: &PaymentOrder,
    ) -> Result<StatusCas, DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables.orders.get_mut(&updated.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", updated.id),
            )
        })?;

        if stored.status != expected {
            return Ok(StatusCas::Stale(stored.clone()));
        }
        *stored = updated.clone();
        Ok(StatusCas::Applied)
    }
}
