//! Payment order repository port.
//!
//! # Design
//!
//! - **One active order**: insert refuses a second created/pending order for
//!   the same (applicant, payment type)
//! - **Compare-and-set**: status changes apply only if the stored status is
//!   the one the caller read
//! - **Never deleted**: superseded orders stay readable

use async_trait::async_trait;

use crate::domain::foundation::{ApplicantId, DomainError, OrderId};
use crate::domain::payment::{PaymentOrder, PaymentStatus, PaymentType};

/// Result of inserting an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderInsert {
    Inserted,
    /// An active order for the pair already exists.
    ActiveExists(PaymentOrder),
}

/// Result of a status compare-and-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCas {
    Applied,
    /// The stored status moved on; carries the current order.
    Stale(PaymentOrder),
}

#[async_trait]
pub trait PaymentOrderRepository: Send + Sync {
    async fn insert_if_no_active(&self, order: &PaymentOrder) -> Result<OrderInsert, DomainError>;

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<PaymentOrder>, DomainError>;

    async fn find_active(
        &self,
        applicant_id: &ApplicantId,
        payment_type: &PaymentType,
    ) -> Result<Option<PaymentOrder>, DomainError>;

    /// Every order for the applicant, oldest first.
    async fn list_for_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Vec<PaymentOrder>, DomainError>;

    /// Stores `updated` if the stored order is still in `expected`.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if the order does not exist.
    async fn compare_and_set(
        &self,
        expected: PaymentStatus,
        updated: &PaymentOrder,
    ) -> Result<StatusCas, DomainError>;
}
