//! Payment order aggregate.
//!
//! # Invariants
//!
//! - Status only moves forward (see `PaymentStatus`)
//! - At most one active order per (applicant, payment type), enforced by
//!   the repository on insert
//! - Orders are never deleted; a retry creates a new order pointing back
//!   through `retry_of`

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ApplicantId, OrderId, StateMachine, Timestamp};

use super::{LedgerError, Money, PaymentStatus, PaymentType};

/// A single attempt to collect one fee from one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: OrderId,
    pub applicant_id: ApplicantId,
    pub payment_type: PaymentType,
    pub amount: Money,
    pub status: PaymentStatus,

    /// Gateway-side reference, known once the gateway reports on the order.
    pub gateway_tracking_id: Option<String>,

    /// Reason given by the gateway for a failed payment.
    pub failure_message: Option<String>,

    /// Where the applicant is sent to pay.
    pub checkout_url: Option<String>,

    /// The failed or cancelled order this one replaces.
    pub retry_of: Option<OrderId>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Status report about an order, from a callback or a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReport {
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub tracking_id: Option<String>,
    pub failure_message: Option<String>,
}

/// What applying a report to an order amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Report restates the current status; nothing to store.
    Unchanged,

    /// Order moves forward to the carried state.
    Advanced(PaymentOrder),
}

impl PaymentOrder {
    /// Creates a new order in `Created`.
    pub fn create(
        id: OrderId,
        applicant_id: ApplicantId,
        payment_type: PaymentType,
        amount: Money,
        checkout_url: Option<String>,
        retry_of: Option<OrderId>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            applicant_id,
            payment_type,
            amount,
            status: PaymentStatus::Created,
            gateway_tracking_id: None,
            failure_message: None,
            checkout_url,
            retry_of,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Works out the effect of a gateway report without mutating `self`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` for backward or sideways reports.
    pub fn apply_report(
        &self,
        report: &GatewayReport,
        now: Timestamp,
    ) -> Result<ReportOutcome, LedgerError> {
        if report.status == self.status {
            return Ok(ReportOutcome::Unchanged);
        }

        let next = self
            .status
            .transition_to(report.status)
            .map_err(|_| LedgerError::invalid_transition(self.id, self.status, report.status))?;

        let mut updated = self.clone();
        updated.status = next;
        if let Some(tracking_id) = report.tracking_id.as_ref().filter(|t| !t.trim().is_empty()) {
            updated.gateway_tracking_id = Some(tracking_id.trim().to_string());
        }
        if next == PaymentStatus::Failed {
            updated.failure_message = report
                .failure_message
                .clone()
                .or_else(|| Some("payment failed".to_string()));
        }
        updated.updated_at = now;
        Ok(ReportOutcome::Advanced(updated))
    }

    /// Builds the replacement order for a failed or cancelled one.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless this order is `Failed` or `Cancelled`.
    pub fn retry(
        &self,
        new_id: OrderId,
        checkout_url: Option<String>,
        now: Timestamp,
    ) -> Result<PaymentOrder, LedgerError> {
        if !self.status.allows_retry() {
            return Err(LedgerError::invalid_transition(
                self.id,
                self.status,
                PaymentStatus::Created,
            ));
        }
        Ok(PaymentOrder::create(
            new_id,
            self.applicant_id,
            self.payment_type.clone(),
            self.amount.clone(),
            checkout_url,
            Some(self.id),
            now,
        ))
    }
}
