//! Shared wiring for payment handler tests.

use std::sync::Arc;

use crate::adapters::memory::{InMemoryApplicantRepository, InMemoryPaymentOrderRepository};
use crate::adapters::payment::MockPaymentGateway;
use crate::application::handlers::stage::SettlePaymentHandler;
use crate::config::PipelineConfig;
use crate::domain::applicant::{Applicant, ApplicantStatus, EmailAddress};
use crate::domain::foundation::Timestamp;
use crate::domain::payment::PaymentType;
use crate::domain::stage::{StageIndex, StagePipeline};
use crate::ports::ApplicantRepository;

use super::{
    CreateOrderCommand, CreateOrderHandler, PaymentPolicy, ReconcileCallbackHandler,
};

pub(super) struct Ledger {
    pub applicants: Arc<InMemoryApplicantRepository>,
    pub orders: Arc<InMemoryPaymentOrderRepository>,
    pub gateway: MockPaymentGateway,
    pub pipeline: Arc<StagePipeline>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            applicants: Arc::new(InMemoryApplicantRepository::new()),
            orders: Arc::new(InMemoryPaymentOrderRepository::new()),
            gateway: MockPaymentGateway::new(),
            pipeline: Arc::new(PipelineConfig::default().to_pipeline().unwrap()),
        }
    }

    /// Applicant selected into the final stage, fee unpaid.
    pub async fn applicant_owing_fee(&self) -> Applicant {
        let mut applicant = Applicant::register(
            Some(EmailAddress::parse("ada@example.com").unwrap()),
            None,
            None,
            Timestamp::now(),
        )
        .unwrap();
        applicant.current_stage = StageIndex::new(3);
        applicant.status = ApplicantStatus::AwaitingPayment;
        self.applicants.insert(&applicant).await.unwrap();
        applicant
    }

    pub fn create_handler(&self) -> CreateOrderHandler {
        self.create_handler_with(PaymentPolicy::default())
    }

    pub fn create_handler_with(&self, policy: PaymentPolicy) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.orders.clone(),
            self.applicants.clone(),
            Arc::new(self.gateway.clone()),
            self.pipeline.clone(),
            policy,
        )
    }

    pub fn reconcile_handler(&self) -> ReconcileCallbackHandler {
        ReconcileCallbackHandler::new(
            self.orders.clone(),
            Arc::new(SettlePaymentHandler::new(
                self.applicants.clone(),
                self.pipeline.clone(),
            )),
        )
    }

    pub fn fee_type() -> PaymentType {
        PaymentType::new("final_round_fee").unwrap()
    }

    pub fn create_cmd(applicant: &Applicant) -> CreateOrderCommand {
        CreateOrderCommand {
            applicant_id: applicant.id,
            payment_type: Self::fee_type(),
            amount: None,
        }
    }
}
