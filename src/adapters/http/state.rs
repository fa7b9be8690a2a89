//! Shared state for the HTTP adapter.

use std::sync::Arc;

use crate::adapters::memory::{
    InMemoryApplicantRepository, InMemoryConfirmationRepository, InMemoryOtpStore,
    InMemoryPaymentOrderRepository, InMemorySessionTokenStore,
};
use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
use crate::application::{
    ApplyBulkDecisionsHandler, AuthorizeHandler, BulkTemplateHandler, ConfirmHandler,
    ConfirmationPolicy, CreateOrderHandler, CurrentStageHandler, GetOrderHandler,
    IssueCodeHandler, PaymentPolicy, PollOrderHandler, ReconcileCallbackHandler,
    RecordDecisionHandler, RegisterApplicantHandler, RequestOtpHandler, RetryOrderHandler,
    RevokeTokenHandler, SelectionHistoryHandler, SessionPolicy, SettlePaymentHandler,
    VerifyOtpHandler, WithdrawApplicantHandler,
};
use crate::config::{AppConfig, ValidationError};
use crate::domain::session::OtpHasher;
use crate::domain::stage::StagePipeline;
use crate::ports::{
    ApplicantRepository, ConfirmationRepository, Notifier, OtpStore, PaymentGateway,
    PaymentOrderRepository, RateLimiter, SessionTokenStore,
};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub applicants: Arc<dyn ApplicantRepository>,
    pub otp_store: Arc<dyn OtpStore>,
    pub tokens: Arc<dyn SessionTokenStore>,
    pub orders: Arc<dyn PaymentOrderRepository>,
    pub codes: Arc<dyn ConfirmationRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub pipeline: Arc<StagePipeline>,
    pub hasher: OtpHasher,
    pub session_policy: SessionPolicy,
    pub payment_policy: PaymentPolicy,
    pub confirmation_policy: ConfirmationPolicy,
}

impl AppState {
    /// Wires in-memory storage and rate limiting around the given gateway
    /// and notifier.
    pub fn in_memory(
        config: &AppConfig,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            applicants: Arc::new(InMemoryApplicantRepository::new()),
            otp_store: Arc::new(InMemoryOtpStore::new()),
            tokens: Arc::new(InMemorySessionTokenStore::new()),
            orders: Arc::new(InMemoryPaymentOrderRepository::new()),
            codes: Arc::new(InMemoryConfirmationRepository::new()),
            gateway,
            notifier,
            rate_limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig::from_session(
                &config.session,
            ))),
            pipeline: Arc::new(config.pipeline.to_pipeline()?),
            hasher: OtpHasher::new(config.session.otp_key()),
            session_policy: SessionPolicy::from_config(&config.session),
            payment_policy: PaymentPolicy::from_config(&config.payment),
            confirmation_policy: ConfirmationPolicy::from_config(
                &config.confirmation,
                &config.session,
            ),
        })
    }

    // ───────────────────────────── Session ─────────────────────────────

    pub fn request_otp_handler(&self) -> RequestOtpHandler {
        RequestOtpHandler::new(
            self.otp_store.clone(),
            self.applicants.clone(),
            self.rate_limiter.clone(),
            self.notifier.clone(),
            self.hasher.clone(),
            self.session_policy.clone(),
        )
    }

    pub fn verify_otp_handler(&self) -> VerifyOtpHandler {
        VerifyOtpHandler::new(
            self.otp_store.clone(),
            self.applicants.clone(),
            self.tokens.clone(),
            self.hasher.clone(),
            self.session_policy.clone(),
        )
    }

    pub fn authorize_handler(&self) -> AuthorizeHandler {
        AuthorizeHandler::new(self.tokens.clone(), self.applicants.clone())
    }

    pub fn revoke_token_handler(&self) -> RevokeTokenHandler {
        RevokeTokenHandler::new(self.tokens.clone())
    }

    // ────────────────────────────── Stage ──────────────────────────────

    pub fn register_applicant_handler(&self) -> RegisterApplicantHandler {
        RegisterApplicantHandler::new(self.applicants.clone())
    }

    pub fn record_decision_handler(&self) -> RecordDecisionHandler {
        RecordDecisionHandler::new(self.applicants.clone(), self.pipeline.clone())
    }

    pub fn bulk_decisions_handler(&self) -> ApplyBulkDecisionsHandler {
        ApplyBulkDecisionsHandler::new(self.applicants.clone(), self.pipeline.clone())
    }

    pub fn bulk_template_handler(&self) -> BulkTemplateHandler {
        BulkTemplateHandler::new()
    }

    pub fn current_stage_handler(&self) -> CurrentStageHandler {
        CurrentStageHandler::new(self.applicants.clone(), self.pipeline.clone())
    }

    pub fn selection_history_handler(&self) -> SelectionHistoryHandler {
        SelectionHistoryHandler::new(self.applicants.clone())
    }

    pub fn withdraw_handler(&self) -> WithdrawApplicantHandler {
        WithdrawApplicantHandler::new(self.applicants.clone())
    }

    // ───────────────────────────── Payment ─────────────────────────────

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.orders.clone(),
            self.applicants.clone(),
            self.gateway.clone(),
            self.pipeline.clone(),
            self.payment_policy.clone(),
        )
    }

    pub fn get_order_handler(&self) -> GetOrderHandler {
        GetOrderHandler::new(self.orders.clone())
    }

    pub fn retry_order_handler(&self) -> RetryOrderHandler {
        RetryOrderHandler::new(
            self.orders.clone(),
            self.applicants.clone(),
            self.gateway.clone(),
            self.pipeline.clone(),
            self.payment_policy.clone(),
        )
    }

    pub fn reconcile_handler(&self) -> ReconcileCallbackHandler {
        let settle = SettlePaymentHandler::new(self.applicants.clone(), self.pipeline.clone());
        ReconcileCallbackHandler::new(self.orders.clone(), Arc::new(settle))
    }

    pub fn poll_order_handler(&self) -> PollOrderHandler {
        PollOrderHandler::new(
            self.orders.clone(),
            self.gateway.clone(),
            Arc::new(self.reconcile_handler()),
            self.payment_policy.clone(),
        )
    }

    // ─────────────────────────── Confirmation ──────────────────────────

    pub fn issue_code_handler(&self) -> IssueCodeHandler {
        IssueCodeHandler::new(
            self.codes.clone(),
            self.applicants.clone(),
            self.notifier.clone(),
            self.confirmation_policy.clone(),
        )
    }

    pub fn confirm_handler(&self) -> ConfirmHandler {
        ConfirmHandler::new(self.codes.clone(), self.applicants.clone())
    }
}
