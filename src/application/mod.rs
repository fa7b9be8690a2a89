//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::confirmation::{
    ConfirmCommand, ConfirmHandler, ConfirmResult, ConfirmationPolicy, IssueCodeCommand,
    IssueCodeHandler, IssueCodeResult,
};
pub use handlers::payment::{
    CreateOrderCommand, CreateOrderHandler, GetOrderHandler, GetOrderQuery, PaymentPolicy,
    PollOrderCommand, PollOrderHandler, ReconcileCallbackCommand, ReconcileCallbackHandler,
    ReconcileCallbackResult, RetryOrderCommand, RetryOrderHandler,
};
pub use handlers::session::{
    AuthorizeHandler, AuthorizeQuery, AuthorizeResult, PurgeExpiredHandler, PurgeExpiredResult,
    RequestOtpCommand, RequestOtpHandler, RequestOtpResult, RevokeTokenCommand,
    RevokeTokenHandler, RevokeTokenResult, SessionPolicy, VerifyOtpCommand, VerifyOtpHandler,
    VerifyOtpResult,
};
pub use handlers::stage::{
    ApplyBulkDecisionsCommand, ApplyBulkDecisionsHandler, BulkTemplateHandler,
    CurrentStageHandler, CurrentStageQuery, CurrentStageResult, RecordDecisionCommand,
    RecordDecisionHandler, RecordDecisionResult, RegisterApplicantCommand,
    RegisterApplicantHandler, RegisterApplicantResult, SelectionHistoryHandler,
    SelectionHistoryQuery, SettlePaymentCommand, SettlePaymentHandler, SettlePaymentResult,
    WithdrawApplicantCommand, WithdrawApplicantHandler,
};
