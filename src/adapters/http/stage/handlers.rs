//! HTTP handlers for applicant and selection endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::Reviewer;
use crate::adapters::http::parse_id;
use crate::adapters::http::state::AppState;
use crate::application::{
    ApplyBulkDecisionsCommand, CurrentStageQuery, RecordDecisionCommand,
    RegisterApplicantCommand, SelectionHistoryQuery, WithdrawApplicantCommand,
};
use crate::domain::foundation::ApplicantId;

use super::dto::{
    BulkDecisionsRequest, DecisionBody, DecisionResponse, RegisterApplicantRequest,
    SelectionHistoryResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/applicants/:id/stage - Current stage and status
pub async fn current_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let applicant_id: ApplicantId = parse_id(&id, "applicant_id")?;
    let result = state
        .current_stage_handler()
        .handle(CurrentStageQuery { applicant_id })
        .await?;
    Ok(Json(result))
}

/// GET /api/applicants/:id/selections - Decision history, oldest first
pub async fn selection_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let applicant_id: ApplicantId = parse_id(&id, "applicant_id")?;
    let records = state
        .selection_history_handler()
        .handle(SelectionHistoryQuery { applicant_id })
        .await?;
    Ok(Json(SelectionHistoryResponse { records }))
}

/// GET /api/selections/bulk/template - Columns expected by the bulk import
pub async fn bulk_template(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.bulk_template_handler().handle())
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/applicants - Register an applicant at the first stage
pub async fn register_applicant(
    State(state): State<AppState>,
    Json(request): Json<RegisterApplicantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RegisterApplicantCommand {
        email: request.email,
        phone: request.phone,
        display_name: request.display_name,
    };
    let result = state.register_applicant_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(result.applicant)))
}

/// POST /api/applicants/:id/decisions - Record one reviewer decision
pub async fn record_decision(
    State(state): State<AppState>,
    Reviewer(actor): Reviewer,
    Path(id): Path<String>,
    Json(body): Json<DecisionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RecordDecisionCommand {
        applicant_id: parse_id(&id, "applicant_id")?,
        request: body.into_request()?,
        actor,
    };
    let result = state.record_decision_handler().handle(cmd).await?;
    Ok(Json(DecisionResponse::from(result)))
}

/// POST /api/applicants/:id/withdraw - Applicant leaves the process
pub async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = WithdrawApplicantCommand {
        applicant_id: parse_id(&id, "applicant_id")?,
    };
    let profile = state.withdraw_handler().handle(cmd).await?;
    Ok(Json(profile))
}

/// POST /api/selections/bulk - Apply a batch of decisions
///
/// Always 200: per-row failures are reported in the summary.
pub async fn apply_bulk_decisions(
    State(state): State<AppState>,
    Reviewer(actor): Reviewer,
    Json(request): Json<BulkDecisionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ApplyBulkDecisionsCommand {
        rows: request.rows,
        actor,
    };
    let summary = state.bulk_decisions_handler().handle(cmd).await;
    Ok(Json(summary))
}
