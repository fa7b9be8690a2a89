//! HTTP handlers for participation confirmation endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{ConfirmCommand, IssueCodeCommand};
use crate::domain::foundation::RegistrationId;

use super::dto::{ConfirmRequest, ConfirmResponse, IssueCodeRequest, IssueCodeResponse};

/// POST /api/confirmations - Issue (or re-send) a confirmation code
pub async fn issue_code(
    State(state): State<AppState>,
    Json(request): Json<IssueCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = IssueCodeCommand {
        registration_id: RegistrationId::parse(&request.registration_id)?,
    };
    let result = state.issue_code_handler().handle(cmd).await?;
    Ok(Json(IssueCodeResponse::from(result)))
}

/// POST /api/confirmations/confirm - Redeem a confirmation code
pub async fn confirm(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .confirm_handler()
        .handle(ConfirmCommand { code: request.code })
        .await?;
    Ok(Json(ConfirmResponse::from(result)))
}
