//! HTTP handlers for login and session endpoints.

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{bearer_token, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::{
    CurrentStageQuery, RequestOtpCommand, RevokeTokenCommand, VerifyOtpCommand,
};
use crate::domain::session::SessionError;

use super::dto::{
    LogoutResponse, MeResponse, OtpRequestedResponse, RequestOtpRequest, TokenResponse,
    VerifyOtpRequest,
};

/// POST /api/auth/otp - Send a login code
pub async fn request_otp(
    State(state): State<AppState>,
    Json(request): Json<RequestOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RequestOtpCommand {
        identifier: request.identifier,
    };
    let result = state.request_otp_handler().handle(cmd).await?;
    Ok((StatusCode::ACCEPTED, Json(OtpRequestedResponse::from(result))))
}

/// POST /api/auth/otp/verify - Exchange a code for a session token
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = VerifyOtpCommand {
        identifier: request.identifier,
        code: request.code,
    };
    let result = state.verify_otp_handler().handle(cmd).await?;
    Ok(Json(TokenResponse::from(result)))
}

/// POST /api/auth/logout - Revoke the presented token
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).ok_or(SessionError::InvalidOrExpiredToken)?;
    let result = state
        .revoke_token_handler()
        .handle(RevokeTokenCommand {
            token: token.to_string(),
        })
        .await?;
    Ok(Json(LogoutResponse {
        revoked: result.revoked,
    }))
}

/// GET /api/me - Current applicant and stage
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let stage = state
        .current_stage_handler()
        .handle(CurrentStageQuery {
            applicant_id: auth.applicant.id,
        })
        .await?;
    Ok(Json(MeResponse {
        applicant: auth.applicant,
        stage,
        session_expires_at: auth.expires_at,
    }))
}
