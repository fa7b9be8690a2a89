//! Mapping of component errors onto HTTP responses.
//!
//! | Kind | HTTP Status |
//! |------|-------------|
//! | Input | 400 (422 for an impossible next stage) |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | RateLimited | 429 with `Retry-After` |
//! | Security | 401 (429 once attempts are exhausted) |
//! | Upstream | 503 gateway, 502 notifier |
//! | Internal | 500 |

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::confirmation::ConfirmationError;
use crate::domain::foundation::{ErrorCode, ErrorKind, ValidationError};
use crate::domain::payment::LedgerError;
use crate::domain::session::SessionError;
use crate::domain::stage::StageError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts component errors to HTTP responses.
#[derive(Debug, Clone)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    retry_after_secs: Option<u64>,
}

impl ApiError {
    fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            retry_after_secs: None,
        }
    }

    /// Rejects a malformed path parameter, header or body field.
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::invalid_format(field, reason).into()
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        match (self.code.kind(), self.code) {
            (ErrorKind::Input, ErrorCode::InvalidNextStage) => StatusCode::UNPROCESSABLE_ENTITY,
            (ErrorKind::Input, _) => StatusCode::BAD_REQUEST,
            (ErrorKind::NotFound, _) => StatusCode::NOT_FOUND,
            (ErrorKind::Conflict, _) => StatusCode::CONFLICT,
            (ErrorKind::RateLimited, _) => StatusCode::TOO_MANY_REQUESTS,
            (ErrorKind::Security, ErrorCode::AttemptsExceeded) => StatusCode::TOO_MANY_REQUESTS,
            (ErrorKind::Security, _) => StatusCode::UNAUTHORIZED,
            (ErrorKind::Upstream, ErrorCode::NotifierUnavailable) => StatusCode::BAD_GATEWAY,
            (ErrorKind::Upstream, _) => StatusCode::SERVICE_UNAVAILABLE,
            (ErrorKind::Internal, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            retry_after_secs: err.retry_after_secs(),
        }
    }
}

impl From<StageError> for ApiError {
    fn from(err: StageError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ConfirmationError> for ApiError {
    fn from(err: ConfirmationError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }

        let body = ErrorResponse::new(self.code.to_string(), self.message);
        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = self.retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OrderId;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::stage::StageIndex;

    #[test]
    fn rate_limited_sets_retry_after() {
        let response = ApiError::from(SessionError::rate_limited(42)).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn security_errors_are_unauthorized_except_exhaustion() {
        assert_eq!(
            ApiError::from(SessionError::mismatch(2)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::InvalidOrExpiredToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::AttemptsExceeded).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn conflicts_map_to_409() {
        let err = LedgerError::invalid_transition(
            OrderId::new(),
            PaymentStatus::Success,
            PaymentStatus::Failed,
        );
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.code().to_string(), "INVALID_TRANSITION");
    }

    #[test]
    fn not_found_and_upstream_statuses() {
        assert_eq!(
            ApiError::from(StageError::unknown_applicant("REG-AAAAAAAA")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LedgerError::gateway_unavailable("timed out")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn impossible_next_stage_is_unprocessable() {
        let err = StageError::invalid_next_stage(StageIndex::new(1), StageIndex::new(9));
        assert_eq!(ApiError::from(err).status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn validation_helper_is_bad_request() {
        let api = ApiError::validation("order_id", "not a UUID");
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), ErrorCode::ValidationFailed);
    }
}
