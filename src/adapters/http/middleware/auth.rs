//! Bearer authentication for applicant endpoints.
//!
//! ```text
//! Request → auth_middleware → authorize token → injects AuthenticatedApplicant
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! The middleware is applied only to routes that need an applicant, so a
//! missing or rejected token always ends the request with 401.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{AuthorizeQuery, AuthorizeResult};
use crate::domain::applicant::ApplicantProfile;
use crate::domain::foundation::{SessionTokenId, Timestamp};
use crate::domain::session::SessionError;

/// Applicant resolved from a valid session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedApplicant {
    pub applicant: ApplicantProfile,
    pub token_id: SessionTokenId,
    pub expires_at: Timestamp,
}

impl From<AuthorizeResult> for AuthenticatedApplicant {
    fn from(result: AuthorizeResult) -> Self {
        Self {
            applicant: result.applicant,
            token_id: result.token_id,
            expires_at: result.expires_at,
        }
    }
}

/// Reads the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authorizes the bearer token and injects the applicant into extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        return ApiError::from(SessionError::InvalidOrExpiredToken).into_response();
    };

    match state.authorize_handler().handle(AuthorizeQuery { token }).await {
        Ok(result) => {
            request
                .extensions_mut()
                .insert(AuthenticatedApplicant::from(result));
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(code = %err.code(), "bearer token rejected");
            ApiError::from(err).into_response()
        }
    }
}

/// Extractor that requires an authenticated applicant.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.applicant.registration_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedApplicant);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedApplicant>()
                .cloned()
                .map(RequireAuth)
                .ok_or_else(|| ApiError::from(SessionError::InvalidOrExpiredToken))
        })
    }
}
