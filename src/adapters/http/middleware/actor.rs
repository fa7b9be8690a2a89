//! Reviewer identity for staff endpoints.

use axum::http::HeaderMap;

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::ActorId;

/// Header carrying the reviewer id, set by the staff gateway in front of us.
pub const ACTOR_HEADER: &str = "X-Actor-Id";

/// Extractor for the reviewer recorded on selection decisions.
#[derive(Debug, Clone)]
pub struct Reviewer(pub ActorId);

fn actor_from(headers: &HeaderMap) -> Result<ActorId, ApiError> {
    let raw = headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::validation(ACTOR_HEADER, "header is required"))?;
    Ok(ActorId::new(raw)?)
}

impl<S> axum::extract::FromRequestParts<S> for Reviewer
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
        Box::pin(async move { actor_from(&parts.headers).map(Reviewer) })
    }
}
