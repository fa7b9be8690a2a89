//! Per-client rate limiting for the public login endpoints.
//!
//! Complements the per-identifier OTP quota enforced by the session
//! handlers: one client cannot spray requests across many identifiers.
//!
//! Quota status is returned in standard headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the oldest request leaves the window
//! - `Retry-After`: Seconds to wait (only on 429 response)

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::domain::session::SessionError;
use crate::ports::{RateLimitKey, RateLimitResult};

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Counts the request against the caller's address.
///
/// Fails open when the limiter itself is unavailable. Requests with no
/// discernible address are not limited here.
pub async fn ip_rate_limit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ip) = client_ip(request.headers(), connect_info.as_ref()) else {
        return next.run(request).await;
    };

    let status = match state.rate_limiter.check(RateLimitKey::ip(&ip)).await {
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::info!(scope = %denied.scope, "client over request quota");
            return ApiError::from(SessionError::rate_limited(denied.retry_after_secs))
                .into_response();
        }
        Ok(RateLimitResult::Allowed(status)) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "rate limiter unavailable for IP check");
            None
        }
    };

    let mut response = next.run(request).await;
    if let Some(status) = status {
        set_quota_headers(
            response.headers_mut(),
            status.limit,
            status.remaining,
            status.reset_at.as_unix_secs(),
        );
    }
    response
}

/// Client address, preferring proxy headers.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
fn client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|h| h.to_str().ok()) {
        if let Some(first_ip) = forwarded.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return Some(first_ip.to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.trim().to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

fn set_quota_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_at: u64) {
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining));
    headers.insert(headers::X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_at));
}
