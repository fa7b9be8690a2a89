//! HTTP middleware and extractors for axum.
//!
//! - `auth` - Bearer token middleware and the `RequireAuth` extractor
//! - `actor` - `X-Actor-Id` reviewer extractor
//! - `rate_limit` - Per-client quota on the login endpoints

pub mod actor;
pub mod auth;
pub mod rate_limit;

pub use actor::{Reviewer, ACTOR_HEADER};
pub use auth::{auth_middleware, bearer_token, AuthenticatedApplicant, RequireAuth};
pub use rate_limit::ip_rate_limit;
