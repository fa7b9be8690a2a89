//! HTTP adapter for participation confirmation codes.

mod dto;
mod handlers;
mod routes;

pub use dto::{ConfirmResponse, IssueCodeResponse};
pub use routes::confirmation_routes;
