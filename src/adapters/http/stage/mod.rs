//! HTTP adapter for applicant registration and stage progression.

mod dto;
mod handlers;
mod routes;

pub use dto::{DecisionResponse, SelectionHistoryResponse};
pub use routes::{applicant_routes, selection_routes};
